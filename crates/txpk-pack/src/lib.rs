//! TPK texture container packing.
//!
//! A TPK bundles many block-compressed textures into one file: a fixed
//! header, a directory with one entry per texture, a table of level data
//! offsets, the level data itself and an optional block of texture names.
//!
//! Packing runs in three steps:
//!
//! 1. [`Manifest`] - the ordered list of textures and cubemaps to pack
//! 2. [`Catalog`] - every entry loaded from disk, in manifest order
//! 3. [`Layout::plan`] and [`ContainerWriter`] - every offset computed up
//!    front, then the container written front to back
//!
//! # Example
//!
//! ```no_run
//! use txpk_pack::pack_manifest;
//! use txpk_pack::PackOptions;
//!
//! let stats = pack_manifest("textures.txt", "textures.tpk", &PackOptions::default())?;
//! println!("{} textures, {} bytes", stats.textures, stats.total_size);
//! # Ok::<(), txpk_pack::Error>(())
//! ```

mod catalog;
mod container;
mod error;
mod header;
mod layout;
mod manifest;
mod options;
mod texture;
mod writer;

use std::path::Path;

pub use catalog::{Catalog, CatalogBuilder};
pub use container::{ContainerSummary, PackedContainer, PackedTexture};
pub use error::{Error, Result};
pub use header::{
    ContainerHeader, DirectoryEntry, DATA_ALIGN, EXT_INFO_HEADER_SIZE, LEVEL_PAD, SECTION_PAD,
};
pub use layout::{ExtInfoPlan, Layout, NamePlan, SlotPlan};
pub use manifest::{Manifest, ManifestEntry};
pub use options::PackOptions;
pub use texture::{Texture, TextureImage, TextureKind};
pub use writer::{pack_to_file, pack_to_vec, write_container, ContainerWriter, PackStats};

/// Load a manifest and pack every entry into `output`.
///
/// All sources are read before `output` is created, so a fatal source error
/// leaves no partial container behind.
pub fn pack_manifest<P: AsRef<Path>, Q: AsRef<Path>>(
    manifest: P,
    output: Q,
    options: &PackOptions,
) -> Result<PackStats> {
    let manifest = Manifest::load(manifest)?;
    let catalog = Catalog::from_manifest(&manifest, options)?;
    pack_to_file(&catalog, options, output)
}

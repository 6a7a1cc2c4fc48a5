//! Txpk - DDS to TPK texture container packing.
//!
//! This crate provides a unified interface to the txpk library crates.
//!
//! # Crates
//!
//! - [`txpk_common`] - Binary reading, patchable writing, alignment
//! - [`txpk_dds`] - DDS source parsing, mip sizing and cubemap assembly
//! - [`txpk_pack`] - Manifests, layout planning, container writing and parsing
//!
//! # Example
//!
//! ```no_run
//! use txpk::prelude::*;
//!
//! let options = PackOptions::default();
//! let manifest = Manifest::load("textures.txt")?;
//! let catalog = Catalog::from_manifest(&manifest, &options)?;
//! let stats = pack_to_file(&catalog, &options, "textures.tpk")?;
//!
//! let data = std::fs::read("textures.tpk")?;
//! let container = PackedContainer::parse(&data)?;
//! assert_eq!(container.textures().len(), stats.textures);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use txpk_common as common;
pub use txpk_dds as dds;
pub use txpk_pack as pack;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use txpk_common::{align_up, BinaryReader};
    pub use txpk_dds::{encode_dds, read_texture, ReadOptions, SourceTexture, TextureFormat};
    pub use txpk_pack::{
        pack_manifest, pack_to_file, Catalog, CatalogBuilder, Manifest, ManifestEntry,
        PackOptions, PackStats, PackedContainer, PackedTexture, TextureKind,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

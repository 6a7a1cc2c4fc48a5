//! DDS source texture handling for txpk.
//!
//! This crate is the boundary between the packer and its source images:
//!
//! - [`TextureFormat`] - the supported block-compressed formats and their
//!   per-level byte sizes
//! - [`read_texture`] / [`parse_texture`] - extract the mip chain of a DDS
//! - [`assemble_cubemap`] - combine six face files into one cubemap
//! - [`encode_dds`] - write level payloads back out as a DDS
//!
//! # Example
//!
//! ```no_run
//! use txpk_dds::{read_texture, ReadOptions};
//!
//! if let Some(texture) = read_texture("rock.dds", ReadOptions::default())? {
//!     println!("{} {}x{}, {} levels", texture.format, texture.width, texture.height, texture.mip_count());
//! }
//! # Ok::<(), txpk_dds::Error>(())
//! ```

mod cube;
mod encode;
mod error;
mod format;
mod header;
mod reader;

pub use cube::{assemble_cubemap, SourceCubemap, CUBE_FACES};
pub use encode::encode_dds;
pub use error::{Error, Result};
pub use format::{next_mip_dims, MipChain, TextureFormat};
pub use header::{DdsHeader, DdsPixelFormat, FourCC};
pub use reader::{parse_texture, read_texture, ReadOptions, SourceTexture};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

//! Common utilities for txpk.
//!
//! This crate provides the binary plumbing shared by the txpk crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`PatchWriter`] - Sequential little-endian writer over a seekable stream,
//!   with alignment padding and back-patching of 32-bit fields
//! - [`align_up`] - Power-of-two alignment helper

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::PatchWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Round `value` up to the next multiple of `align`.
///
/// `align` must be a power of two.
#[inline]
pub const fn align_up(value: u64, align: u64) -> u64 {
    (value + (align - 1)) & !(align - 1)
}

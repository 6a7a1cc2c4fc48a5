//! TPK container header structures.
//!
//! ```text
//! 0x00  ContainerHeader                 16 bytes
//! 0x10  DirectoryEntry * count          16 bytes each
//!       offset table                    u32 per (texture, face, level)
//!       0xCC padding to 16
//!       level data                      each slot 16-aligned, zero tail padding
//!       0xCC padding to 16
//!       ext info (optional)             u32 size, u32 name table offset,
//!                                       u32 name offset * count, names (NUL-terminated)
//! ```

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// TPK container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ContainerHeader {
    /// `TPK\0`.
    pub magic: [u8; 4],
    /// Number of directory entries.
    pub texture_count: u32,
    /// Length of the whole container in bytes.
    pub total_size: u32,
    /// Offset of the extended info block, 0 if absent.
    pub ext_info_offset: u32,
}

impl ContainerHeader {
    /// The magic bytes at the start of a TPK file.
    pub const MAGIC: &'static [u8; 4] = b"TPK\0";

    /// Size of the header in bytes.
    pub const SIZE: usize = 0x10;

    /// Position of the total size field.
    pub const TOTAL_SIZE_OFFSET: u64 = 0x08;

    /// Position of the extended info offset field.
    pub const EXT_INFO_OFFSET: u64 = 0x0C;
}

/// Per-texture directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DirectoryEntry {
    /// Format code, 0 for an empty entry.
    pub format: u8,
    /// Mip levels per face.
    pub mip_count: u8,
    pub width: u16,
    pub height: u16,
    /// -1 marks a cubemap, 0 otherwise.
    pub depth: i16,
    /// Byte size of the top mip level.
    pub top_level_size: u32,
    /// Offset of this texture's first slot in the offset table.
    pub offset_table_offset: u32,
}

impl DirectoryEntry {
    /// Size of a directory entry in bytes.
    pub const SIZE: usize = 0x10;

    /// Depth marker written for cubemaps.
    pub const CUBE_DEPTH: i16 = -1;
}

/// Alignment of level data and of the extended info block.
pub const DATA_ALIGN: u64 = 0x10;

/// Filler between sections.
pub const SECTION_PAD: u8 = 0xCC;

/// Filler after a level payload up to the next alignment boundary.
pub const LEVEL_PAD: u8 = 0x00;

/// Size of the extended info sub-header.
pub const EXT_INFO_HEADER_SIZE: u32 = 8;

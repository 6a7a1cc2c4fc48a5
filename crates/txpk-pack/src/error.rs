//! Error types for TPK packing and parsing.

use thiserror::Error;

/// Errors that can occur when packing or parsing TPK containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] txpk_common::Error),

    /// Source texture error.
    #[error("{0}")]
    Dds(#[from] txpk_dds::Error),

    /// Texture dimensions do not fit the 16-bit directory fields.
    #[error("texture \"{name}\" is {width}x{height}, directory entries hold at most 65535x65535")]
    DimensionOverflow { name: String, width: u32, height: u32 },

    /// Mip count does not fit the 8-bit directory field.
    #[error("texture \"{name}\" has {count} mip levels, directory entries hold at most 255")]
    TooManyLevels { name: String, count: usize },

    /// Layout exceeds the 32-bit offset range.
    #[error("container size {0:#x} exceeds the 32-bit offset range")]
    ContainerTooLarge(u64),

    /// A layout written against a catalog it was not planned for.
    #[error("layout plans {planned_textures} textures and {planned_slots} slots, catalog has {textures} and {slots}")]
    LayoutMismatch {
        planned_textures: usize,
        planned_slots: usize,
        textures: usize,
        slots: usize,
    },

    /// Invalid TPK magic.
    #[error("invalid TPK magic: expected 'TPK\\0', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// A (face, level) pair the texture does not have.
    #[error("texture has no slot for face {face}, level {level}")]
    SlotOutOfRange { face: usize, level: usize },

    /// An offset in the container points outside the file.
    #[error("offset {offset:#x} + {len} bytes is outside the container ({size} bytes)")]
    OffsetOutOfBounds { offset: u32, len: usize, size: usize },
}

/// Result type for TPK operations.
pub type Result<T> = std::result::Result<T, Error>;

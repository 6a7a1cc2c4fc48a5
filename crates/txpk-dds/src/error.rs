//! Error types for DDS handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] txpk_common::Error),

    /// Source file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for rendering and image optimization

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a snapshot
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the rendering backend
    #[error("Renderer initialization failed: {0}")]
    InitializationError(String),

    /// The HTML input does not exist
    #[error("Input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    /// Failed to load the document
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image codec error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),
}

/// Per-file failure while optimizing an image asset.
///
/// One of these is recorded for every file that could not be optimized; the
/// batch carries on with the next file.
#[derive(Error, Debug)]
pub enum OptimizeError {
    /// The file could not be opened or read
    #[error("cannot open file: {0}")]
    Open(#[source] std::io::Error),

    /// The file contents are not a decodable image
    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The file extension does not map to a format we re-encode
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Re-encoding the image failed
    #[error("cannot encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// Writing the optimized bytes back failed
    #[error("cannot write file: {0}")]
    Write(#[source] std::io::Error),
}

impl OptimizeError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizeError::Open(_) => "open",
            OptimizeError::Decode(_) => "decode",
            OptimizeError::UnsupportedFormat(_) => "unsupported_format",
            OptimizeError::Encode(_) => "encode",
            OptimizeError::Write(_) => "write",
        }
    }
}

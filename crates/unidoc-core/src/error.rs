//! Error types for document loading and extraction.

use thiserror::Error;

/// Errors raised while loading a document or extracting content from it.
///
/// Per-image persistence failures (`ImageDecode`, `ImageWrite`) are never
/// propagated out of an extraction operation; the engine collects them per
/// image and continues with the remaining images.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File I/O error while reading a source document or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension matches no supported format, or is missing.
    #[error("Unsupported format: {0}")]
    Format(String),

    /// The container structure could not be traversed (corrupt ZIP central
    /// directory, broken XML part, unreadable PDF cross-reference table).
    #[error("Source read error: {0}")]
    SourceRead(String),

    /// A single embedded image's raw bytes could not be decoded for
    /// re-encoding as PNG.
    #[error("Image decode error for {name}: {reason}")]
    ImageDecode { name: String, reason: String },

    /// A decoded image could not be written to the output directory.
    #[error("Image write error for {name}: {reason}")]
    ImageWrite { name: String, reason: String },
}

/// Convenience alias for `Result<T, ExtractError>`.
pub type Result<T> = std::result::Result<T, ExtractError>;

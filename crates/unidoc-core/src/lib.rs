//! Core types for `unidoc`
//!
//! This crate defines the value types shared by the extraction engine and
//! the persistence collaborators:
//!
//! - [`InputFormat`]: the closed set of supported container formats
//! - [`DocumentHandle`]: a fully parsed, format-tagged document
//! - [`ExtractionResult`]: the normalized output of one extraction session
//! - [`ExtractError`]: the error taxonomy
//!
//! The extraction logic itself lives in `unidoc-backend`; storage backends
//! live in `unidoc-store`.

pub mod document;
pub mod error;
pub mod format;
pub mod result;

pub use document::{
    DocumentHandle, EmbeddedImage, PdfDocument, PdfPage, Shape, Slide, SlideDocument, TextFrame,
    TextParagraph, TextRun, WordDocument,
};
pub use error::{ExtractError, Result};
pub use format::InputFormat;
pub use result::{ExtractionResult, ImageFailure, ImageRef, ImagesOutcome, Table};

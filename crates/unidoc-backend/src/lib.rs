//! Multi-format extraction engine for `unidoc`
//!
//! Given a path to a PDF, DOCX or PPTX document, this crate loads it into a
//! typed [`DocumentHandle`](unidoc_core::DocumentHandle) and extracts five
//! kinds of content — text, tables, images, metadata, hyperlinks — into one
//! normalized [`ExtractionResult`](unidoc_core::ExtractionResult).
//!
//! # Architecture
//!
//! ```text
//! loader::load_document ──▶ DocumentHandle (Pdf | Docx | Pptx)
//!                                  │
//!                                  ▼
//!                         DocumentExtractor
//!              (exhaustive dispatch to one FormatAdapter)
//!                                  │
//!            ┌─────────────────────┼─────────────────────┐
//!            ▼                     ▼                     ▼
//!       PdfAdapter            DocxAdapter           PptxAdapter
//!      (page/stream)     (paragraph/table/rels)   (slide/shape)
//! ```
//!
//! Each of the five operations is independent and idempotent. The only side
//! effect is image extraction, which persists every embedded image through
//! the [`ImageStore`] before returning references; a single image failing to
//! decode or write is recorded and skipped, never aborting the session.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use unidoc_backend::{loader, DocumentExtractor};
//!
//! let handle = loader::load_document(Path::new("report.pdf"))?;
//! let extractor = DocumentExtractor::new(handle, "output");
//! let result = extractor.extract()?;
//! println!("{} links, {} tables", result.links.len(), result.tables.len());
//! # Ok::<(), unidoc_core::ExtractError>(())
//! ```

pub mod docx;
pub mod engine;
pub mod image_store;
pub mod loader;
pub mod opc;
pub mod pdf;
pub mod pdf_tables;
pub mod pptx;
pub mod traits;

pub use docx::DocxAdapter;
pub use engine::DocumentExtractor;
pub use image_store::{image_file_name, ImageStore};
pub use loader::load_document;
pub use pdf::PdfAdapter;
pub use pptx::PptxAdapter;
pub use traits::FormatAdapter;

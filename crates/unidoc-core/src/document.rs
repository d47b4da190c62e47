//! Format-tagged document handles.
//!
//! A [`DocumentHandle`] is the fully parsed, in-memory representation of one
//! opened document, produced by the loader in `unidoc-backend`. Each variant
//! carries the structure its format natively exposes: an ordered page list,
//! a linear paragraph/table/relationship view, or an ordered slide list.
//!
//! Handles are owned exclusively by one extraction session and are never
//! shared across sessions; nothing here is behind interior mutability.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::format::InputFormat;
use crate::result::Table;

/// Raw bytes of an image embedded in a container, exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

/// One page of a page-oriented (PDF) document.
#[derive(Debug, Clone, Default)]
pub struct PdfPage {
    /// Extracted text; empty when the page yields none. Empty pages still
    /// occupy their slot so page positions stay meaningful.
    pub text: String,
    /// Tables detected on this page, in top-to-bottom order.
    pub tables: Vec<Table>,
    /// Embedded raster images with a retrievable raw stream.
    pub images: Vec<EmbeddedImage>,
    /// URI targets of the page's link annotations.
    pub link_targets: Vec<String>,
}

/// Parsed page-oriented document.
#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    /// Document information dictionary, non-empty values only.
    pub info: BTreeMap<String, String>,
    /// Pages in document order.
    pub pages: Vec<PdfPage>,
}

/// Parsed paragraph-oriented (DOCX) document.
#[derive(Debug, Clone, Default)]
pub struct WordDocument {
    /// Paragraph texts in document order. Table cell text is not repeated
    /// here; tables have their own view.
    pub paragraphs: Vec<String>,
    /// Native table objects in document order, row-major.
    pub tables: Vec<Table>,
    /// Embedded images discovered through the document's relationships,
    /// in relationship order.
    pub images: Vec<EmbeddedImage>,
    /// Hyperlink relationship targets, verbatim, duplicates preserved.
    pub hyperlinks: Vec<String>,
    /// Core properties from `docProps/core.xml`, non-empty values only.
    pub properties: BTreeMap<String, String>,
}

/// A single run of text within a slide paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    /// Hyperlink target attached to this run, if any.
    pub hyperlink: Option<String>,
}

/// One paragraph inside a shape's text frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextParagraph {
    pub runs: Vec<TextRun>,
}

/// Text frame of a shape: ordered paragraphs of ordered runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFrame {
    pub paragraphs: Vec<TextParagraph>,
}

impl TextFrame {
    /// Concatenated text of all runs, paragraphs separated by newlines.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, para) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for run in &para.runs {
                out.push_str(&run.text);
            }
        }
        out
    }
}

/// A shape on a slide. Only the two kinds the adapters interpret are
/// modeled; other shape kinds are dropped at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// A shape carrying a text frame.
    Text(TextFrame),
    /// A picture shape with its embedded image bytes.
    Picture(EmbeddedImage),
}

/// One slide: shapes in slide-internal order.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    pub shapes: Vec<Shape>,
}

/// Parsed slide-oriented (PPTX) document.
#[derive(Debug, Clone, Default)]
pub struct SlideDocument {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
    /// Core properties from `docProps/core.xml`, non-empty values only.
    pub properties: BTreeMap<String, String>,
}

/// A fully parsed document, tagged with its format.
///
/// The variant is fixed at load time and never re-detected; the extraction
/// engine matches on it exhaustively to select the format adapter.
#[derive(Debug, Clone)]
pub enum DocumentHandle {
    Pdf { source_path: PathBuf, document: PdfDocument },
    Docx { source_path: PathBuf, document: WordDocument },
    Pptx { source_path: PathBuf, document: SlideDocument },
}

impl DocumentHandle {
    /// The format tag assigned when the handle was created.
    #[must_use]
    pub const fn format(&self) -> InputFormat {
        match self {
            Self::Pdf { .. } => InputFormat::Pdf,
            Self::Docx { .. } => InputFormat::Docx,
            Self::Pptx { .. } => InputFormat::Pptx,
        }
    }

    /// Path the document was loaded from.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        match self {
            Self::Pdf { source_path, .. }
            | Self::Docx { source_path, .. }
            | Self::Pptx { source_path, .. } => source_path,
        }
    }

    /// Source file name including extension, e.g. `report.pdf`.
    #[must_use]
    pub fn document_name(&self) -> &str {
        self.source_path()
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Source file stem, e.g. `report` — the base for persisted image names.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.source_path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

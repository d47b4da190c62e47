//! Supported input formats.

use serde::{Deserialize, Serialize};

/// The closed set of container formats the engine understands.
///
/// The format is detected once, from the file extension, when a document is
/// loaded. Every dispatch site matches exhaustively on this enum, so adding
/// a variant forces every adapter decision to be revisited at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputFormat {
    /// Page-oriented: PDF document
    #[serde(rename = "PDF")]
    Pdf,
    /// Paragraph-oriented: Microsoft Word document (.docx)
    #[serde(rename = "DOCX")]
    Docx,
    /// Slide-oriented: Microsoft `PowerPoint` presentation (.pptx)
    #[serde(rename = "PPTX")]
    Pptx,
}

impl InputFormat {
    /// Detect format from a file extension (case-insensitive).
    ///
    /// Returns `None` for anything outside the supported set.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Canonical lowercase extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Docx => write!(f, "DOCX"),
            Self::Pptx => write!(f, "PPTX"),
        }
    }
}

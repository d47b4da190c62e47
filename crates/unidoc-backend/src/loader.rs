//! Document loading: validation, format detection, and parsing.

use std::path::Path;

use log::debug;

use unidoc_core::{DocumentHandle, ExtractError, InputFormat, Result};

use crate::{docx, pdf, pptx};

/// Validate `path`, detect its format from the extension, and parse it
/// into a [`DocumentHandle`].
///
/// # Errors
/// - `Io` (not found) when the file does not exist
/// - `Format` when the extension is missing or not a supported format
/// - `SourceRead` when the file exists but cannot be parsed as its format
pub fn load_document(path: &Path) -> Result<DocumentHandle> {
    if !path.exists() {
        return Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            ExtractError::Format(format!("no file extension: {}", path.display()))
        })?;
    let format = InputFormat::from_extension(extension)
        .ok_or_else(|| ExtractError::Format(extension.to_string()))?;

    debug!("Loading {} as {format}", path.display());

    let source_path = path.to_path_buf();
    match format {
        InputFormat::Pdf => Ok(DocumentHandle::Pdf { source_path, document: pdf::load(path)? }),
        InputFormat::Docx => {
            Ok(DocumentHandle::Docx { source_path, document: docx::load(path)? })
        }
        InputFormat::Pptx => {
            Ok(DocumentHandle::Pptx { source_path, document: pptx::load(path)? })
        }
    }
}

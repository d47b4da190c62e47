//! The extraction engine: one session over one loaded document.

use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};

use unidoc_core::{
    DocumentHandle, ExtractionResult, ImagesOutcome, InputFormat, Result, Table,
};

use crate::docx::DocxAdapter;
use crate::image_store::ImageStore;
use crate::pdf::PdfAdapter;
use crate::pptx::PptxAdapter;
use crate::traits::FormatAdapter;

/// An extraction session over one loaded document.
///
/// The format was fixed at load time, so every operation dispatches on the
/// handle's variant exhaustively; there is no unknown-format path. All
/// operations are independent and idempotent — callers may invoke any
/// subset in any order, or [`extract`](Self::extract) for everything at
/// once.
pub struct DocumentExtractor {
    handle: DocumentHandle,
    image_store: ImageStore,
}

impl DocumentExtractor {
    /// Wrap a loaded document. `output_dir` is where extracted images are
    /// written; it is created lazily on the first image operation.
    #[must_use]
    pub fn new(handle: DocumentHandle, output_dir: impl Into<std::path::PathBuf>) -> Self {
        Self { handle, image_store: ImageStore::new(output_dir) }
    }

    /// Source file name including extension.
    #[must_use]
    pub fn document_name(&self) -> &str {
        self.handle.document_name()
    }

    #[must_use]
    pub const fn format(&self) -> InputFormat {
        self.handle.format()
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.image_store.output_dir()
    }

    fn dispatch<T>(&self, op: impl Fn(&dyn FormatAdapter) -> T) -> T {
        match &self.handle {
            DocumentHandle::Pdf { document, .. } => op(&PdfAdapter::new(document)),
            DocumentHandle::Docx { document, .. } => op(&DocxAdapter::new(document)),
            DocumentHandle::Pptx { document, .. } => op(&PptxAdapter::new(document)),
        }
    }

    /// Full document text. Deterministic: repeated calls over the same
    /// handle return byte-identical output.
    #[must_use]
    pub fn text(&self) -> String {
        self.dispatch(|adapter| adapter.text())
    }

    /// All tables in document order. Empty for formats without table
    /// support and for documents without tables.
    #[must_use]
    pub fn tables(&self) -> Vec<Table> {
        self.dispatch(|adapter| adapter.tables())
    }

    /// Document properties with non-empty values, keys verbatim per format.
    #[must_use]
    pub fn metadata(&self) -> BTreeMap<String, String> {
        self.dispatch(|adapter| adapter.metadata())
    }

    /// Link targets in discovery order, duplicates preserved. Callers that
    /// need the deduplicated view use
    /// [`ExtractionResult::unique_links`].
    #[must_use]
    pub fn links(&self) -> Vec<String> {
        self.dispatch(|adapter| adapter.links())
    }

    /// Persist all embedded images into the output directory.
    ///
    /// # Errors
    /// Fails only when the output directory cannot be created; individual
    /// image decode/write failures are collected in the outcome instead.
    pub fn images(&self) -> Result<ImagesOutcome> {
        self.image_store.ensure_output_dir()?;
        let base_name = self.handle.base_name();
        Ok(self.dispatch(|adapter| adapter.images(&self.image_store, base_name)))
    }

    /// Run every extraction operation and assemble the combined result.
    ///
    /// Per-image failures are logged and dropped from the result; they do
    /// not affect the other fields.
    pub fn extract(&self) -> Result<ExtractionResult> {
        info!("Extracting {} ({})", self.document_name(), self.format());

        let outcome = self.images()?;
        for failure in &outcome.failures {
            warn!("Skipping image {}: {}", failure.file_name, failure.reason);
        }

        Ok(ExtractionResult {
            text: self.text(),
            tables: self.tables(),
            images: outcome.images,
            metadata: self.metadata(),
            links: self.links(),
        })
    }
}

//! Filesystem sink: one browsable directory per document.
//!
//! Layout under the store root:
//!
//! ```text
//! {root}/{document_name}/
//!     extracted_text.txt     (only when text is non-empty)
//!     tables/table_1.csv ... (only when tables exist)
//!     metadata.txt           (only when metadata is non-empty)
//!     extracted_links.txt    (only when links exist; deduplicated)
//! ```
//!
//! Absent content produces no file, so the directory listing itself tells
//! a reader what the document contained.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use unidoc_core::ExtractionResult;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory a given document's files land in.
    #[must_use]
    pub fn document_dir(&self, document_name: &str) -> PathBuf {
        self.root.join(document_name)
    }

    /// Write every non-empty part of `result` under the document's
    /// directory and return that directory. Existing files from a previous
    /// run of the same document are overwritten.
    pub fn store(&self, document_name: &str, result: &ExtractionResult) -> Result<PathBuf> {
        let dir = self.document_dir(document_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        if !result.text.is_empty() {
            let path = dir.join("extracted_text.txt");
            fs::write(&path, &result.text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        if !result.tables.is_empty() {
            let tables_dir = dir.join("tables");
            fs::create_dir_all(&tables_dir)
                .with_context(|| format!("Failed to create directory: {}", tables_dir.display()))?;
            for (i, table) in result.tables.iter().enumerate() {
                let path = tables_dir.join(format!("table_{}.csv", i + 1));
                write_table_csv(&path, table)?;
            }
        }

        if !result.metadata.is_empty() {
            let path = dir.join("metadata.txt");
            let mut file = fs::File::create(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            for (key, value) in &result.metadata {
                writeln!(file, "{key}: {value}")?;
            }
        }

        let links = result.unique_links();
        if !links.is_empty() {
            let path = dir.join("extracted_links.txt");
            let mut file = fs::File::create(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            for link in links {
                writeln!(file, "{link}")?;
            }
        }

        debug!("Stored {document_name} under {}", dir.display());
        Ok(dir)
    }
}

fn write_table_csv(path: &Path, table: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        // Rows may be ragged; rectangularity is not guaranteed upstream.
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    for row in table {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

//! SQLite sink for extraction results.
//!
//! Schema:
//! - extracted_files: one row per stored document (name, format)
//! - extracted_texts / extracted_tables / extracted_images /
//!   extracted_metadata / extracted_links: one row per artifact, keyed by
//!   file_id
//!
//! Tables are stored as JSON arrays of rows; links are the deduplicated
//! view, one row each, in first-seen order.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection};

use unidoc_core::{ExtractionResult, InputFormat};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS extracted_files (
    id INTEGER PRIMARY KEY,
    file_name TEXT NOT NULL,
    file_type TEXT NOT NULL,
    extracted_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);

CREATE TABLE IF NOT EXISTS extracted_texts (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    FOREIGN KEY (file_id) REFERENCES extracted_files(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS extracted_tables (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL,
    table_index INTEGER NOT NULL,
    rows TEXT NOT NULL,
    FOREIGN KEY (file_id) REFERENCES extracted_files(id) ON DELETE CASCADE,
    UNIQUE(file_id, table_index)
);

CREATE TABLE IF NOT EXISTS extracted_images (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL,
    stored_path TEXT NOT NULL,
    FOREIGN KEY (file_id) REFERENCES extracted_files(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS extracted_metadata (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    FOREIGN KEY (file_id) REFERENCES extracted_files(id) ON DELETE CASCADE,
    UNIQUE(file_id, key)
);

CREATE TABLE IF NOT EXISTS extracted_links (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL,
    url TEXT NOT NULL,
    FOREIGN KEY (file_id) REFERENCES extracted_files(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_texts_file_id ON extracted_texts(file_id);
CREATE INDEX IF NOT EXISTS idx_tables_file_id ON extracted_tables(file_id);
CREATE INDEX IF NOT EXISTS idx_images_file_id ON extracted_images(file_id);
CREATE INDEX IF NOT EXISTS idx_metadata_file_id ON extracted_metadata(file_id);
CREATE INDEX IF NOT EXISTS idx_links_file_id ON extracted_links(file_id);
";

/// Database connection wrapper.
pub struct SqlStore {
    conn: Connection,
}

impl SqlStore {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Store one extraction result; returns the new file row's id.
    ///
    /// Empty parts produce no rows. The whole write is one transaction:
    /// either every artifact lands or none do.
    pub fn store(
        &mut self,
        document_name: &str,
        format: InputFormat,
        result: &ExtractionResult,
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO extracted_files (file_name, file_type) VALUES (?, ?)",
            params![document_name, format.to_string()],
        )?;
        let file_id = tx.last_insert_rowid();

        if !result.text.is_empty() {
            tx.execute(
                "INSERT INTO extracted_texts (file_id, content) VALUES (?, ?)",
                params![file_id, result.text],
            )?;
        }

        for (i, table) in result.tables.iter().enumerate() {
            let rows = serde_json::to_string(table)
                .with_context(|| format!("Failed to serialize table {}", i + 1))?;
            tx.execute(
                "INSERT INTO extracted_tables (file_id, table_index, rows) VALUES (?, ?, ?)",
                params![file_id, i64::try_from(i + 1)?, rows],
            )?;
        }

        for image in &result.images {
            tx.execute(
                "INSERT INTO extracted_images (file_id, stored_path) VALUES (?, ?)",
                params![file_id, image.stored_path.to_string_lossy()],
            )?;
        }

        for (key, value) in &result.metadata {
            tx.execute(
                "INSERT INTO extracted_metadata (file_id, key, value) VALUES (?, ?, ?)",
                params![file_id, key, value],
            )?;
        }

        for url in result.unique_links() {
            tx.execute(
                "INSERT INTO extracted_links (file_id, url) VALUES (?, ?)",
                params![file_id, url],
            )?;
        }

        tx.commit()?;
        debug!("Stored {document_name} as file_id {file_id}");
        Ok(file_id)
    }

    /// Text content stored for a file, if any.
    pub fn text(&self, file_id: i64) -> Result<Option<String>> {
        use rusqlite::OptionalExtension;
        self.conn
            .query_row(
                "SELECT content FROM extracted_texts WHERE file_id = ?",
                params![file_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read text")
    }

    /// Stored tables for a file, in table order.
    pub fn tables(&self, file_id: i64) -> Result<Vec<Vec<Vec<String>>>> {
        let mut stmt = self.conn.prepare(
            "SELECT rows FROM extracted_tables WHERE file_id = ? ORDER BY table_index",
        )?;
        let rows = stmt.query_map(params![file_id], |row| row.get::<_, String>(0))?;
        let mut tables = Vec::new();
        for json in rows {
            tables.push(serde_json::from_str(&json?).context("Failed to parse stored table")?);
        }
        Ok(tables)
    }

    /// Stored link URLs for a file, in insertion order.
    pub fn links(&self, file_id: i64) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM extracted_links WHERE file_id = ? ORDER BY id")?;
        let rows = stmt.query_map(params![file_id], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<_, _>>()?)
    }

    /// Stored metadata for a file.
    pub fn metadata(&self, file_id: i64) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM extracted_metadata WHERE file_id = ? ORDER BY key")?;
        let rows = stmt.query_map(params![file_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<std::result::Result<_, _>>()?)
    }
}

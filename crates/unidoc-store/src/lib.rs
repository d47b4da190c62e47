//! Persistence for extraction results.
//!
//! Two independent sinks over the same [`unidoc_core::ExtractionResult`]:
//!
//! - [`FileStore`]: a human-browsable per-document directory tree with
//!   plain-text, CSV, and link files
//! - [`SqlStore`]: a SQLite database with one row per extracted artifact
//!
//! Both sinks are append-style: storing the same document twice produces
//! two independent records (SQL) or overwrites the previous files (FS).

pub mod fs_store;
pub mod sql_store;

pub use fs_store::FileStore;
pub use sql_store::SqlStore;

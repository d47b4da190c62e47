//! The format adapter contract.

use std::collections::BTreeMap;

use unidoc_core::{ImagesOutcome, Table};

use crate::image_store::ImageStore;

/// One extraction implementation per supported format.
///
/// An adapter borrows a fully parsed document and exposes the five
/// extraction operations over it. Every operation is independent and
/// idempotent; an operation a format has no native support for returns an
/// empty collection, never an error — partial extraction is the normal
/// case, not a failure.
pub trait FormatAdapter {
    /// Concatenated document text, trimmed of leading/trailing whitespace.
    /// Two calls over the same handle produce byte-identical output.
    fn text(&self) -> String;

    /// All tables in document order, flattened across pages where the
    /// format is page-scoped. Row-major; rectangularity not guaranteed.
    fn tables(&self) -> Vec<Table>;

    /// Persist every discovered embedded image through `store` and return
    /// the references. A single image failing to decode or write is
    /// recorded in the outcome's failure list and the remaining images are
    /// still processed.
    fn images(&self, store: &ImageStore, base_name: &str) -> ImagesOutcome;

    /// Native document properties with non-empty values only. Key names
    /// are surfaced verbatim per format; no cross-format normalization.
    fn metadata(&self) -> BTreeMap<String, String>;

    /// Link targets in discovery order, duplicates preserved.
    fn links(&self) -> Vec<String>;
}

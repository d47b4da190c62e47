//! The normalized extraction result.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A table as a row-major list of string cells.
///
/// Rectangularity is not guaranteed; non-text cell content is dropped at
/// load time, never reported as an error.
pub type Table = Vec<Vec<String>>;

/// Reference to an image persisted during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Where the re-encoded PNG was written. Unique within one session.
    pub stored_path: PathBuf,
}

/// A single image that could not be persisted.
///
/// Recorded and reported per image; never aborts the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFailure {
    /// The file name the image would have been stored under.
    pub file_name: String,
    pub reason: String,
}

/// Outcome of one image-extraction pass: what was persisted and what failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesOutcome {
    pub images: Vec<ImageRef>,
    pub failures: Vec<ImageFailure>,
}

/// Aggregate output of one extraction session, one per document.
///
/// Constructed fresh per document, immutable after assembly, handed off to
/// storage collaborators as-is. Absence of a capability in a format yields
/// an empty collection here, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Concatenated document text; possibly empty.
    pub text: String,
    /// All tables in document order.
    pub tables: Vec<Table>,
    /// References to persisted images, in discovery order.
    pub images: Vec<ImageRef>,
    /// Native property names mapped to non-empty values, verbatim per
    /// format; no cross-format key normalization.
    pub metadata: BTreeMap<String, String>,
    /// Link targets in discovery order. May contain duplicates; consumers
    /// that need uniqueness deduplicate themselves.
    pub links: Vec<String>,
}

impl ExtractionResult {
    /// Links with empties dropped and duplicates removed, preserving the
    /// first-seen order. Storage collaborators use this view; the raw
    /// `links` sequence keeps multiplicity for callers that need it.
    #[must_use]
    pub fn unique_links(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.links
            .iter()
            .map(String::as_str)
            .filter(|link| !link.is_empty() && seen.insert(*link))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_result_is_empty_everywhere() {
        let result = ExtractionResult::default();
        assert!(result.text.is_empty());
        assert!(result.tables.is_empty());
        assert!(result.images.is_empty());
        assert!(result.metadata.is_empty());
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_unique_links_preserves_first_seen_order() {
        let result = ExtractionResult {
            links: vec![
                "https://b.example".to_string(),
                String::new(),
                "https://a.example".to_string(),
                "https://b.example".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(
            result.unique_links(),
            vec!["https://b.example", "https://a.example"]
        );
        // the raw sequence keeps multiplicity
        assert_eq!(result.links.len(), 4);
    }

    #[test]
    fn test_result_serializes() {
        let result = ExtractionResult {
            text: "hello".to_string(),
            tables: vec![vec![vec!["a".to_string(), "b".to_string()]]],
            images: vec![ImageRef { stored_path: PathBuf::from("out/x_img_1.png") }],
            metadata: BTreeMap::from([("author".to_string(), "Ada".to_string())]),
            links: vec!["https://example.com".to_string()],
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}

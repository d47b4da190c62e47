//! DOCX (Microsoft Word) loader and adapter.
//!
//! DOCX files are ZIP archives containing Office Open XML:
//! - `word/document.xml`: main content (paragraphs, tables)
//! - `word/_rels/document.xml.rels`: relationships (images, hyperlinks)
//! - `word/media/`: embedded images
//! - `docProps/core.xml`: document properties
//!
//! Manual ZIP + XML parsing; the walk keeps paragraph text and table cells
//! separate so table content is not repeated in the text view.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use unidoc_core::{
    EmbeddedImage, ExtractError, ImageFailure, ImageRef, ImagesOutcome, Result, Table,
    WordDocument,
};

use crate::image_store::{image_file_name, ImageStore};
use crate::opc;
use crate::traits::FormatAdapter;

/// Load a DOCX file into its paragraph/table/relationship view.
pub fn load(path: &Path) -> Result<WordDocument> {
    let mut archive = opc::open_archive(path)?;

    let relationships = opc::parse_relationships(&mut archive, "word/_rels/document.xml.rels")?;

    let xml_content = opc::read_part(&mut archive, "word/document.xml")?
        .ok_or_else(|| ExtractError::SourceRead("missing word/document.xml".to_string()))?;
    let (paragraphs, tables) = walk_body(&xml_content)?;

    // Images are discovered through the relationship table, in file order;
    // entries whose media part is missing are skipped.
    let mut images = Vec::new();
    let mut hyperlinks = Vec::new();
    for rel in &relationships {
        if rel.rel_type.ends_with("/hyperlink") {
            hyperlinks.push(rel.target.clone());
        } else if rel.target.contains("image") {
            let part_name = resolve_part_target(&rel.target);
            if let Some(bytes) = opc::read_part_bytes(&mut archive, &part_name)? {
                images.push(EmbeddedImage::new(bytes));
            }
        }
    }

    let properties = opc::parse_core_properties(&mut archive)?;

    Ok(WordDocument { paragraphs, tables, images, hyperlinks, properties })
}

/// Relationship targets are relative to `word/`; `../` escapes back to the
/// package root.
fn resolve_part_target(target: &str) -> String {
    target.strip_prefix("../").map_or_else(|| format!("word/{target}"), str::to_string)
}

/// Walk `word/document.xml`, collecting paragraph texts and tables.
///
/// `w:tbl` may nest (a table inside a cell); row/cell structure is tracked
/// for the outermost table only and nested-table text flows into the
/// enclosing cell, so the outer table's shape survives.
fn walk_body(xml_content: &str) -> Result<(Vec<String>, Vec<Table>)> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut paragraphs = Vec::new();
    let mut tables = Vec::new();

    let mut table_depth = 0usize;
    let mut in_row = false;
    let mut in_cell = false;
    let mut in_paragraph = false;

    let mut current_paragraph = String::new();
    let mut current_table: Table = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut current_cell = String::new();
    let mut cell_has_paragraph = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        current_table.clear();
                    }
                }
                b"w:tr" if table_depth == 1 => {
                    in_row = true;
                    current_row.clear();
                }
                b"w:tc" if table_depth == 1 && in_row => {
                    in_cell = true;
                    current_cell.clear();
                    cell_has_paragraph = false;
                }
                b"w:p" if in_cell => {
                    // Paragraphs within one cell are newline-separated;
                    // nested-table paragraphs land here too.
                    if cell_has_paragraph {
                        current_cell.push('\n');
                    }
                    cell_has_paragraph = true;
                }
                b"w:p" if table_depth == 0 => {
                    in_paragraph = true;
                    current_paragraph.clear();
                }
                _ => {}
            },
            // An empty <w:p/> still occupies its slot in the text view and
            // keeps its separator inside a cell.
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:p" => {
                if in_cell {
                    if cell_has_paragraph {
                        current_cell.push('\n');
                    }
                    cell_has_paragraph = true;
                } else if table_depth == 0 {
                    paragraphs.push(String::new());
                }
            }
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    if in_cell {
                        current_cell.push_str(&text);
                    } else if in_paragraph {
                        current_paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => {
                    if table_depth == 1 {
                        tables.push(std::mem::take(&mut current_table));
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                b"w:tr" if table_depth == 1 && in_row => {
                    in_row = false;
                    current_table.push(std::mem::take(&mut current_row));
                }
                b"w:tc" if table_depth == 1 && in_cell => {
                    in_cell = false;
                    current_row.push(std::mem::take(&mut current_cell));
                }
                b"w:p" if in_paragraph && table_depth == 0 => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current_paragraph));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::SourceRead(format!(
                    "error parsing word/document.xml: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok((paragraphs, tables))
}

/// Paragraph-oriented adapter over a loaded [`WordDocument`].
#[derive(Debug, Clone, Copy)]
pub struct DocxAdapter<'a> {
    document: &'a WordDocument,
}

impl<'a> DocxAdapter<'a> {
    #[must_use]
    pub const fn new(document: &'a WordDocument) -> Self {
        Self { document }
    }
}

impl FormatAdapter for DocxAdapter<'_> {
    fn text(&self) -> String {
        self.document.paragraphs.join("\n").trim().to_string()
    }

    fn tables(&self) -> Vec<Table> {
        self.document.tables.clone()
    }

    fn images(&self, store: &ImageStore, base_name: &str) -> ImagesOutcome {
        let mut outcome = ImagesOutcome::default();
        // No page concept: the index is global, 1-based, in discovery order.
        for (i, image) in self.document.images.iter().enumerate() {
            let file_name = image_file_name(base_name, None, i + 1);
            match store.persist(&image.data, &file_name) {
                Ok(stored_path) => outcome.images.push(ImageRef { stored_path }),
                Err(e) => outcome
                    .failures
                    .push(ImageFailure { file_name, reason: e.to_string() }),
            }
        }
        outcome
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        self.document.properties.clone()
    }

    fn links(&self) -> Vec<String> {
        self.document.hyperlinks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_body_paragraphs_and_tables() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>A1</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>B1</w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>A2</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>B2</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let (paragraphs, tables) = walk_body(xml).unwrap();
        assert_eq!(paragraphs, vec!["First paragraph", "Second paragraph"]);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0], vec![vec!["A1", "B1"], vec!["A2", "B2"]]);
    }

    #[test]
    fn test_cell_paragraphs_join_with_newline() {
        let xml = r#"<w:document xmlns:w="x">
  <w:tbl><w:tr><w:tc>
    <w:p><w:r><w:t>line one</w:t></w:r></w:p>
    <w:p><w:r><w:t>line two</w:t></w:r></w:p>
  </w:tc></w:tr></w:tbl>
</w:document>"#;
        let (_, tables) = walk_body(xml).unwrap();
        assert_eq!(tables[0][0][0], "line one\nline two");
    }

    #[test]
    fn test_nested_table_keeps_outer_shape() {
        let xml = r#"<w:document xmlns:w="x">
  <w:tbl>
    <w:tr>
      <w:tc>
        <w:p><w:r><w:t>Outer A1</w:t></w:r></w:p>
        <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Nested</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
      </w:tc>
      <w:tc><w:p><w:r><w:t>Outer B1</w:t></w:r></w:p></w:tc>
    </w:tr>
    <w:tr>
      <w:tc><w:p><w:r><w:t>Outer A2</w:t></w:r></w:p></w:tc>
      <w:tc><w:p><w:r><w:t>Outer B2</w:t></w:r></w:p></w:tc>
    </w:tr>
  </w:tbl>
</w:document>"#;
        let (_, tables) = walk_body(xml).unwrap();
        // One table, outer 2x2 shape intact; nested content folds into
        // its enclosing cell's text.
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[0][0], vec!["Outer A1\nNested", "Outer B1"]);
        assert_eq!(tables[0][1], vec!["Outer A2", "Outer B2"]);
    }

    #[test]
    fn test_empty_cell_paragraph_keeps_separator() {
        let xml = r#"<w:document xmlns:w="x">
  <w:tbl><w:tr><w:tc>
    <w:p><w:r><w:t>line one</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>line two</w:t></w:r></w:p>
  </w:tc></w:tr></w:tbl>
</w:document>"#;
        let (_, tables) = walk_body(xml).unwrap();
        assert_eq!(tables[0][0][0], "line one\n\nline two");
    }

    #[test]
    fn test_empty_document_has_no_content() {
        let (paragraphs, tables) = walk_body("<w:document/>").unwrap();
        assert!(paragraphs.is_empty());
        assert!(tables.is_empty());
    }

    #[test]
    fn test_resolve_part_target() {
        assert_eq!(resolve_part_target("media/image1.png"), "word/media/image1.png");
        assert_eq!(resolve_part_target("../customXml/item1.xml"), "customXml/item1.xml");
    }

    #[test]
    fn test_adapter_text_trims_and_joins() {
        let document = WordDocument {
            paragraphs: vec![
                "Hello".to_string(),
                String::new(),
                "World".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(DocxAdapter::new(&document).text(), "Hello\n\nWorld");
    }

    #[test]
    fn test_adapter_links_keep_duplicates() {
        let document = WordDocument {
            hyperlinks: vec![
                "https://example.com".to_string(),
                "https://example.com".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(DocxAdapter::new(&document).links().len(), 2);
    }
}

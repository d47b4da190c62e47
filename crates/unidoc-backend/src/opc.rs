//! Shared Open Packaging Conventions helpers for the OOXML loaders.
//!
//! DOCX and PPTX are both ZIP archives of XML parts tied together by
//! relationship files (`_rels/*.rels`) and a common core-properties part
//! (`docProps/core.xml`). The format-specific walks live in [`crate::docx`]
//! and [`crate::pptx`]; the package plumbing is here.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use unidoc_core::{ExtractError, Result};

/// One entry from a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Open an OOXML container as a ZIP archive.
pub fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(|e| {
        ExtractError::SourceRead(format!("failed to open {} as ZIP: {e}", path.display()))
    })
}

/// Read a named part into a string. Returns `None` when the part is absent.
pub fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let Ok(mut part) = archive.by_name(name) else {
        return Ok(None);
    };
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Read a named part as raw bytes. Returns `None` when the part is absent.
pub fn read_part_bytes(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<Vec<u8>>> {
    let Ok(mut part) = archive.by_name(name) else {
        return Ok(None);
    };
    let mut bytes = Vec::new();
    part.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// Extract an attribute value by key from an element.
#[inline]
pub fn get_attr(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(std::result::Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Parse a relationships part, preserving file order.
///
/// A missing part yields an empty list; OOXML allows parts without rels.
pub fn parse_relationships(
    archive: &mut ZipArchive<File>,
    part_name: &str,
) -> Result<Vec<Relationship>> {
    let Some(xml_content) = read_part(archive, part_name)? else {
        return Ok(Vec::new());
    };

    let mut relationships = Vec::new();
    let mut reader = Reader::from_str(&xml_content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                let id = get_attr(&e, b"Id");
                let rel_type = get_attr(&e, b"Type");
                let target = get_attr(&e, b"Target");
                if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                    relationships.push(Relationship { id, rel_type, target });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::SourceRead(format!(
                    "error parsing {part_name}: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Parse `docProps/core.xml` into a property map.
///
/// Keys are the properties' local element names (`creator`, `created`,
/// `modified`, ...); entries with empty values are omitted entirely.
/// A document without a core-properties part yields an empty map.
pub fn parse_core_properties(
    archive: &mut ZipArchive<File>,
) -> Result<BTreeMap<String, String>> {
    let Some(xml_content) = read_part(archive, "docProps/core.xml")? else {
        return Ok(BTreeMap::new());
    };

    let mut properties = BTreeMap::new();
    let mut reader = Reader::from_str(&xml_content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut current_key: Option<String> = None;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name != "cp:coreProperties" {
                    current_key = Some(local_name(&name).to_string());
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(key), Ok(text)) = (current_key.as_ref(), e.unescape()) {
                    let value = text.trim();
                    if !value.is_empty() {
                        properties.insert(key.clone(), value.to_string());
                    }
                }
            }
            Ok(Event::End(_)) => current_key = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::SourceRead(format!(
                    "error parsing docProps/core.xml: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(properties)
}

/// Local part of a possibly prefixed XML name (`dc:creator` -> `creator`).
fn local_name(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

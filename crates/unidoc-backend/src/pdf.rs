//! PDF loader and adapter, built on `lopdf`.
//!
//! The loader walks the document once per page: text through lopdf's
//! content-stream extractor, tables from the extracted text, images from the
//! page's XObject resources, links from the page's annotation dictionaries.
//! A page that fails any one of these still contributes the rest; empty
//! pages keep their slot so page positions stay meaningful.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use unidoc_core::{
    EmbeddedImage, ExtractError, ImageFailure, ImageRef, ImagesOutcome, PdfDocument, PdfPage,
    Result, Table,
};

use crate::image_store::{image_file_name, ImageStore};
use crate::pdf_tables;
use crate::traits::FormatAdapter;

/// Load a PDF file into its ordered page view.
pub fn load(path: &Path) -> Result<PdfDocument> {
    let doc = Document::load(path)
        .map_err(|e| ExtractError::SourceRead(format!("failed to parse PDF: {e}")))?;

    let info = document_info(&doc);

    // get_pages returns pages keyed by 1-based page number, in order.
    let mut pages = Vec::new();
    for (page_no, page_id) in doc.get_pages() {
        let text = doc
            .extract_text(&[page_no])
            .map(|t| t.trim_end().to_string())
            .unwrap_or_default();
        let tables = pdf_tables::detect_tables(&text);
        let images = page_images(&doc, page_id);
        let link_targets = page_links(&doc, page_id);
        pages.push(PdfPage { text, tables, images, link_targets });
    }

    Ok(PdfDocument { info, pages })
}

/// Follow an indirect reference to its dictionary, or accept an inline one.
fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Document information dictionary (`/Info` in the trailer), with empty
/// values omitted. Values are surfaced verbatim; dates stay in PDF's
/// `D:YYYYMMDD...` form.
fn document_info(doc: &Document) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();
    let Ok(info_obj) = doc.trailer.get(b"Info") else {
        return info;
    };
    let Some(info_dict) = resolve_dict(doc, info_obj) else {
        return info;
    };
    for (key, value) in info_dict.iter() {
        let key = String::from_utf8_lossy(key).to_string();
        let Some(value) = object_to_string(doc, value) else {
            continue;
        };
        if !value.is_empty() {
            info.insert(key, value);
        }
    }
    info
}

/// Render an info-dictionary value as text.
fn object_to_string(doc: &Document, object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).to_string()),
        Object::Integer(n) => Some(n.to_string()),
        Object::Real(n) => Some(n.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        Object::Reference(id) => {
            let resolved = doc.get_object(*id).ok()?;
            object_to_string(doc, resolved)
        }
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries the BOM, otherwise
/// treated as PDFDocEncoding (close enough to Latin-1 for the common case).
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Raw streams of the page's image XObjects, in resource-dictionary order.
///
/// The raw (still encoded) stream is kept; decoding happens at persist
/// time, where a failure is recorded per image instead of aborting.
fn page_images(doc: &Document, page_id: ObjectId) -> Vec<EmbeddedImage> {
    let mut images = Vec::new();
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return images;
    };
    let Some(resources) = page_dict
        .get(b"Resources")
        .ok()
        .and_then(|obj| resolve_dict(doc, obj))
    else {
        return images;
    };
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|obj| resolve_dict(doc, obj))
    else {
        return images;
    };
    for (_, object) in xobjects.iter() {
        let stream = match object {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Stream(stream)) => stream,
                _ => continue,
            },
            Object::Stream(stream) => stream,
            _ => continue,
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|s| s.as_name().ok())
            .map_or(false, |name| name == b"Image");
        if is_image {
            images.push(EmbeddedImage::new(stream.content.clone()));
        }
    }
    images
}

/// URI targets of the page's link annotations, in annotation order.
fn page_links(doc: &Document, page_id: ObjectId) -> Vec<String> {
    let mut links = Vec::new();
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return links;
    };
    let Ok(annots_obj) = page_dict.get(b"Annots") else {
        return links;
    };
    let annots = match annots_obj {
        Object::Array(array) => array.clone(),
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(array)) => array.clone(),
            _ => return links,
        },
        _ => return links,
    };
    for annot in &annots {
        let Some(annot_dict) = resolve_dict(doc, annot) else {
            continue;
        };
        let Some(action) = annot_dict
            .get(b"A")
            .ok()
            .and_then(|obj| resolve_dict(doc, obj))
        else {
            continue;
        };
        if let Ok(Object::String(bytes, _)) = action.get(b"URI") {
            links.push(decode_pdf_string(bytes));
        }
    }
    links
}

/// Page-oriented adapter over a loaded [`PdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct PdfAdapter<'a> {
    document: &'a PdfDocument,
}

impl<'a> PdfAdapter<'a> {
    #[must_use]
    pub const fn new(document: &'a PdfDocument) -> Self {
        Self { document }
    }
}

impl FormatAdapter for PdfAdapter<'_> {
    fn text(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.document.pages.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&page.text);
        }
        out.trim().to_string()
    }

    fn tables(&self) -> Vec<Table> {
        self.document
            .pages
            .iter()
            .flat_map(|page| page.tables.iter().cloned())
            .collect()
    }

    fn images(&self, store: &ImageStore, base_name: &str) -> ImagesOutcome {
        let mut outcome = ImagesOutcome::default();
        for (page_index, page) in self.document.pages.iter().enumerate() {
            // 1-based image counter, local to this page.
            for (i, image) in page.images.iter().enumerate() {
                let file_name = image_file_name(base_name, Some(page_index), i + 1);
                match store.persist(&image.data, &file_name) {
                    Ok(stored_path) => outcome.images.push(ImageRef { stored_path }),
                    Err(e) => outcome
                        .failures
                        .push(ImageFailure { file_name, reason: e.to_string() }),
                }
            }
        }
        outcome
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        self.document.info.clone()
    }

    fn links(&self) -> Vec<String> {
        self.document
            .pages
            .iter()
            .flat_map(|page| page.link_targets.iter().cloned())
            .collect()
    }
}

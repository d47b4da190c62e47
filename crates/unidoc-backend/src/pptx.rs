//! PPTX (Microsoft `PowerPoint`) loader and adapter.
//!
//! PPTX files are ZIP archives containing Office Open XML:
//! - `ppt/presentation.xml`: slide references in presentation order
//! - `ppt/_rels/presentation.xml.rels`: slide id -> part mapping
//! - `ppt/slides/slideN.xml`: shapes of one slide
//! - `ppt/slides/_rels/slideN.xml.rels`: slide relationships (images, links)
//! - `ppt/media/`: embedded images
//! - `docProps/core.xml`: document properties
//!
//! Slide order comes from `p:sldIdLst`, never from part file names. Only
//! text-frame shapes and picture shapes are modeled; everything else is
//! dropped at load time.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use unidoc_core::{
    EmbeddedImage, ExtractError, ImageFailure, ImageRef, ImagesOutcome, Result, Shape, Slide,
    SlideDocument, Table, TextFrame, TextParagraph, TextRun,
};

use crate::image_store::{image_file_name, ImageStore};
use crate::opc;
use crate::traits::FormatAdapter;

/// Load a PPTX file into its ordered slide/shape view.
pub fn load(path: &Path) -> Result<SlideDocument> {
    let mut archive = opc::open_archive(path)?;

    let slide_parts = slide_parts_in_order(&mut archive)?;

    let mut slides = Vec::new();
    for part_name in slide_parts {
        slides.push(load_slide(&mut archive, &part_name)?);
    }

    let properties = opc::parse_core_properties(&mut archive)?;

    Ok(SlideDocument { slides, properties })
}

/// Resolve slide part names in presentation order.
///
/// `ppt/presentation.xml` lists slides as `p:sldId` entries whose `r:id`
/// attributes point into the presentation's relationship table.
fn slide_parts_in_order(archive: &mut ZipArchive<File>) -> Result<Vec<String>> {
    let relationships =
        opc::parse_relationships(archive, "ppt/_rels/presentation.xml.rels")?;
    let by_id: HashMap<&str, &str> = relationships
        .iter()
        .map(|rel| (rel.id.as_str(), rel.target.as_str()))
        .collect();

    let Some(xml_content) = opc::read_part(archive, "ppt/presentation.xml")? else {
        return Err(ExtractError::SourceRead(
            "missing ppt/presentation.xml".to_string(),
        ));
    };

    let mut parts = Vec::new();
    let mut reader = Reader::from_str(&xml_content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) if e.name().as_ref() == b"p:sldId" => {
                if let Some(rel_id) = opc::get_attr(&e, b"r:id") {
                    if let Some(target) = by_id.get(rel_id.as_str()) {
                        parts.push(format!("ppt/{target}"));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::SourceRead(format!(
                    "error parsing ppt/presentation.xml: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(parts)
}

/// Parse one slide part into its shapes, in slide-internal order.
fn load_slide(archive: &mut ZipArchive<File>, part_name: &str) -> Result<Slide> {
    // Slide rels live next to the part: ppt/slides/slide1.xml ->
    // ppt/slides/_rels/slide1.xml.rels
    let rels_name = rels_part_name(part_name);
    let relationships = opc::parse_relationships(archive, &rels_name)?;
    let rel_targets: HashMap<String, String> = relationships
        .into_iter()
        .map(|rel| (rel.id, rel.target))
        .collect();

    let Some(xml_content) = opc::read_part(archive, part_name)? else {
        return Err(ExtractError::SourceRead(format!("missing {part_name}")));
    };

    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(&xml_content);
    reader.trim_text(true);

    let mut in_text_body = false;
    let mut in_paragraph = false;
    let mut in_run = false;
    let mut in_picture = false;

    let mut frame = TextFrame::default();
    let mut paragraph = TextParagraph::default();
    let mut run = TextRun::default();
    let mut picture_rel_id: Option<String> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            // Both may be self-closing or carry children (effect payloads),
            // so the attribute is read off Start and Empty alike.
            Ok(Event::Start(e) | Event::Empty(e))
                if e.name().as_ref() == b"a:hlinkClick" && in_run =>
            {
                if let Some(rel_id) = opc::get_attr(&e, b"r:id") {
                    run.hyperlink = rel_targets.get(&rel_id).cloned();
                }
            }
            Ok(Event::Start(e) | Event::Empty(e))
                if e.name().as_ref() == b"a:blip" && in_picture =>
            {
                if let Some(rel_id) = opc::get_attr(&e, b"r:embed") {
                    picture_rel_id = Some(rel_id);
                }
            }
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"p:txBody" => {
                    in_text_body = true;
                    frame = TextFrame::default();
                }
                b"a:p" if in_text_body => {
                    in_paragraph = true;
                    paragraph = TextParagraph::default();
                }
                b"a:r" if in_paragraph => {
                    in_run = true;
                    run = TextRun::default();
                }
                b"p:pic" => {
                    in_picture = true;
                    picture_rel_id = None;
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_run {
                    if let Ok(text) = e.unescape() {
                        run.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:r" if in_run => {
                    in_run = false;
                    paragraph.runs.push(std::mem::take(&mut run));
                }
                b"a:p" if in_paragraph => {
                    in_paragraph = false;
                    frame.paragraphs.push(std::mem::take(&mut paragraph));
                }
                b"p:txBody" if in_text_body => {
                    in_text_body = false;
                    shapes.push(Shape::Text(std::mem::take(&mut frame)));
                }
                b"p:pic" if in_picture => {
                    in_picture = false;
                    if let Some(image) =
                        resolve_picture(archive, &rel_targets, picture_rel_id.take())?
                    {
                        shapes.push(Shape::Picture(image));
                    }
                }
                _ => {}
            },
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

    Ok(Slide { shapes })
}

fn rels_part_name(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part_name}.rels"),
    }
}

/// Fetch the media bytes behind a picture's `r:embed` relationship.
///
/// Pictures whose relationship or media part is missing are skipped
/// silently; they have no retrievable stream.
fn resolve_picture(
    archive: &mut ZipArchive<File>,
    rel_targets: &HashMap<String, String>,
    rel_id: Option<String>,
) -> Result<Option<EmbeddedImage>> {
    let Some(rel_id) = rel_id else { return Ok(None) };
    let Some(target) = rel_targets.get(&rel_id) else {
        return Ok(None);
    };
    // "../media/image1.png" is relative to ppt/slides/.
    let part_name = target.strip_prefix("../").map_or_else(
        || format!("ppt/slides/{target}"),
        |suffix| format!("ppt/{suffix}"),
    );
    Ok(opc::read_part_bytes(archive, &part_name)?.map(EmbeddedImage::new))
}

/// Slide-oriented adapter over a loaded [`SlideDocument`].
#[derive(Debug, Clone, Copy)]
pub struct PptxAdapter<'a> {
    document: &'a SlideDocument,
}

impl<'a> PptxAdapter<'a> {
    #[must_use]
    pub const fn new(document: &'a SlideDocument) -> Self {
        Self { document }
    }
}

impl FormatAdapter for PptxAdapter<'_> {
    fn text(&self) -> String {
        let mut out = String::new();
        for slide in &self.document.slides {
            for shape in &slide.shapes {
                if let Shape::Text(frame) = shape {
                    out.push_str(&frame.text());
                    out.push('\n');
                }
            }
        }
        out.trim().to_string()
    }

    fn tables(&self) -> Vec<Table> {
        // Slides have no native table model; table-like shapes are not
        // interpreted.
        Vec::new()
    }

    fn images(&self, store: &ImageStore, base_name: &str) -> ImagesOutcome {
        let mut outcome = ImagesOutcome::default();
        for (slide_index, slide) in self.document.slides.iter().enumerate() {
            // 1-based picture counter, local to this slide.
            let mut image_index = 0;
            for shape in &slide.shapes {
                let Shape::Picture(image) = shape else { continue };
                image_index += 1;
                let file_name = image_file_name(base_name, Some(slide_index), image_index);
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
        self.document.properties.clone()
    }

    fn links(&self) -> Vec<String> {
        let mut links = Vec::new();
        for slide in &self.document.slides {
            for shape in &slide.shapes {
                let Shape::Text(frame) = shape else { continue };
                for paragraph in &frame.paragraphs {
                    for run in &paragraph.runs {
                        if let Some(target) = &run.hyperlink {
                            links.push(target.clone());
                        }
                    }
                }
            }
        }
        links
    }
}

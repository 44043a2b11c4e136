//! Slide assembly on top of a blank or template package.

use crate::content_types::CT_SLIDE;
use crate::layout::{resolve_layouts, Placeholder, PlaceholderKind, SlideLayout};
use crate::package::{extract_number, PptxPackage};
use crate::presentation::{rewrite_slide_id_list, slide_rel_ids, FIRST_SLIDE_ID};
use crate::rels::{relative_target, rels_part_for, resolve_target, Relationships, REL_NOTES_SLIDE, REL_SLIDE, REL_SLIDE_LAYOUT};
use doc2deck_core::{Error, Result};
use log::{debug, info};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::io::{Seek, Write};
use std::path::Path;

const SLIDE_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Placeholder index of the body on a title-and-content layout.
pub const BODY_PLACEHOLDER_IDX: u32 = 1;

/// Builds a presentation from a template whose own slides have been removed.
#[derive(Debug)]
pub struct PresentationBuilder {
    package: PptxPackage,
    layouts: Vec<SlideLayout>,
    slides: Vec<SlideDraft>,
}

impl PresentationBuilder {
    /// Start from the built-in blank presentation.
    pub fn blank() -> Result<Self> {
        Self::from_package(PptxPackage::blank())
    }

    /// Start from a template file on disk.
    pub fn from_template(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Using template {}", path.display());
        Self::from_package(PptxPackage::open(path)?)
    }

    /// Start from a template if one is given, otherwise from the blank presentation.
    pub fn open(template: Option<&Path>) -> Result<Self> {
        match template {
            Some(path) => Self::from_template(path),
            None => Self::blank(),
        }
    }

    /// Start from an in-memory package. Existing slides are removed.
    pub fn from_package(mut package: PptxPackage) -> Result<Self> {
        let removed = strip_slides(&mut package)?;
        if removed > 0 {
            debug!("Removed {} existing slides from template", removed);
        }
        let layouts = resolve_layouts(&package)?;

        Ok(Self {
            package,
            layouts,
            slides: Vec::new(),
        })
    }

    /// Append a slide based on the layout at `layout_index`.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<&mut SlideDraft> {
        let layout = self.layouts.get(layout_index).ok_or(Error::MissingLayout {
            index: layout_index,
            available: self.layouts.len(),
        })?;

        let draft = SlideDraft::new(self.slides.len() + 1, layout);
        debug!("Slide {} uses layout '{}'", draft.number, draft.layout_name);
        let index = self.slides.len();
        self.slides.push(draft);
        Ok(&mut self.slides[index])
    }

    /// Number of slides added so far.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Write the slides into the package and return it.
    pub fn into_package(self) -> Result<PptxPackage> {
        let Self { mut package, slides, .. } = self;

        let presentation_part = package.presentation_part()?;
        let mut presentation_rels = package.relationships(&presentation_part)?;
        let mut types = package.content_types()?;
        let mut entries = Vec::with_capacity(slides.len());
        let mut next_number = 1;

        for (i, slide) in slides.iter().enumerate() {
            while package.has_part(&slide_part_name(next_number)) {
                next_number += 1;
            }
            let slide_part = slide_part_name(next_number);
            next_number += 1;

            let mut slide_rels = Relationships::default();
            slide_rels.add(REL_SLIDE_LAYOUT, relative_target(&slide_part, &slide.layout_part));

            package.set_part(&slide_part, slide.to_xml().into_bytes());
            package.set_relationships(&slide_part, &slide_rels);
            types.add_override(&slide_part, CT_SLIDE);

            let rel_id = presentation_rels.add(REL_SLIDE, relative_target(&presentation_part, &slide_part));
            entries.push((FIRST_SLIDE_ID + i as u32, rel_id));
        }

        let presentation_xml = rewrite_slide_id_list(&package.part_str(&presentation_part)?, &entries)?;
        package.set_part(&presentation_part, presentation_xml.into_bytes());
        package.set_relationships(&presentation_part, &presentation_rels);
        package.set_content_types(&types);

        info!("Built presentation with {} slides", slides.len());
        Ok(package)
    }

    /// Write the presentation to `path`, replacing any existing file.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.into_package()?.save(path)?;
        info!("Saved presentation to {}", path.display());
        Ok(())
    }

    pub fn write_to<W: Write + Seek>(self, writer: W) -> Result<()> {
        self.into_package()?.write_to(writer)
    }
}

fn slide_part_name(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

/// Remove every slide from the package, with its relationships, content
/// types and notes. Returns the number of slides removed.
fn strip_slides(package: &mut PptxPackage) -> Result<usize> {
    let presentation_part = package.presentation_part()?;
    let presentation_xml = package.part_str(&presentation_part)?;
    let mut presentation_rels = package.relationships(&presentation_part)?;
    let mut types = package.content_types()?;

    let listed = slide_rel_ids(&presentation_xml)?;
    let mut slide_rels: Vec<(String, String)> = presentation_rels
        .of_type(REL_SLIDE)
        .map(|r| (r.id.clone(), resolve_target(&presentation_part, &r.target)))
        .collect();
    slide_rels.sort_by_key(|(_, part)| extract_number(part));

    if listed.is_empty() && slide_rels.is_empty() {
        return Ok(0);
    }

    for (rel_id, slide_part) in &slide_rels {
        let owned = package.relationships(slide_part)?;
        for notes in owned.of_type(REL_NOTES_SLIDE) {
            let notes_part = resolve_target(slide_part, &notes.target);
            remove_part_with_rels(package, &notes_part);
            types.remove_override(&notes_part);
        }

        remove_part_with_rels(package, slide_part);
        types.remove_override(slide_part);
        presentation_rels.remove(rel_id);
        debug!("Removed template slide {}", slide_part);
    }

    let presentation_xml = rewrite_slide_id_list(&presentation_xml, &[])?;
    package.set_part(&presentation_part, presentation_xml.into_bytes());
    package.set_relationships(&presentation_part, &presentation_rels);
    package.set_content_types(&types);

    Ok(slide_rels.len().max(listed.len()))
}

fn remove_part_with_rels(package: &mut PptxPackage, part: &str) {
    package.remove_part(part);
    package.remove_part(&rels_part_for(part));
}

/// A slide being assembled. Placeholders come from the layout, empty until set.
#[derive(Debug, Clone)]
pub struct SlideDraft {
    number: usize,
    layout_part: String,
    layout_name: String,
    shapes: Vec<PlaceholderShape>,
}

#[derive(Debug, Clone)]
struct PlaceholderShape {
    placeholder: Placeholder,
    /// Level-0 paragraphs; empty leaves the placeholder blank.
    paragraphs: Vec<String>,
}

impl SlideDraft {
    fn new(number: usize, layout: &SlideLayout) -> Self {
        Self {
            number,
            layout_part: layout.part.clone(),
            layout_name: layout.name.clone(),
            shapes: layout
                .placeholders
                .iter()
                .filter(|p| !p.kind.is_chrome())
                .map(|p| PlaceholderShape {
                    placeholder: p.clone(),
                    paragraphs: Vec::new(),
                })
                .collect(),
        }
    }

    /// Set the title placeholder text.
    pub fn set_title(&mut self, title: &str) -> Result<&mut Self> {
        let shape = self.shape_mut(|p| p.kind.is_title(), "title")?;
        shape.paragraphs = title.split('\n').map(str::to_string).collect();
        Ok(self)
    }

    /// Replace the body placeholder's text with one paragraph per bullet.
    pub fn set_body<S: AsRef<str>>(&mut self, bullets: &[S]) -> Result<&mut Self> {
        let shape = self.shape_mut(|p| p.idx == BODY_PLACEHOLDER_IDX, "body")?;
        shape.paragraphs = bullets.iter().map(|b| b.as_ref().to_string()).collect();
        Ok(self)
    }

    fn shape_mut(&mut self, matches: impl Fn(&Placeholder) -> bool, label: &str) -> Result<&mut PlaceholderShape> {
        let number = self.number;
        let layout = self.layout_name.clone();
        self.shapes
            .iter_mut()
            .find(|s| matches(&s.placeholder))
            .ok_or(Error::MissingPlaceholder {
                slide: number,
                placeholder: label.to_string(),
                layout,
            })
    }

    /// Serialize to a `p:sld` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024 + self.shapes.len() * 512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(xml, "<p:sld {}>", SLIDE_NAMESPACES);
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str("<p:grpSpPr/>");

        for (i, shape) in self.shapes.iter().enumerate() {
            write_shape(&mut xml, i as u32 + 2, shape);
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        xml
    }
}

fn write_shape(xml: &mut String, shape_id: u32, shape: &PlaceholderShape) {
    let ph = &shape.placeholder;

    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, shape_id, escape(ph.name.as_str()));
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#);
    if ph.kind != PlaceholderKind::Object {
        let _ = write!(xml, r#" type="{}""#, escape(ph.kind.as_str()));
    }
    if let Some(orient) = &ph.orient {
        let _ = write!(xml, r#" orient="{}""#, escape(orient.as_str()));
    }
    if let Some(size) = &ph.size {
        let _ = write!(xml, r#" sz="{}""#, escape(size.as_str()));
    }
    if ph.idx != 0 {
        let _ = write!(xml, r#" idx="{}""#, ph.idx);
    }
    xml.push_str("/></p:nvPr></p:nvSpPr><p:spPr/>");

    if ph.kind.holds_text() {
        xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
        if shape.paragraphs.is_empty() {
            xml.push_str("<a:p/>");
        }
        for paragraph in &shape.paragraphs {
            write_paragraph(xml, paragraph);
        }
        xml.push_str("</p:txBody>");
    }

    xml.push_str("</p:sp>");
}

/// One `a:p`; line feeds inside the text become `a:br`.
fn write_paragraph(xml: &mut String, text: &str) {
    if text.is_empty() {
        xml.push_str("<a:p/>");
        return;
    }

    xml.push_str("<a:p>");
    for (i, piece) in text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str(r#"<a:br><a:rPr lang="en-US"/></a:br>"#);
        }
        if piece.is_empty() {
            continue;
        }
        let clean: String = piece.chars().filter(|c| *c == '\t' || !c.is_control()).collect();
        let _ = write!(xml, r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#, escape(clean.as_str()));
    }
    xml.push_str("</a:p>");
}

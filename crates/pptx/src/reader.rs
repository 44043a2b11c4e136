//! Reads the outline (titles and body text) back out of a PPTX file.

use crate::layout::PlaceholderKind;
use crate::package::PptxPackage;
use crate::presentation::slide_rel_ids;
use crate::rels::resolve_target;
use crate::xml::{attr, local_name, xml_error};
use doc2deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use std::io::{Read, Seek};
use std::path::Path;

/// Text of one slide's title and body placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideOutline {
    /// 1-based position in the deck.
    pub number: usize,
    pub title: Option<String>,
    /// Non-empty paragraphs of the body placeholder.
    pub body: Vec<String>,
}

/// Reader for PPTX slide outlines.
pub struct PptxReader;

impl PptxReader {
    pub fn new() -> Self {
        Self
    }

    pub fn open(&self, path: impl AsRef<Path>) -> Result<Vec<SlideOutline>> {
        self.read_package(&PptxPackage::open(path)?)
    }

    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<SlideOutline>> {
        self.read_package(&PptxPackage::from_reader(reader)?)
    }

    /// Slides in `sldIdLst` order.
    pub fn read_package(&self, package: &PptxPackage) -> Result<Vec<SlideOutline>> {
        let presentation_part = package.presentation_part()?;
        let rels = package.relationships(&presentation_part)?;

        let mut slides = Vec::new();
        for (idx, rel_id) in slide_rel_ids(&package.part_str(&presentation_part)?)?.iter().enumerate() {
            let rel = rels
                .by_id(rel_id)
                .ok_or_else(|| Error::PptxError(format!("Slide relationship '{}' not found", rel_id)))?;
            let slide_part = resolve_target(&presentation_part, &rel.target);
            slides.push(self.parse_slide(&package.part_str(&slide_part)?, idx + 1)?);
        }

        Ok(slides)
    }

    /// Parse a single slide part.
    fn parse_slide(&self, xml_content: &str, slide_number: usize) -> Result<SlideOutline> {
        let mut outline = SlideOutline {
            number: slide_number,
            title: None,
            body: Vec::new(),
        };

        for shape in extract_placeholder_text(xml_content)? {
            if shape.kind.is_title() && outline.title.is_none() {
                outline.title = Some(shape.paragraphs.join("\n"));
            } else if shape.idx == 1 && outline.body.is_empty() {
                outline.body = shape.paragraphs.into_iter().filter(|p| !p.is_empty()).collect();
            }
        }

        Ok(outline)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Placeholder shape text extracted from slide XML.
#[derive(Debug)]
struct ShapeText {
    kind: PlaceholderKind,
    idx: u32,
    paragraphs: Vec<String>,
}

fn extract_placeholder_text(xml_content: &str) -> Result<Vec<ShapeText>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ShapeText> = None;
    let mut is_placeholder = false;
    let mut in_paragraph = false;
    let mut in_text = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" => {
                        current_shape = Some(ShapeText {
                            kind: PlaceholderKind::Object,
                            idx: 0,
                            paragraphs: Vec::new(),
                        });
                        is_placeholder = false;
                    }
                    b"ph" => {
                        if let Some(ref mut shape) = current_shape {
                            shape.kind = attr(e, b"type")
                                .map(|t| PlaceholderKind::from_type(&t))
                                .unwrap_or(PlaceholderKind::Object);
                            shape.idx = attr(e, b"idx").and_then(|i| i.parse().ok()).unwrap_or(0);
                            is_placeholder = true;
                        }
                    }
                    b"p" if current_shape.is_some() => {
                        in_paragraph = true;
                        current_text.clear();
                    }
                    b"t" if in_paragraph => in_text = true,
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"ph" => {
                        if let Some(ref mut shape) = current_shape {
                            shape.kind = attr(e, b"type")
                                .map(|t| PlaceholderKind::from_type(&t))
                                .unwrap_or(PlaceholderKind::Object);
                            shape.idx = attr(e, b"idx").and_then(|i| i.parse().ok()).unwrap_or(0);
                            is_placeholder = true;
                        }
                    }
                    b"p" => {
                        if let Some(ref mut shape) = current_shape {
                            shape.paragraphs.push(String::new());
                        }
                    }
                    b"br" if in_paragraph => current_text.push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().unwrap_or_default();
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" => {
                        if let Some(shape) = current_shape.take() {
                            if is_placeholder {
                                shapes.push(shape);
                            }
                        }
                        in_paragraph = false;
                        in_text = false;
                    }
                    b"br" if in_paragraph => current_text.push('\n'),
                    b"t" => in_text = false,
                    b"p" if in_paragraph => {
                        if let Some(ref mut shape) = current_shape {
                            shape.paragraphs.push(std::mem::take(&mut current_text));
                        }
                        in_paragraph = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing slide", e)),
            _ => {}
        }
    }

    Ok(shapes)
}

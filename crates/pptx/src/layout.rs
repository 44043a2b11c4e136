//! Slide layouts and the placeholders they declare.

use crate::package::PptxPackage;
use crate::presentation::{first_master_rel_id, rel_ids_of};
use crate::rels::resolve_target;
use crate::xml::{attr, local_name, xml_error};
use doc2deck_core::{Error, Result};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// The `type` of a placeholder shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderKind {
    Title,
    CenteredTitle,
    SubTitle,
    Body,
    /// `obj`, also the type of a `p:ph` with no `type` attribute.
    Object,
    Date,
    Footer,
    SlideNumber,
    Other(String),
}

impl PlaceholderKind {
    pub fn from_type(value: &str) -> Self {
        match value {
            "title" => PlaceholderKind::Title,
            "ctrTitle" => PlaceholderKind::CenteredTitle,
            "subTitle" => PlaceholderKind::SubTitle,
            "body" => PlaceholderKind::Body,
            "obj" => PlaceholderKind::Object,
            "dt" => PlaceholderKind::Date,
            "ftr" => PlaceholderKind::Footer,
            "sldNum" => PlaceholderKind::SlideNumber,
            other => PlaceholderKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlaceholderKind::Title => "title",
            PlaceholderKind::CenteredTitle => "ctrTitle",
            PlaceholderKind::SubTitle => "subTitle",
            PlaceholderKind::Body => "body",
            PlaceholderKind::Object => "obj",
            PlaceholderKind::Date => "dt",
            PlaceholderKind::Footer => "ftr",
            PlaceholderKind::SlideNumber => "sldNum",
            PlaceholderKind::Other(other) => other,
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, PlaceholderKind::Title | PlaceholderKind::CenteredTitle)
    }

    /// Date, footer and slide-number placeholders are not copied onto new slides.
    pub fn is_chrome(&self) -> bool {
        matches!(
            self,
            PlaceholderKind::Date | PlaceholderKind::Footer | PlaceholderKind::SlideNumber
        )
    }

    /// Whether a cloned placeholder of this kind gets a text body.
    pub fn holds_text(&self) -> bool {
        matches!(
            self,
            PlaceholderKind::Title
                | PlaceholderKind::CenteredTitle
                | PlaceholderKind::SubTitle
                | PlaceholderKind::Body
                | PlaceholderKind::Object
        )
    }
}

/// A placeholder shape declared by a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub idx: u32,
    pub name: String,
    pub orient: Option<String>,
    pub size: Option<String>,
}

impl Placeholder {
    fn from_ph(e: &BytesStart<'_>, name: String) -> Self {
        Self {
            kind: attr(e, b"type")
                .map(|t| PlaceholderKind::from_type(&t))
                .unwrap_or(PlaceholderKind::Object),
            idx: attr(e, b"idx").and_then(|i| i.parse().ok()).unwrap_or(0),
            name,
            orient: attr(e, b"orient"),
            size: attr(e, b"sz"),
        }
    }
}

/// A slide layout of the first slide master.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    /// Part name, e.g. `ppt/slideLayouts/slideLayout2.xml`.
    pub part: String,
    pub name: String,
    pub placeholders: Vec<Placeholder>,
}

impl SlideLayout {
    pub fn parse(part: &str, xml: &str) -> Result<Self> {
        let (name, placeholders) = extract_placeholders(xml)?;
        Ok(Self {
            part: part.to_string(),
            name,
            placeholders,
        })
    }

    pub fn title_placeholder(&self) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.kind.is_title())
    }

    pub fn placeholder(&self, idx: u32) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.idx == idx)
    }
}

/// Layouts of the presentation's first slide master, in master order.
pub fn resolve_layouts(package: &PptxPackage) -> Result<Vec<SlideLayout>> {
    let presentation_part = package.presentation_part()?;
    let presentation_xml = package.part_str(&presentation_part)?;
    let master_id = first_master_rel_id(&presentation_xml)?;

    let presentation_rels = package.relationships(&presentation_part)?;
    let master_rel = presentation_rels
        .by_id(&master_id)
        .ok_or_else(|| Error::PptxError(format!("Slide master relationship '{}' not found", master_id)))?;
    let master_part = resolve_target(&presentation_part, &master_rel.target);
    let master_xml = package.part_str(&master_part)?;
    let master_rels = package.relationships(&master_part)?;

    let mut layouts = Vec::new();
    for layout_id in rel_ids_of(&master_xml, b"sldLayoutId")? {
        let rel = master_rels
            .by_id(&layout_id)
            .ok_or_else(|| Error::PptxError(format!("Slide layout relationship '{}' not found", layout_id)))?;
        let layout_part = resolve_target(&master_part, &rel.target);
        let layout = SlideLayout::parse(&layout_part, &package.part_str(&layout_part)?)?;
        debug!(
            "Layout {} '{}' ({}) with {} placeholders",
            layouts.len(),
            layout.name,
            layout.part,
            layout.placeholders.len()
        );
        layouts.push(layout);
    }

    Ok(layouts)
}

/// Extract the layout name and its placeholder shapes from layout XML.
fn extract_placeholders(xml_content: &str) -> Result<(String, Vec<Placeholder>)> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut layout_name = String::new();
    let mut placeholders = Vec::new();

    let mut in_shape = false;
    let mut shape_name = String::new();
    let mut shape_placeholder: Option<Placeholder> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"cSld" => {
                        layout_name = attr(e, b"name").unwrap_or_default();
                    }
                    b"sp" => {
                        in_shape = true;
                        shape_name.clear();
                        shape_placeholder = None;
                    }
                    b"cNvPr" if in_shape => {
                        shape_name = attr(e, b"name").unwrap_or_default();
                    }
                    b"ph" if in_shape => {
                        shape_placeholder = Some(Placeholder::from_ph(e, shape_name.clone()));
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if local_name(e.name().as_ref()) == b"sp" {
                    if let Some(placeholder) = shape_placeholder.take() {
                        placeholders.push(placeholder);
                    }
                    in_shape = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing slide layout", e)),
            _ => {}
        }
    }

    Ok((layout_name, placeholders))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld name="Two &amp; More">
    <p:spTree>
      <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1" sz="half"/></p:nvPr></p:nvSpPr></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="4" name="Decoration"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="5" name="Footer 4"/><p:cNvSpPr/><p:nvPr><p:ph type="ftr" idx="11"/></p:nvPr></p:nvSpPr></p:sp>
    </p:spTree>
  </p:cSld>
</p:sldLayout>"#;

    #[test]
    fn test_parse_layout_placeholders() {
        let layout = SlideLayout::parse("ppt/slideLayouts/slideLayout7.xml", LAYOUT).unwrap();

        assert_eq!(layout.name, "Two & More");
        assert_eq!(layout.placeholders.len(), 3);

        let title = layout.title_placeholder().unwrap();
        assert_eq!(title.kind, PlaceholderKind::Title);
        assert_eq!(title.idx, 0);
        assert_eq!(title.name, "Title 1");

        let body = layout.placeholder(1).unwrap();
        assert_eq!(body.kind, PlaceholderKind::Object);
        assert_eq!(body.size.as_deref(), Some("half"));

        assert!(layout.placeholder(11).unwrap().kind.is_chrome());
    }

    #[test]
    fn test_kind_round_trips_type_names() {
        for name in ["title", "ctrTitle", "subTitle", "body", "obj", "dt", "ftr", "sldNum", "pic"] {
            assert_eq!(PlaceholderKind::from_type(name).as_str(), name);
        }
        assert!(!PlaceholderKind::from_type("pic").holds_text());
    }

    #[test]
    fn test_resolve_blank_layouts() {
        let layouts = resolve_layouts(&PptxPackage::blank()).unwrap();

        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].name, "Title Slide");
        assert_eq!(layouts[0].title_placeholder().unwrap().kind, PlaceholderKind::CenteredTitle);
        assert_eq!(layouts[1].name, "Title and Content");
        assert_eq!(layouts[1].part, "ppt/slideLayouts/slideLayout2.xml");
        assert!(layouts[1].placeholder(1).is_some());
    }
}

//! The package content-type map (`[Content_Types].xml`).

use crate::xml::{attr, local_name, xml_error};
use doc2deck_core::Result;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt::Write as FmtWrite;

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub(crate) const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

#[derive(Debug, Clone, Default)]
pub(crate) struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut types = Self::default();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let name = e.name();
                    match local_name(name.as_ref()) {
                        b"Default" => {
                            if let (Some(ext), Some(ct)) = (attr(e, b"Extension"), attr(e, b"ContentType")) {
                                types.defaults.push((ext, ct));
                            }
                        }
                        b"Override" => {
                            if let (Some(part), Some(ct)) = (attr(e, b"PartName"), attr(e, b"ContentType")) {
                                types.overrides.push((part, ct));
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error("Error parsing content types", e)),
                _ => {}
            }
        }

        Ok(types)
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.overrides.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        for (ext, ct) in &self.defaults {
            let _ = write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(ext.as_str()),
                escape(ct.as_str())
            );
        }
        for (part, ct) in &self.overrides {
            let _ = write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape(part.as_str()),
                escape(ct.as_str())
            );
        }
        xml.push_str("</Types>");
        xml
    }

    /// Register an override for a part (given without a leading slash).
    pub fn add_override(&mut self, part: &str, content_type: &str) {
        let part_name = part_name(part);
        self.overrides.retain(|(p, _)| !p.eq_ignore_ascii_case(&part_name));
        self.overrides.push((part_name, content_type.to_string()));
    }

    pub fn remove_override(&mut self, part: &str) {
        let part_name = part_name(part);
        self.overrides.retain(|(p, _)| !p.eq_ignore_ascii_case(&part_name));
    }

    /// Content type declared for a part, by override or extension default.
    #[cfg(test)]
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        let part_name = part_name(part);
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p.eq_ignore_ascii_case(&part_name)) {
            return Some(ct.as_str());
        }
        let ext = part.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, ct)| ct.as_str())
    }
}

fn part_name(part: &str) -> String {
    format!("/{}", part.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
</Types>"#;

    #[test]
    fn test_override_lookup_and_removal() {
        let mut types = ContentTypes::parse(TYPES).unwrap();
        assert_eq!(types.content_type_of("ppt/slides/slide1.xml"), Some(CT_SLIDE));

        types.remove_override("ppt/slides/slide1.xml");
        assert_eq!(types.content_type_of("ppt/slides/slide1.xml"), Some("application/xml"));
    }

    #[test]
    fn test_add_override_replaces_existing() {
        let mut types = ContentTypes::parse(TYPES).unwrap();
        types.add_override("ppt/slides/slide1.xml", "text/plain");
        types.add_override("ppt/slides/slide2.xml", CT_SLIDE);

        let reparsed = ContentTypes::parse(&types.to_xml()).unwrap();

        assert_eq!(reparsed.content_type_of("ppt/slides/slide1.xml"), Some("text/plain"));
        assert_eq!(reparsed.content_type_of("ppt/slides/slide2.xml"), Some(CT_SLIDE));
        assert_eq!(reparsed.overrides.len(), 2);
    }
}

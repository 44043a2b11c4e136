//! DOCX paragraph reader.

use crate::xml::{attr, local_name, read_optional_part};
use doc2deck_core::{Error, Paragraph, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Style name used when a paragraph has no explicit style and the
/// document declares no default.
const FALLBACK_STYLE: &str = "Normal";

/// Reader for the body paragraphs of DOCX files.
pub struct DocxReader;

impl DocxReader {
    /// Create a new DOCX reader.
    pub fn new() -> Self {
        Self
    }

    /// Read the body paragraphs of a DOCX file on disk.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Vec<Paragraph>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let paragraphs = self.read(BufReader::new(file))?;
        log::debug!("Read {} paragraphs from {}", paragraphs.len(), path.display());
        Ok(paragraphs)
    }

    /// Read the body paragraphs of a DOCX package, in document order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<Paragraph>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let styles = match read_optional_part(&mut archive, STYLES_PART)? {
            Some(xml) => StyleTable::parse(&xml)?,
            None => StyleTable::default(),
        };

        let document = read_optional_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| Error::DocxParseError(format!("Missing part '{}'", DOCUMENT_PART)))?;

        let raw = self.extract_paragraphs(&document)?;

        Ok(raw
            .into_iter()
            .map(|p| {
                let name = styles.resolve(p.style_id.as_deref());
                Paragraph::new(p.text, name)
            })
            .collect())
    }

    /// Walk `w:body` and collect its direct `w:p` children.
    ///
    /// Paragraphs nested in tables, text boxes, or other containers are not
    /// part of the body stream and are skipped, as is their text.
    fn extract_paragraphs(&self, xml: &str) -> Result<Vec<RawParagraph>> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut paragraphs = Vec::new();
        let mut current: Option<RawParagraph> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = local_name(e.name().as_ref()).to_vec();

                    if name == b"p" && parent_is(&stack, b"body") {
                        current = Some(RawParagraph::default());
                    } else if let Some(ref mut para) = current {
                        if name == b"pStyle" && in_own_props(&stack) {
                            para.style_id = attr(e, b"val");
                        }
                    }

                    stack.push(name);
                }
                Ok(Event::Empty(ref e)) => {
                    let name = e.name();
                    let name = local_name(name.as_ref());

                    if name == b"p" && parent_is(&stack, b"body") {
                        paragraphs.push(RawParagraph::default());
                        continue;
                    }

                    if let Some(ref mut para) = current {
                        match name {
                            b"pStyle" if in_own_props(&stack) => {
                                para.style_id = attr(e, b"val");
                            }
                            b"tab" if in_own_run(&stack) => para.text.push('\t'),
                            b"br" | b"cr" if in_own_run(&stack) => para.text.push('\n'),
                            _ => {}
                        }
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(ref mut para) = current {
                        if stack.last().map(|n| n.as_slice()) == Some(b"t".as_slice()) && paragraph_depth(&stack) == 1 {
                            let text = e.unescape().unwrap_or_default();
                            para.text.push_str(&text);
                        }
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(ref mut para) = current {
                        if stack.last().map(|n| n.as_slice()) == Some(b"t".as_slice()) && paragraph_depth(&stack) == 1 {
                            para.text.push_str(&String::from_utf8_lossy(e));
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let name = stack.pop();
                    if name.as_deref() == Some(b"p".as_slice()) && parent_is(&stack, b"body") {
                        if let Some(para) = current.take() {
                            paragraphs.push(para);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing '{}' at position {}: {}",
                        DOCUMENT_PART,
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A body paragraph before its style id is resolved to a name.
#[derive(Debug, Default)]
struct RawParagraph {
    text: String,
    style_id: Option<String>,
}

/// Paragraph style ids mapped to their display names.
#[derive(Debug, Default)]
struct StyleTable {
    names: HashMap<String, String>,
    default_name: Option<String>,
}

impl StyleTable {
    fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut table = StyleTable::default();
        let mut current_id: Option<String> = None;
        let mut current_is_default = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"style" => {
                    let is_paragraph = attr(e, b"type").map_or(true, |t| t == "paragraph");
                    current_id = if is_paragraph { attr(e, b"styleId") } else { None };
                    current_is_default = attr(e, b"default").is_some_and(|d| d == "1" || d == "true");
                }
                Ok(Event::Empty(ref e)) if local_name(e.name().as_ref()) == b"name" => {
                    if let (Some(id), Some(name)) = (current_id.as_ref(), attr(e, b"val")) {
                        if current_is_default {
                            table.default_name = Some(name.clone());
                        }
                        table.names.insert(id.clone(), name);
                    }
                }
                Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"style" => {
                    current_id = None;
                    current_is_default = false;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!("Error parsing '{}': {}", STYLES_PART, e)));
                }
                _ => {}
            }
        }

        Ok(table)
    }

    /// Resolve a style id to its display name.
    ///
    /// Unknown ids fall back to the id itself, which keeps built-in ids such
    /// as `Heading1` classifiable even without a styles part.
    fn resolve(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self.names.get(id).cloned().unwrap_or_else(|| id.to_string()),
            None => self
                .default_name
                .clone()
                .unwrap_or_else(|| FALLBACK_STYLE.to_string()),
        }
    }
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().map(|n| n.as_slice()) == Some(name)
}

/// Number of open `w:p` elements.
fn paragraph_depth(stack: &[Vec<u8>]) -> usize {
    stack.iter().filter(|n| n.as_slice() == b"p").count()
}

/// Inside the body paragraph's own `w:pPr`.
fn in_own_props(stack: &[Vec<u8>]) -> bool {
    parent_is(stack, b"pPr") && paragraph_depth(stack) == 1
}

/// Inside a run that belongs to the body paragraph.
fn in_own_run(stack: &[Vec<u8>]) -> bool {
    parent_is(stack, b"r") && paragraph_depth(stack) == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc2deck_core::StyleClass;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn package(document: &str, styles: Option<&str>) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", FileOptions::default()).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        if let Some(styles) = styles {
            zip.start_file("word/styles.xml", FileOptions::default()).unwrap();
            zip.write_all(styles.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style>
  <w:style w:type="character" w:styleId="Strong"><w:name w:val="Strong"/></w:style>
</w:styles>"#;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            inner
        )
    }

    #[test]
    fn test_reads_paragraphs_with_style_names() {
        let doc = body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
               <w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>
               <w:p><w:pPr><w:pStyle w:val="ListBullet"/></w:pPr><w:r><w:t>item</w:t></w:r></w:p>"#,
        );

        let paras = DocxReader::new().read(package(&doc, Some(STYLES))).unwrap();

        assert_eq!(paras.len(), 3);
        assert_eq!(paras[0].text, "Intro");
        assert_eq!(paras[0].style_name, "heading 1");
        assert_eq!(paras[0].class, StyleClass::Heading(1));
        assert_eq!(paras[1].text, "Hello world");
        assert_eq!(paras[1].style_name, "Normal");
        assert_eq!(paras[2].class, StyleClass::ListItem);
    }

    #[test]
    fn test_skips_table_paragraphs() {
        let doc = body(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );

        let paras = DocxReader::new().read(package(&doc, None)).unwrap();
        let texts: Vec<&str> = paras.iter().map(|p| p.text.as_str()).collect();

        assert_eq!(texts, vec!["before", "after"]);
    }

    #[test]
    fn test_tabs_breaks_and_empty_paragraphs() {
        let doc = body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>
               <w:p/>"#,
        );

        let paras = DocxReader::new().read(package(&doc, None)).unwrap();

        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].text, "a\tb\nc");
        assert_eq!(paras[1].text, "");
    }

    #[test]
    fn test_unknown_style_id_falls_back_to_id() {
        let doc = body(r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Sub</w:t></w:r></w:p>"#);

        let paras = DocxReader::new().read(package(&doc, None)).unwrap();

        assert_eq!(paras[0].style_name, "Heading2");
        assert_eq!(paras[0].class, StyleClass::Heading(2));
    }

    #[test]
    fn test_missing_document_part() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<x/>").unwrap();
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);

        let err = DocxReader::new().read(cursor).unwrap_err();
        assert!(matches!(err, Error::DocxParseError(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let err = DocxReader::new().open("/definitely/not/here.docx").unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}

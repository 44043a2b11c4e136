//! Minimal DOCX writer: headings and styled paragraphs.

use doc2deck_core::{Error, Result};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"</Types>"#
);

const PACKAGE_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#
);

/// Highest heading level with a defined style.
const MAX_HEADING_LEVEL: u8 = 9;

/// Paragraph styles the writer can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocxStyle {
    Normal,
    Title,
    /// Heading level 1 through 9.
    Heading(u8),
    ListBullet,
    IntenseQuote,
}

impl DocxStyle {
    /// The style id referenced from `w:pStyle`.
    pub fn style_id(&self) -> String {
        match self {
            Self::Normal => "Normal".to_string(),
            Self::Title => "Title".to_string(),
            Self::Heading(level) => format!("Heading{}", level),
            Self::ListBullet => "ListBullet".to_string(),
            Self::IntenseQuote => "IntenseQuote".to_string(),
        }
    }

    /// The display name stored in `styles.xml`.
    pub fn style_name(&self) -> String {
        match self {
            Self::Normal => "Normal".to_string(),
            Self::Title => "Title".to_string(),
            Self::Heading(level) => format!("heading {}", level),
            Self::ListBullet => "List Bullet".to_string(),
            Self::IntenseQuote => "Intense Quote".to_string(),
        }
    }
}

/// A document under construction.
#[derive(Debug, Default)]
pub struct DocxBuilder {
    paragraphs: Vec<(DocxStyle, String)>,
}

impl DocxBuilder {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a heading. Level 0 is the document title; levels above 9
    /// are clamped to 9.
    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) -> &mut Self {
        let style = match level {
            0 => DocxStyle::Title,
            n => DocxStyle::Heading(n.min(MAX_HEADING_LEVEL)),
        };
        self.add_styled_paragraph(text, style)
    }

    /// Append a paragraph in the default style.
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_styled_paragraph(text, DocxStyle::Normal)
    }

    /// Append a paragraph in the given style.
    pub fn add_styled_paragraph(&mut self, text: impl Into<String>, style: DocxStyle) -> &mut Self {
        self.paragraphs.push((style, text.into()));
        self
    }

    /// Number of paragraphs added so far.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether no paragraphs have been added.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Write the document to a file, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        log::info!("Saved document: {}", path.display());
        Ok(())
    }

    /// Write the document package to any seekable writer.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts: [(&str, String); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", PACKAGE_RELS_XML.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
            ("word/document.xml", self.document_xml()?),
            ("word/styles.xml", styles_xml()?),
        ];

        for (name, content) in parts.iter() {
            zip.start_file(*name, options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
            zip.write_all(content.as_bytes())?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        Ok(())
    }

    fn document_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.paragraphs.len() * 128);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(xml, r#"<w:document xmlns:w="{}"><w:body>"#, W_NS).map_err(xml_err)?;

        for (style, text) in &self.paragraphs {
            xml.push_str("<w:p>");
            if *style != DocxStyle::Normal {
                write!(xml, r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, style.style_id()).map_err(xml_err)?;
            }
            if !text.is_empty() {
                xml.push_str("<w:r>");
                push_run_content(&mut xml, text)?;
                xml.push_str("</w:r>");
            }
            xml.push_str("</w:p>");
        }

        xml.push_str(
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
        );
        xml.push_str("</w:body></w:document>");
        Ok(xml)
    }
}

/// Emit run content, turning tabs and line breaks into their elements.
/// Other control characters are not legal in XML 1.0 and are dropped.
fn push_run_content(xml: &mut String, text: &str) -> Result<()> {
    let mut segment = String::new();

    let flush = |xml: &mut String, segment: &mut String| -> Result<()> {
        if !segment.is_empty() {
            write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(segment.as_str())).map_err(xml_err)?;
            segment.clear();
        }
        Ok(())
    };

    for c in text.chars() {
        match c {
            '\t' => {
                flush(xml, &mut segment)?;
                xml.push_str("<w:tab/>");
            }
            '\n' => {
                flush(xml, &mut segment)?;
                xml.push_str("<w:br/>");
            }
            c if c.is_control() => {}
            _ => segment.push(c),
        }
    }
    flush(xml, &mut segment)
}

fn styles_xml() -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(xml, r#"<w:styles xmlns:w="{}">"#, W_NS).map_err(xml_err)?;
    xml.push_str(
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
    );

    write!(
        xml,
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="{}"/><w:qFormat/></w:style>"#,
        DocxStyle::Normal.style_name()
    )
    .map_err(xml_err)?;

    write!(
        xml,
        r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="{}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:rPr><w:sz w:val="56"/></w:rPr></w:style>"#,
        DocxStyle::Title.style_name()
    )
    .map_err(xml_err)?;

    for level in 1..=MAX_HEADING_LEVEL {
        let style = DocxStyle::Heading(level);
        let size = 32u32.saturating_sub(2 * u32::from(level)).max(22);
        write!(
            xml,
            r#"<w:style w:type="paragraph" w:styleId="{}"><w:name w:val="{}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="{}"/></w:pPr><w:rPr><w:b/><w:sz w:val="{}"/></w:rPr></w:style>"#,
            style.style_id(),
            style.style_name(),
            level - 1,
            size
        )
        .map_err(xml_err)?;
    }

    write!(
        xml,
        r#"<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="{}"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:style>"#,
        DocxStyle::ListBullet.style_name()
    )
    .map_err(xml_err)?;

    write!(
        xml,
        r#"<w:style w:type="paragraph" w:styleId="IntenseQuote"><w:name w:val="{}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:before="360" w:after="360"/><w:ind w:left="864" w:right="864"/><w:jc w:val="center"/></w:pPr><w:rPr><w:i/></w:rPr></w:style>"#,
        DocxStyle::IntenseQuote.style_name()
    )
    .map_err(xml_err)?;

    xml.push_str("</w:styles>");
    Ok(xml)
}

fn xml_err(e: std::fmt::Error) -> Error {
    Error::XmlError(e.to_string())
}

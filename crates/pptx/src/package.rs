//! In-memory PPTX package.
//!
//! Every part of the source archive is kept in archive order so that a
//! template round-trips byte-for-byte apart from the parts we rewrite.

use crate::content_types::{ContentTypes, CONTENT_TYPES_PART};
use crate::rels::{rels_part_for, resolve_target, Relationships, REL_OFFICE_DOCUMENT};
use doc2deck_core::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Default location of the main presentation part.
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

macro_rules! blank_part {
    ($name:literal) => {
        ($name, include_str!(concat!("../resources/blank/", $name)))
    };
}

/// Parts of the built-in blank template: one master, a title layout and a
/// title-and-content layout.
const BLANK_PARTS: &[(&str, &str)] = &[
    blank_part!("[Content_Types].xml"),
    blank_part!("_rels/.rels"),
    blank_part!("docProps/core.xml"),
    blank_part!("docProps/app.xml"),
    blank_part!("ppt/presentation.xml"),
    blank_part!("ppt/_rels/presentation.xml.rels"),
    blank_part!("ppt/presProps.xml"),
    blank_part!("ppt/viewProps.xml"),
    blank_part!("ppt/tableStyles.xml"),
    blank_part!("ppt/theme/theme1.xml"),
    blank_part!("ppt/slideMasters/slideMaster1.xml"),
    blank_part!("ppt/slideMasters/_rels/slideMaster1.xml.rels"),
    blank_part!("ppt/slideLayouts/slideLayout1.xml"),
    blank_part!("ppt/slideLayouts/_rels/slideLayout1.xml.rels"),
    blank_part!("ppt/slideLayouts/slideLayout2.xml"),
    blank_part!("ppt/slideLayouts/_rels/slideLayout2.xml.rels"),
];

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// A PPTX package held in memory.
#[derive(Debug, Clone)]
pub struct PptxPackage {
    parts: Vec<Part>,
}

impl PptxPackage {
    /// The built-in blank presentation.
    pub fn blank() -> Self {
        Self {
            parts: BLANK_PARTS
                .iter()
                .map(|(name, data)| Part {
                    name: name.to_string(),
                    data: data.as_bytes().to_vec(),
                })
                .collect(),
        }
    }

    /// Load a package from a file on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a package from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
            parts.push(Part { name, data });
        }

        Ok(Self { parts })
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.iter().find(|p| p.name == name).map(|p| p.data.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn part_str(&self, name: &str) -> Result<String> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::PptxError(format!("Missing part '{}'", name)))?;
        String::from_utf8(data.to_vec()).map_err(|e| Error::PptxError(format!("Part '{}' is not UTF-8: {}", name, e)))
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Names of every part, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Insert or replace a part. New parts are appended.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Remove a part. Returns whether it existed.
    pub fn remove_part(&mut self, name: &str) -> bool {
        let before = self.parts.len();
        self.parts.retain(|p| p.name != name);
        self.parts.len() != before
    }

    /// Relationships of a source part (empty if it has none).
    pub(crate) fn relationships(&self, source_part: &str) -> Result<Relationships> {
        let rels_part = rels_part_for(source_part);
        if !self.has_part(&rels_part) {
            return Ok(Relationships::default());
        }
        Relationships::parse(&self.part_str(&rels_part)?)
    }

    pub(crate) fn set_relationships(&mut self, source_part: &str, rels: &Relationships) {
        self.set_part(&rels_part_for(source_part), rels.to_xml().into_bytes());
    }

    pub(crate) fn content_types(&self) -> Result<ContentTypes> {
        ContentTypes::parse(&self.part_str(CONTENT_TYPES_PART)?)
    }

    pub(crate) fn set_content_types(&mut self, types: &ContentTypes) {
        self.set_part(CONTENT_TYPES_PART, types.to_xml().into_bytes());
    }

    /// Name of the main presentation part, from the package relationships.
    pub(crate) fn presentation_part(&self) -> Result<String> {
        let rels = self.relationships("")?;
        let part = rels
            .of_type(REL_OFFICE_DOCUMENT)
            .next()
            .map(|r| resolve_target("", &r.target))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());
        Ok(part)
    }

    /// Write the package to a file, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the package as a ZIP archive.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        // The content-type map goes first, as office applications expect.
        let ordered = self
            .parts
            .iter()
            .filter(|p| p.name == CONTENT_TYPES_PART)
            .chain(self.parts.iter().filter(|p| p.name != CONTENT_TYPES_PART));

        for part in ordered {
            zip.start_file(part.name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", part.name, e)))?;
            zip.write_all(&part.data)?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        Ok(())
    }
}

impl Default for PptxPackage {
    fn default() -> Self {
        Self::blank()
    }
}

/// Extract a trailing number from a part name like "slide3.xml" or an id
/// like "rId12".
pub(crate) fn extract_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".rels").trim_end_matches(".xml");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("rId1"), Some(1));
        assert_eq!(extract_number("rId12"), Some(12));
        assert_eq!(extract_number("ppt/slides/slide123.xml"), Some(123));
        assert_eq!(extract_number("nodigits"), None);
    }

    #[test]
    fn test_blank_package_is_complete() {
        let package = PptxPackage::blank();
        assert_eq!(package.presentation_part().unwrap(), "ppt/presentation.xml");

        let types = package.content_types().unwrap();
        for name in package.part_names().filter(|n| !n.ends_with(".rels") && *n != CONTENT_TYPES_PART) {
            assert!(types.content_type_of(name).is_some(), "no content type for {name}");
        }
    }

    #[test]
    fn test_write_and_reload_preserves_parts() {
        let mut package = PptxPackage::blank();
        package.set_part("ppt/media/extra.bin", vec![1, 2, 3]);

        let mut cursor = Cursor::new(Vec::new());
        package.write_to(&mut cursor).unwrap();
        cursor.set_position(0);
        let reloaded = PptxPackage::from_reader(cursor).unwrap();

        assert_eq!(reloaded.part_names().next(), Some(CONTENT_TYPES_PART));
        assert_eq!(reloaded.part("ppt/media/extra.bin"), Some([1u8, 2, 3].as_slice()));
        assert_eq!(reloaded.part_names().count(), package.part_names().count());
    }

    #[test]
    fn test_presentation_part_follows_package_relationship() {
        let mut package = PptxPackage::blank();
        let mut rels = package.relationships("").unwrap();
        let id = rels.of_type(REL_OFFICE_DOCUMENT).next().unwrap().id.clone();
        rels.remove(&id);
        rels.add(REL_OFFICE_DOCUMENT, "/ppt/deck.xml");
        package.set_relationships("", &rels);

        assert_eq!(package.presentation_part().unwrap(), "ppt/deck.xml");
    }

    #[test]
    fn test_set_and_remove_part() {
        let mut package = PptxPackage::blank();
        package.set_part("ppt/presProps.xml", b"<x/>".to_vec());
        assert_eq!(package.part_str("ppt/presProps.xml").unwrap(), "<x/>");
        assert!(package.remove_part("ppt/presProps.xml"));
        assert!(!package.remove_part("ppt/presProps.xml"));
        assert!(matches!(package.part_str("ppt/presProps.xml"), Err(Error::PptxError(_))));
    }
}

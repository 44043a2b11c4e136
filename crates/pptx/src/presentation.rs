//! Reading and rewriting `ppt/presentation.xml`.

use crate::xml::{local_name, prefix, rel_id_attr, xml_error};
use doc2deck_core::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

const RELATIONSHIPS_NS: &[u8] = b"http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Children of `p:presentation` that must come after `p:sldIdLst`.
const AFTER_SLIDE_ID_LIST: &[&[u8]] = &[
    b"sldSz",
    b"notesSz",
    b"smartTags",
    b"embeddedFontLst",
    b"custShowLst",
    b"photoAlbum",
    b"custDataLst",
    b"kinsoku",
    b"defaultTextStyle",
    b"modifyVerifier",
    b"extLst",
];

/// First id handed out to slides in `p:sldIdLst`.
pub(crate) const FIRST_SLIDE_ID: u32 = 256;

/// Relationship id of the first slide master.
pub(crate) fn first_master_rel_id(xml: &str) -> Result<String> {
    rel_ids_of(xml, b"sldMasterId")?
        .into_iter()
        .next()
        .ok_or_else(|| Error::PptxError("Presentation has no slide master".to_string()))
}

/// Relationship ids of the slides, in presentation order.
pub(crate) fn slide_rel_ids(xml: &str) -> Result<Vec<String>> {
    rel_ids_of(xml, b"sldId")
}

/// Relationship ids of every element with the given local name, in order.
pub(crate) fn rel_ids_of(xml: &str, element: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == element => {
                if let Some(id) = rel_id_attr(e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing presentation", e)),
            _ => {}
        }
    }

    Ok(ids)
}

/// Replace the slide id list with `entries` (slide id, relationship id).
///
/// The new list is written where the schema expects it. An empty `entries`
/// removes the list altogether.
pub(crate) fn rewrite_slide_id_list(xml: &str, entries: &[(u32, String)]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + entries.len() * 48));

    let mut depth = 0usize;
    let mut skipping = false;
    let mut inserted = false;
    let mut names = ListNames::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error("Error parsing presentation", e))?;

        if skipping {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 1 {
                        skipping = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let opens = matches!(event, Event::Start(_));
                let qname = e.name();
                let name = local_name(qname.as_ref());

                if depth == 0 {
                    names = ListNames::from_root(e);
                } else if depth == 1 {
                    if name == b"sldIdLst" {
                        if opens {
                            skipping = true;
                            depth += 1;
                        }
                        continue;
                    }
                    if !inserted && AFTER_SLIDE_ID_LIST.contains(&name) {
                        write_slide_id_list(&mut writer, &names, entries)?;
                        inserted = true;
                    }
                }

                if opens {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 && !inserted {
                    write_slide_id_list(&mut writer, &names, entries)?;
                    inserted = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }

        writer
            .write_event(event)
            .map_err(|e| xml_error("Error writing presentation", e))?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::XmlError(e.to_string()))
}

/// Qualified names used when writing the slide id list.
#[derive(Debug)]
struct ListNames {
    list: String,
    item: String,
    rel_id: String,
}

impl Default for ListNames {
    fn default() -> Self {
        Self {
            list: "p:sldIdLst".to_string(),
            item: "p:sldId".to_string(),
            rel_id: "r:id".to_string(),
        }
    }
}

impl ListNames {
    /// Take the element prefix from the root and find the prefix bound to
    /// the relationships namespace.
    fn from_root(root: &BytesStart<'_>) -> Self {
        let qname = root.name();
        let element_prefix = prefix(qname.as_ref()).map(|p| String::from_utf8_lossy(p).to_string());

        let rel_prefix = root.attributes().flatten().find_map(|a| {
            let key = a.key.as_ref();
            if prefix(key) == Some(b"xmlns".as_slice()) && &*a.value == RELATIONSHIPS_NS {
                Some(String::from_utf8_lossy(local_name(key)).to_string())
            } else {
                None
            }
        });

        let qualify = |p: &Option<String>, local: &str| match p {
            Some(p) => format!("{}:{}", p, local),
            None => local.to_string(),
        };

        Self {
            list: qualify(&element_prefix, "sldIdLst"),
            item: qualify(&element_prefix, "sldId"),
            rel_id: qualify(&Some(rel_prefix.unwrap_or_else(|| "r".to_string())), "id"),
        }
    }
}

fn write_slide_id_list(writer: &mut Writer<Vec<u8>>, names: &ListNames, entries: &[(u32, String)]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    emit(writer, Event::Start(BytesStart::new(names.list.as_str())))?;
    for (id, rel_id) in entries {
        let id = id.to_string();
        let mut item = BytesStart::new(names.item.as_str());
        item.push_attribute(("id", id.as_str()));
        item.push_attribute((names.rel_id.as_str(), rel_id.as_str()));
        emit(writer, Event::Empty(item))?;
    }
    emit(writer, Event::End(BytesEnd::new(names.list.as_str())))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| xml_error("Error writing slide list", e))
}

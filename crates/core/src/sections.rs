//! Section extraction: group a document's paragraphs under the nearest
//! preceding heading.

use crate::types::{Paragraph, Section};

/// Group paragraphs into sections.
///
/// Each heading starts a new section and closes the previous one. Other
/// non-empty paragraphs are appended to the current section. Empty
/// paragraphs are skipped, and paragraphs that appear before the first
/// heading belong to no section and are dropped.
pub fn extract_sections(paragraphs: &[Paragraph]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for para in paragraphs {
        let text = para.text.trim();
        if text.is_empty() {
            continue;
        }

        if para.is_heading() {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(Section::new(text));
        } else if let Some(ref mut section) = current {
            section.content.push(text.to_string());
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }

    log::info!("Extracted {} sections", sections.len());
    sections
}

//! Text cleanup for scraped HTML content.
//!
//! Text is NFC-normalized and has its line endings unified. Prose has its
//! whitespace collapsed; code keeps its lines and indentation.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse any whitespace run, line breaks included, into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// How whitespace in an element's text is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Headings, paragraphs and list items: one line, single spaces.
    #[default]
    Inline,
    /// Code blocks: line breaks and indentation kept.
    Preformatted,
}

/// Cleans the descendant text of a scraped element.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCleaner {
    mode: TextMode,
}

impl TextCleaner {
    pub fn new(mode: TextMode) -> Self {
        Self { mode }
    }

    /// Clean raw element text. Returns an empty string for blank input.
    pub fn clean(&self, raw: &str) -> String {
        let text: String = raw.nfc().collect();
        let text = text.replace("\r\n", "\n").replace('\r', "\n");

        match self.mode {
            TextMode::Inline => WHITESPACE_COLLAPSE_REGEX.replace_all(&text, " ").trim().to_string(),
            TextMode::Preformatted => {
                let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
                let first = lines.iter().position(|l| !l.is_empty());
                let last = lines.iter().rposition(|l| !l.is_empty());
                match (first, last) {
                    (Some(first), Some(last)) => lines[first..=last].join("\n"),
                    _ => String::new(),
                }
            }
        }
    }
}

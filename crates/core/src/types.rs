//! Domain types shared by the readers, generators, and builders.

use serde::{Deserialize, Serialize};

/// A single paragraph read from a source document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Raw paragraph text (not trimmed).
    pub text: String,

    /// Style name as it appears in the document (e.g. "heading 1").
    pub style_name: String,

    /// Classification of the style, resolved once when the document is read.
    pub class: StyleClass,
}

impl Paragraph {
    /// Create a paragraph, classifying its style name.
    pub fn new(text: impl Into<String>, style_name: impl Into<String>) -> Self {
        let style_name = style_name.into();
        let class = StyleClass::from_style_name(&style_name);
        Self {
            text: text.into(),
            style_name,
            class,
        }
    }

    /// Create a paragraph with the default body style.
    pub fn body(text: impl Into<String>) -> Self {
        Self::new(text, "Normal")
    }

    /// Create a heading paragraph at the given level.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Self::new(text, format!("Heading {}", level))
    }

    /// Whether this paragraph starts a new section.
    pub fn is_heading(&self) -> bool {
        matches!(self.class, StyleClass::Heading(_))
    }
}

/// Structural role of a paragraph style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleClass {
    /// A heading style, with its outline level (1-based).
    Heading(u8),
    /// A list paragraph style.
    ListItem,
    /// A quote or code-block style.
    Quote,
    /// Anything else.
    Body,
}

impl StyleClass {
    /// Classify a style by its display name.
    ///
    /// Matching is case-insensitive: both "Heading 2" and "heading 2" are
    /// level-2 headings. A heading without a trailing number is level 1.
    pub fn from_style_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();

        if let Some(rest) = lower.strip_prefix("heading") {
            let level = rest.trim().parse::<u8>().unwrap_or(1).max(1);
            return Self::Heading(level);
        }

        if lower.starts_with("list") {
            return Self::ListItem;
        }

        if lower.contains("quote") {
            return Self::Quote;
        }

        Self::Body
    }
}

/// A heading plus the paragraphs that follow it up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text.
    pub title: String,

    /// Non-empty, trimmed paragraph texts in document order.
    pub content: Vec<String>,
}

impl Section {
    /// Create an empty section with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    /// Create a section with content lines.
    pub fn with_content<I, S>(title: impl Into<String>, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            content: content.into_iter().map(Into::into).collect(),
        }
    }
}

/// Title and bullets for one slide, prior to presentation assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Slide title.
    pub title: String,

    /// Bullet lines, rendered as a flat list.
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl SlideSpec {
    /// Create a slide spec.
    pub fn new<I, S>(title: impl Into<String>, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            bullets: bullets.into_iter().map(Into::into).collect(),
        }
    }
}

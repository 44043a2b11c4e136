//! Error types for document reading, deck building, and module scraping.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur anywhere in the conversion pipelines.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input document does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// ZIP archive error (for DOCX and PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(String),

    /// The DOCX package is missing required parts or is malformed.
    #[error("DOCX parsing error: {0}")]
    DocxParseError(String),

    /// The PPTX package or template is missing required parts or is malformed.
    #[error("PPTX error: {0}")]
    PptxError(String),

    /// The template has no slide layout at the requested index.
    #[error("Template has no slide layout at index {index} ({available} available)")]
    MissingLayout { index: usize, available: usize },

    /// A slide layout lacks a placeholder the builder needs to fill.
    #[error("Slide {slide} has no {placeholder} placeholder (layout '{layout}')")]
    MissingPlaceholder {
        slide: usize,
        placeholder: String,
        layout: String,
    },

    /// An HTTP request failed or returned a non-success status.
    #[error("Failed to fetch '{url}': {reason}")]
    FetchError { url: String, reason: String },

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The start page does not contain the unit navigation list.
    #[error("Could not find unit navigation list '#{list_id}' on {url}")]
    NavigationNotFound { list_id: String, url: String },

    /// The navigation list exists but contains no links.
    #[error("No unit links found on {0}")]
    NoUnitLinks(String),

    /// A required credential is absent from the environment.
    #[error("Missing required environment variable {0}")]
    MissingCredential(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_placeholder_display() {
        let e = Error::MissingPlaceholder {
            slide: 2,
            placeholder: "body (idx 1)".into(),
            layout: "ppt/slideLayouts/slideLayout2.xml".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Slide 2"), "got: {msg}");
        assert!(msg.contains("body (idx 1)"), "got: {msg}");
    }

    #[test]
    fn test_navigation_not_found_display() {
        let e = Error::NavigationNotFound {
            list_id: "unit-list".into(),
            url: "https://example.com/module/".into(),
        };
        assert!(e.to_string().contains("#unit-list"));
    }
}

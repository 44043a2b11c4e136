//! Core domain types, section extraction, and deterministic slide
//! generation for turning word-processing documents into slide decks.

pub mod error;
pub mod outline;
pub mod sections;
pub mod types;

pub use error::{Error, Result};
pub use outline::{BasicSlideConfig, BasicSlideGenerator};
pub use sections::extract_sections;
pub use types::{Paragraph, Section, SlideSpec, StyleClass};

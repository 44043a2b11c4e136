//! PPTX (Office Open XML) presentation building and reading.
//!
//! A deck is built on top of a template package (or the built-in blank one)
//! whose own slides are removed first. New slides clone the placeholders of
//! the layout they are based on, then receive title and bullet text.

pub mod assemble;
pub mod builder;
mod content_types;
pub mod layout;
pub mod package;
mod presentation;
pub mod reader;
mod rels;
mod xml;

pub use assemble::{build_outline_deck, build_presentation, slides_from_specs, CONTENT_LAYOUT, TITLE_LAYOUT};
pub use builder::{PresentationBuilder, SlideDraft};
pub use layout::{Placeholder, PlaceholderKind, SlideLayout};
pub use package::PptxPackage;
pub use reader::{PptxReader, SlideOutline};

//! DOCX (Office Open XML) backend.
//!
//! Reads the body paragraph stream of a .docx file with style names, and
//! writes simple documents made of headings and styled paragraphs.

pub mod reader;
pub mod writer;
mod xml;

pub use reader::DocxReader;
pub use writer::{DocxBuilder, DocxStyle};

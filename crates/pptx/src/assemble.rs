//! Whole-deck assembly from slide specs or document sections.

use crate::builder::PresentationBuilder;
use doc2deck_core::{Result, Section, SlideSpec};
use log::info;
use std::path::Path;

/// Index of the title-slide layout.
pub const TITLE_LAYOUT: usize = 0;

/// Index of the title-and-content layout.
pub const CONTENT_LAYOUT: usize = 1;

/// Build a deck with one title-and-content slide per spec and save it to
/// `output`, replacing any existing file.
pub fn build_presentation(template: Option<&Path>, specs: &[SlideSpec], output: &Path) -> Result<()> {
    let builder = slides_from_specs(PresentationBuilder::open(template)?, specs)?;
    let count = builder.slide_count();
    builder.save(output)?;
    info!("Saved {} slides to {}", count, output.display());
    Ok(())
}

/// Add one title-and-content slide per spec.
pub fn slides_from_specs(mut builder: PresentationBuilder, specs: &[SlideSpec]) -> Result<PresentationBuilder> {
    for spec in specs {
        builder
            .add_slide(CONTENT_LAYOUT)?
            .set_title(&spec.title)?
            .set_body(&spec.bullets)?;
    }
    Ok(builder)
}

/// A title slide followed by one slide per section carrying every content
/// line. Sections without content keep an empty body.
pub fn build_outline_deck(template: Option<&Path>, title: &str, sections: &[Section]) -> Result<PresentationBuilder> {
    let mut builder = PresentationBuilder::open(template)?;

    builder.add_slide(TITLE_LAYOUT)?.set_title(title)?;

    for section in sections {
        let slide = builder.add_slide(CONTENT_LAYOUT)?.set_title(&section.title)?;
        if !section.content.is_empty() {
            slide.set_body(&section.content)?;
        }
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PptxPackage;
    use crate::reader::PptxReader;
    use tempfile::tempdir;

    fn titles(path: &Path) -> Vec<String> {
        PptxReader::new()
            .open(path)
            .unwrap()
            .into_iter()
            .map(|s| s.title.unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_build_presentation_keeps_spec_order() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("deck.pptx");
        let specs = vec![
            SlideSpec::new("Intro", ["Welcome to the module"]),
            SlideSpec::new("Conclusion", ["Wrap up", "Next steps"]),
        ];

        build_presentation(None, &specs, &output).unwrap();

        assert_eq!(titles(&output), vec!["Intro", "Conclusion"]);
        let slides = PptxReader::new().open(&output).unwrap();
        assert_eq!(slides[1].body, vec!["Wrap up", "Next steps"]);
    }

    #[test]
    fn test_template_slides_are_dropped() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.pptx");
        let output = dir.path().join("deck.pptx");

        let old: Vec<SlideSpec> = (0..4).map(|i| SlideSpec::new(format!("Old {}", i), ["stale bullet"])).collect();
        build_presentation(None, &old, &template).unwrap();

        let specs: Vec<SlideSpec> = (0..3).map(|i| SlideSpec::new(format!("New {}", i), Vec::<String>::new())).collect();
        build_presentation(Some(template.as_path()), &specs, &output).unwrap();

        assert_eq!(titles(&output), vec!["New 0", "New 1", "New 2"]);
        let package = PptxPackage::open(&output).unwrap();
        assert!(!package.has_part("ppt/slides/slide4.xml"));
    }

    #[test]
    fn test_output_is_overwritten() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("deck.pptx");
        std::fs::write(&output, b"not a deck").unwrap();

        build_presentation(None, &[SlideSpec::new("Only", ["x"])], &output).unwrap();

        assert_eq!(titles(&output), vec!["Only"]);
    }

    #[test]
    fn test_missing_template() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("nope.pptx");
        let err = build_presentation(Some(template.as_path()), &[], &dir.path().join("out.pptx")).unwrap_err();
        assert!(matches!(err, doc2deck_core::Error::InputNotFound(_)));
        assert!(!dir.path().join("out.pptx").exists());
    }

    #[test]
    fn test_outline_deck_has_title_slide() {
        let sections = vec![
            Section::with_content("Intro", ["a", "b", "c"]),
            Section::new("Empty"),
        ];

        let package = build_outline_deck(None, "my-notes", &sections).unwrap().into_package().unwrap();
        let slides = PptxReader::new().read_package(&package).unwrap();

        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].title.as_deref(), Some("my-notes"));
        assert_eq!(slides[1].body, vec!["a", "b", "c"]);
        assert!(slides[2].body.is_empty());
    }
}

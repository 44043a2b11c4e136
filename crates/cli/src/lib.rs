//! Shared plumbing for the doc2deck binaries.

use doc2deck_core::{extract_sections, Error, Result};
use doc2deck_docx::DocxReader;
use doc2deck_pptx::{build_outline_deck, PptxReader};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Initialize `env_logger`; `RUST_LOG` overrides the default filter.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

/// `<dir>/<stem>_presentation.pptx` next to the input document.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let file_name = format!("{}_presentation.pptx", stem);

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Pick the template to build on.
///
/// An explicit template is always used, so a missing file is reported by
/// the builder. The default template is only used if it exists.
pub fn resolve_template(explicit: Option<PathBuf>, default: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path),
        None if default.exists() => Some(default.to_path_buf()),
        None => {
            warn!("Template {} not found, using the blank presentation", default.display());
            None
        }
    }
}

/// Convert a document into a deck: a title slide named after the file, then
/// one slide per section with all of its content lines. Returns the output
/// path.
pub fn convert_document(docx: &Path, output: Option<&Path>, template: Option<&Path>) -> Result<PathBuf> {
    let paragraphs = DocxReader::new().open(docx)?;
    let sections = extract_sections(&paragraphs);

    let title = docx
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidConfig(format!("Cannot derive a title from {}", docx.display())))?;

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| default_output_path(docx));
    build_outline_deck(template, title, &sections)?.save(&output)?;
    info!("Converted {} sections from {}", sections.len(), docx.display());

    Ok(output)
}

/// Log the title and body of every slide in a written deck at debug level.
pub fn log_outline(path: &Path) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }

    match PptxReader::new().open(path) {
        Ok(slides) => {
            for slide in slides {
                match serde_json::to_string(&slide) {
                    Ok(json) => debug!("{}", json),
                    Err(e) => debug!("Slide {}: {}", slide.number, e),
                }
            }
        }
        Err(e) => warn!("Could not read back {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc2deck_core::BasicSlideGenerator;
    use doc2deck_docx::DocxBuilder;
    use doc2deck_pptx::build_presentation;
    use tempfile::tempdir;

    fn write_sample_docx(path: &Path) {
        let mut doc = DocxBuilder::new();
        doc.add_paragraph("Lost preface before any heading")
            .add_heading("Intro", 1)
            .add_paragraph("Agents plan and call tools for you")
            .add_paragraph("Tiny")
            .add_heading("Conclusion", 2)
            .add_paragraph("Review what the module covered");
        doc.save(path).unwrap();
    }

    fn titles(path: &Path) -> Vec<String> {
        PptxReader::new()
            .open(path)
            .unwrap()
            .into_iter()
            .map(|s| s.title.unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("notes/module.docx")),
            PathBuf::from("notes/module_presentation.pptx")
        );
        assert_eq!(default_output_path(Path::new("module.docx")), PathBuf::from("module_presentation.pptx"));
    }

    #[test]
    fn test_resolve_template() {
        let dir = tempdir().unwrap();
        let default = dir.path().join("speaker-template.pptx");

        assert_eq!(resolve_template(None, &default), None);
        assert_eq!(
            resolve_template(Some(PathBuf::from("mine.pptx")), &default),
            Some(PathBuf::from("mine.pptx"))
        );

        std::fs::write(&default, b"").unwrap();
        assert_eq!(resolve_template(None, &default), Some(default.clone()));
    }

    #[test]
    fn test_convert_document() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("module.docx");
        write_sample_docx(&input);

        let output = convert_document(&input, None, None).unwrap();

        assert_eq!(output, dir.path().join("module_presentation.pptx"));
        assert_eq!(titles(&output), vec!["module", "Intro", "Conclusion"]);
        let slides = PptxReader::new().open(&output).unwrap();
        assert_eq!(slides[1].body, vec!["Agents plan and call tools for you", "Tiny"]);
    }

    #[test]
    fn test_convert_missing_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.pptx");

        let err = convert_document(&dir.path().join("missing.docx"), Some(&output), None).unwrap_err();

        assert!(matches!(err, Error::InputNotFound(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_deterministic_pipeline_keeps_section_titles() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("module.docx");
        let output = dir.path().join("deck.pptx");
        write_sample_docx(&input);

        let sections = extract_sections(&DocxReader::new().open(&input).unwrap());
        let specs = BasicSlideGenerator::new().generate(&sections);
        build_presentation(None, &specs, &output).unwrap();

        assert_eq!(titles(&output), vec!["Intro", "Conclusion"]);
        let slides = PptxReader::new().open(&output).unwrap();
        assert_eq!(slides[0].body, vec!["Agents plan and call tools for you"]);
    }
}

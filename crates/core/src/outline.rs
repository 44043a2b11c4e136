//! Deterministic slide generation.
//!
//! One slide per section, using the first few substantive content lines as
//! bullets. This is also the fallback when AI-assisted generation fails.

use crate::types::{Section, SlideSpec};

/// Settings for the deterministic slide generator.
#[derive(Debug, Clone)]
pub struct BasicSlideConfig {
    /// Maximum bullets per slide.
    max_bullets: usize,

    /// Lines must be strictly longer than this many characters.
    min_line_len: usize,

    /// Section titles that never become slides.
    excluded_titles: Vec<String>,

    /// Lines starting with this prefix are already bullets and are skipped.
    bullet_glyph: String,

    /// Bullet used when no line qualifies.
    placeholder: String,
}

impl Default for BasicSlideConfig {
    fn default() -> Self {
        Self {
            max_bullets: 5,
            min_line_len: 10,
            excluded_titles: vec!["Feedback".to_string()],
            bullet_glyph: "•".to_string(),
            placeholder: "Content to be added".to_string(),
        }
    }
}

impl BasicSlideConfig {
    /// Create a config with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of bullets per slide (at least 1).
    pub fn with_max_bullets(mut self, max: usize) -> Self {
        self.max_bullets = max.max(1);
        self
    }

    /// Set the minimum line length threshold.
    pub fn with_min_line_len(mut self, len: usize) -> Self {
        self.min_line_len = len;
        self
    }

    /// Set the section titles to exclude.
    pub fn with_excluded_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Set the placeholder bullet.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

/// Deterministic section-to-slide generator.
#[derive(Debug, Clone, Default)]
pub struct BasicSlideGenerator {
    config: BasicSlideConfig,
}

impl BasicSlideGenerator {
    /// Create a generator with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with custom settings.
    pub fn with_config(config: BasicSlideConfig) -> Self {
        Self { config }
    }

    /// Generate one slide per non-excluded section, in section order.
    pub fn generate(&self, sections: &[Section]) -> Vec<SlideSpec> {
        let slides: Vec<SlideSpec> = sections
            .iter()
            .filter(|s| !self.is_excluded(&s.title))
            .map(|s| SlideSpec {
                title: s.title.clone(),
                bullets: self.select_bullets(&s.content),
            })
            .collect();

        log::info!("Generated {} basic slides", slides.len());
        slides
    }

    /// Pick bullets from a section's content. Never returns an empty list.
    pub fn select_bullets(&self, content: &[String]) -> Vec<String> {
        let bullets: Vec<String> = content
            .iter()
            .filter(|line| !line.starts_with(self.config.bullet_glyph.as_str()))
            .filter(|line| line.chars().count() > self.config.min_line_len)
            .take(self.config.max_bullets)
            .cloned()
            .collect();

        if bullets.is_empty() {
            vec![self.config.placeholder.clone()]
        } else {
            bullets
        }
    }

    fn is_excluded(&self, title: &str) -> bool {
        self.config.excluded_titles.iter().any(|t| t == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_bullets_caps_at_five() {
        let gen = BasicSlideGenerator::new();
        let content: Vec<String> = (1..=8).map(|i| format!("Substantive line number {}", i)).collect();

        let bullets = gen.select_bullets(&content);

        assert_eq!(bullets.len(), 5);
        assert_eq!(bullets[0], "Substantive line number 1");
        assert_eq!(bullets[4], "Substantive line number 5");
    }

    #[test]
    fn test_select_bullets_skips_short_and_glyph_lines() {
        let gen = BasicSlideGenerator::new();
        let content = lines(&[
            "short",
            "exactly10c",
            "• An existing bullet line that is long",
            "eleven char",
            "A properly long content line",
        ]);

        let bullets = gen.select_bullets(&content);

        assert_eq!(bullets, lines(&["eleven char", "A properly long content line"]));
    }

    #[test]
    fn test_select_bullets_placeholder_when_nothing_qualifies() {
        let gen = BasicSlideGenerator::new();

        assert_eq!(gen.select_bullets(&[]), vec!["Content to be added"]);
        assert_eq!(gen.select_bullets(&lines(&["tiny", "• bulleted already long"])), vec!["Content to be added"]);
    }

    #[test]
    fn test_min_length_counts_characters_not_bytes() {
        let gen = BasicSlideGenerator::new();
        // 10 characters, 20 bytes
        let content = lines(&["éééééééééé"]);
        assert_eq!(gen.select_bullets(&content), vec!["Content to be added"]);
    }

    #[test]
    fn test_generate_skips_feedback_and_keeps_order() {
        let gen = BasicSlideGenerator::new();
        let sections = vec![
            Section::with_content("Intro", ["Welcome to this module on agents"]),
            Section::with_content("Feedback", ["Please rate this module today"]),
            Section::new("Conclusion"),
        ];

        let slides = gen.generate(&sections);

        let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Conclusion"]);
        assert_eq!(slides[1].bullets, vec!["Content to be added"]);
        assert!(slides.iter().all(|s| !s.bullets.is_empty()));
    }

    #[test]
    fn test_custom_config() {
        let config = BasicSlideConfig::new()
            .with_max_bullets(2)
            .with_min_line_len(0)
            .with_excluded_titles(["Skip me"])
            .with_placeholder("TBD");
        let gen = BasicSlideGenerator::with_config(config);
        let sections = vec![
            Section::with_content("Keep", ["a", "b", "c"]),
            Section::new("Skip me"),
            Section::new("Empty"),
        ];

        let slides = gen.generate(&sections);

        assert_eq!(slides, vec![SlideSpec::new("Keep", ["a", "b"]), SlideSpec::new("Empty", ["TBD"])]);
    }
}

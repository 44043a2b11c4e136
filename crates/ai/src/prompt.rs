//! Prompts for slide generation, optionally loaded from a `.prompty` file.

use crate::client::ChatMessage;
use crate::error::GenerationFailure;
use doc2deck_core::{Result, Section};
use log::{debug, info};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const SYSTEM_PROMPT: &str = r#"You're an AI presentation architect. Convert document sections into concise, engaging PowerPoint slides.
For each section:
1. Create a clear title slide
2. Extract 4-6 key points as bullet points
3. Ensure consistency of tone and style
4. Focus on impactful information

The response format must be a valid JSON array of slide objects:
[
    {
        "title": "Slide Title",
        "bullets": ["Bullet point 1", "Bullet point 2", "..."]
    }
]

Include a title slide and a closing/questions slide as bookends."#;

pub const USER_TEMPLATE: &str = r#"I need to convert these document sections into PowerPoint slides.

Document sections:
{{sections}}

Please generate a presentation structure with appropriate slides, following best practices for presentations."#;

/// A line holding only a role marker such as `system:`.
static ROLE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^[ \t]*(system|user|assistant)[ \t]*:[ \t]*\r?$").unwrap());

static SECTIONS_PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{\s*sections\s*\}\}").unwrap());

/// System instruction and user message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system: String,
    user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptTemplate {
    pub fn builtin() -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: USER_TEMPLATE.to_string(),
        }
    }

    /// Load a prompt file, or the built-in prompts if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Prompt file {} not found, using built-in prompts", path.display());
            return Ok(Self::builtin());
        }

        let text = std::fs::read_to_string(path)?;
        info!("Loaded prompts from {}", path.display());
        Ok(Self::parse(&text))
    }

    /// Parse prompt file text.
    ///
    /// A leading `---` front-matter block is skipped. The rest is split on
    /// `system:` / `user:` marker lines; a part that is missing or empty
    /// keeps the built-in text. Text without any marker is the system prompt.
    pub fn parse(text: &str) -> Self {
        let body = strip_front_matter(text);
        let mut template = Self::builtin();

        let markers: Vec<_> = ROLE_MARKER_REGEX.captures_iter(body).collect();
        if markers.is_empty() {
            if !body.trim().is_empty() {
                template.system = body.trim().to_string();
            }
            return template;
        }

        for (i, caps) in markers.iter().enumerate() {
            let (Some(whole), Some(role)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(body.len());
            let content = body[whole.end()..end].trim();
            if content.is_empty() {
                continue;
            }

            match role.as_str().to_lowercase().as_str() {
                "system" => template.system = content.to_string(),
                "user" => template.user = content.to_string(),
                _ => {}
            }
        }

        template
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user_template(&self) -> &str {
        &self.user
    }

    /// The user message for these sections.
    ///
    /// Sections are serialized as JSON into `{{sections}}`, or appended when
    /// the template has no placeholder.
    pub fn render_user(&self, sections: &[Section]) -> std::result::Result<String, GenerationFailure> {
        let json = serde_json::to_string(sections).map_err(|e| GenerationFailure::Prompt(e.to_string()))?;

        if SECTIONS_PLACEHOLDER_REGEX.is_match(&self.user) {
            Ok(SECTIONS_PLACEHOLDER_REGEX
                .replace_all(&self.user, regex::NoExpand(&json))
                .into_owned())
        } else {
            Ok(format!("{}\n\n{}", self.user, json))
        }
    }

    /// System and user messages for one request.
    pub fn messages(&self, sections: &[Section]) -> std::result::Result<Vec<ChatMessage>, GenerationFailure> {
        Ok(vec![
            ChatMessage::system(self.system.as_str()),
            ChatMessage::user(self.render_user(sections)?),
        ])
    }
}

fn strip_front_matter(text: &str) -> &str {
    let trimmed = text.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed.strip_prefix("---") else {
        return trimmed;
    };
    let Some(first_newline) = rest.find('\n') else {
        return trimmed;
    };
    if !rest[..first_newline].trim().is_empty() {
        return trimmed;
    }

    let rest = &rest[first_newline + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == "---" {
            return &rest[offset..];
        }
    }
    trimmed
}

//! AI-assisted slide generation with deterministic fallback.

use crate::client::ChatClient;
use crate::error::GenerationFailure;
use crate::prompt::PromptTemplate;
use doc2deck_core::{BasicSlideGenerator, Section, SlideSpec};
use log::{error, info};
use serde_json::Value;

/// Generates slide specs through a chat model, falling back to
/// [`BasicSlideGenerator`] when the request fails in any way.
pub struct AiSlideGenerator<C> {
    client: C,
    prompt: PromptTemplate,
    fallback: BasicSlideGenerator,
}

impl<C: ChatClient> AiSlideGenerator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            prompt: PromptTemplate::builtin(),
            fallback: BasicSlideGenerator::new(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// One chat request for all sections. The call is not retried.
    pub fn request_slides(&self, sections: &[Section]) -> Result<Vec<SlideSpec>, GenerationFailure> {
        let messages = self.prompt.messages(sections)?;
        let raw = self.client.complete_json(&messages)?;
        let slides = parse_slides(&raw)?;
        info!("Generated {} slides via AI", slides.len());
        Ok(slides)
    }

    /// Model slides, or the deterministic slides if the request failed.
    pub fn generate(&self, sections: &[Section]) -> Vec<SlideSpec> {
        match self.request_slides(sections) {
            Ok(slides) => slides,
            Err(failure) => {
                error!("Error generating slides: {}", failure);
                let slides = self.fallback.generate(sections);
                info!("Generated {} basic slides after error", slides.len());
                slides
            }
        }
    }
}

/// Parse a completion as a JSON array of slides or an object with a
/// `slides` array.
///
/// Each slide needs a string `title`; `bullets` may be omitted. Bookend
/// slides are not checked for.
pub fn parse_slides(raw: &str) -> Result<Vec<SlideSpec>, GenerationFailure> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| GenerationFailure::MalformedJson(e.to_string()))?;

    let slides = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("slides") {
            Some(slides @ Value::Array(_)) => slides,
            _ => return Err(GenerationFailure::MissingSlides),
        },
        _ => return Err(GenerationFailure::MissingSlides),
    };

    serde_json::from_value(slides).map_err(|e| GenerationFailure::MalformedJson(format!("slide entry: {}", e)))
}

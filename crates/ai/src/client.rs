//! Chat-completion clients.

use crate::config::AzureOpenAiConfig;
use crate::error::GenerationFailure;
use doc2deck_core::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-completion endpoint that answers in JSON.
pub trait ChatClient {
    /// Send the conversation with JSON output requested and return the raw
    /// text of the first choice.
    fn complete_json(&self, messages: &[ChatMessage]) -> std::result::Result<String, GenerationFailure>;
}

impl<C: ChatClient + ?Sized> ChatClient for &C {
    fn complete_json(&self, messages: &[ChatMessage]) -> std::result::Result<String, GenerationFailure> {
        (**self).complete_json(messages)
    }
}

impl<C: ChatClient + ?Sized> ChatClient for Box<C> {
    fn complete_json(&self, messages: &[ChatMessage]) -> std::result::Result<String, GenerationFailure> {
        (**self).complete_json(messages)
    }
}

/// Azure OpenAI chat completions over blocking HTTP.
pub struct AzureChatClient {
    config: AzureOpenAiConfig,
    http: reqwest::blocking::Client,
}

impl AzureChatClient {
    pub fn new(config: AzureOpenAiConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("doc2deck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatClient for AzureChatClient {
    fn complete_json(&self, messages: &[ChatMessage]) -> std::result::Result<String, GenerationFailure> {
        let url = self.config.chat_completions_url();
        debug!("POST {}", url);

        let body = CompletionRequest {
            model: self.config.deployment(),
            messages,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let response = self
            .http
            .post(&url)
            .header("api-key", self.config.api_key())
            .json(&body)
            .send()
            .map_err(|e| GenerationFailure::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .map_err(|e| GenerationFailure::Request(e.to_string()))?;
        completion_content(&text)
    }
}

/// Extract the first choice's message content from a completion response body.
fn completion_content(body: &str) -> std::result::Result<String, GenerationFailure> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationFailure::MalformedJson(format!("completion envelope: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationFailure::EmptyCompletion)
}

//! AI-assisted slide generation.
//!
//! Sections are sent to an Azure OpenAI chat deployment which answers with
//! slide specs as JSON. Any failure along the way falls back to the
//! deterministic generator from `doc2deck-core`.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod prompt;

pub use client::{AzureChatClient, ChatClient, ChatMessage, Role};
pub use config::AzureOpenAiConfig;
pub use error::GenerationFailure;
pub use generator::{parse_slides, AiSlideGenerator};
pub use prompt::PromptTemplate;

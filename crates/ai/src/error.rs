//! Why an AI generation attempt produced no slides.

use thiserror::Error;

/// Failure of a single chat-completion slide request.
#[derive(Error, Debug)]
pub enum GenerationFailure {
    /// The request could not be built or sent, or the connection failed.
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion contained no message content")]
    EmptyCompletion,

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Response has no slide array")]
    MissingSlides,

    #[error("Could not build prompt: {0}")]
    Prompt(String),
}

//! Azure OpenAI connection settings.

use doc2deck_core::{Error, Result};
use std::fmt;

pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";
pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
pub const API_VERSION_VAR: &str = "AZURE_OPENAI_API_VERSION";
pub const DEPLOYMENT_VAR: &str = "AZURE_OPENAI_DEPLOYMENT";

pub const DEFAULT_API_VERSION: &str = "2025-01-01-preview";
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o";

/// Credentials and target deployment for chat completions.
///
/// Built once per run and handed to the client; nothing is read from the
/// environment after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureOpenAiConfig {
    api_key: String,
    endpoint: String,
    api_version: String,
    deployment: String,
}

impl AzureOpenAiConfig {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    /// Read the configuration from process environment variables.
    ///
    /// The API key and endpoint are required; API version and deployment
    /// fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or_else(|| Error::MissingCredential(API_KEY_VAR.to_string()))?;
        let endpoint = non_empty(ENDPOINT_VAR).ok_or_else(|| Error::MissingCredential(ENDPOINT_VAR.to_string()))?;

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::InvalidConfig(format!(
                "{} must be an http(s) URL, got '{}'",
                ENDPOINT_VAR, endpoint
            )));
        }

        let mut config = Self::new(api_key, endpoint);
        if let Some(version) = non_empty(API_VERSION_VAR) {
            config = config.with_api_version(version);
        }
        if let Some(deployment) = non_empty(DEPLOYMENT_VAR) {
            config = config.with_deployment(deployment);
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// URL of the chat-completions operation for the configured deployment.
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

impl fmt::Debug for AzureOpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .finish()
    }
}

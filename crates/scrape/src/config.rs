//! Scraper settings.

use std::time::Duration;

/// Start page of the Semantic Kernel agent training module.
pub const DEFAULT_MODULE_URL: &str =
    "https://learn.microsoft.com/en-us/training/modules/develop-ai-agent-with-semantic-kernel/";

pub const DEFAULT_NAV_LIST_ID: &str = "unit-list";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Settings for one scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Base URL that relative unit links are resolved against.
    pub base_url: String,

    /// `id` of the `ul` element holding the unit links.
    pub nav_list_id: String,

    /// Pause after each unit page.
    pub delay: Duration,

    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_URL)
    }
}

impl ScrapeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            nav_list_id: DEFAULT_NAV_LIST_ID.to_string(),
            delay: DEFAULT_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_nav_list_id(mut self, id: impl Into<String>) -> Self {
        self.nav_list_id = id.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

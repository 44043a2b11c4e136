//! Module scraper: discovers the unit pages of an online training module
//! and aggregates their content into one DOCX document.

pub mod config;
pub mod fetch;
pub mod module;
pub mod text;

pub use config::{ScrapeConfig, DEFAULT_MODULE_URL, DEFAULT_NAV_LIST_ID, DEFAULT_USER_AGENT};
pub use fetch::{HttpFetcher, Pacer, PageFetcher, SleepPacer};
pub use module::{extract_content, parse_unit_links, ModuleScraper};

//! Scrape an online training module into a single Word document.

use anyhow::{Context, Result};
use clap::Parser;
use doc2deck_cli::init_logging;
use doc2deck_scrape::{
    HttpFetcher, ModuleScraper, ScrapeConfig, SleepPacer, DEFAULT_MODULE_URL, DEFAULT_NAV_LIST_ID, DEFAULT_USER_AGENT,
};
use std::path::PathBuf;
use std::time::Duration;

/// Scrape every unit of a training module into one .docx file.
#[derive(Parser, Debug)]
#[command(name = "module2docx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Module start page
    #[arg(default_value = DEFAULT_MODULE_URL)]
    url: String,

    /// Base URL for resolving unit links (default: the start page)
    #[arg(long)]
    base_url: Option<String>,

    /// `id` of the list holding the unit links
    #[arg(long, default_value = DEFAULT_NAV_LIST_ID)]
    nav_list_id: String,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Output Word document
    #[arg(short, long, default_value = "develop-ai-agent-with-semantic-kernel.docx")]
    output: PathBuf,

    /// Pause after each unit page, in milliseconds
    #[arg(long, default_value = "1000")]
    delay_ms: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ScrapeConfig::new(args.base_url.clone().unwrap_or_else(|| args.url.clone()))
        .with_nav_list_id(args.nav_list_id.as_str())
        .with_user_agent(args.user_agent.as_str())
        .with_delay(Duration::from_millis(args.delay_ms));
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let scraper = ModuleScraper::new(config, fetcher, SleepPacer);

    let doc = scraper
        .scrape_module(&args.url)
        .with_context(|| format!("Failed to scrape {}", args.url))?;

    doc.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Saved module to: {}", args.output.display());
    Ok(())
}

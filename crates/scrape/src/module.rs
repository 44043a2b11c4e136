//! Link discovery and content aggregation for a training module.

use crate::config::ScrapeConfig;
use crate::fetch::{Pacer, PageFetcher};
use crate::text::{TextCleaner, TextMode};
use doc2deck_core::{Error, Result};
use doc2deck_docx::{DocxBuilder, DocxStyle};
use log::{info, warn};
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static MAIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").unwrap());
static CONTENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, p, li, pre, code").unwrap());

/// Collect the unit links of a module start page.
///
/// Links inside `ul#<nav_list_id>` are resolved against `base_url` and
/// de-duplicated, keeping first-seen order.
pub fn parse_unit_links(html: &str, page_url: &str, config: &ScrapeConfig) -> Result<Vec<String>> {
    let base = Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl {
        url: config.base_url.clone(),
        reason: e.to_string(),
    })?;
    let nav_selector = Selector::parse(&format!("ul#{}", config.nav_list_id))
        .map_err(|e| Error::InvalidConfig(format!("Bad navigation list id '{}': {:?}", config.nav_list_id, e)))?;

    let document = Html::parse_document(html);
    let nav = document
        .select(&nav_selector)
        .next()
        .ok_or_else(|| Error::NavigationNotFound {
            list_id: config.nav_list_id.clone(),
            url: page_url.to_string(),
        })?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in nav.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match base.join(href.trim()) {
            Ok(url) => {
                let url = url.to_string();
                if seen.insert(url.clone()) {
                    links.push(url);
                }
            }
            Err(e) => warn!("Skipping unit link '{}': {}", href, e),
        }
    }

    Ok(links)
}

/// Append the content of one unit page to `doc`. Returns the number of
/// paragraphs added; a page without `main` adds none.
pub fn extract_content(html: &str, doc: &mut DocxBuilder) -> usize {
    let document = Html::parse_document(html);
    let Some(main) = document.select(&MAIN_SELECTOR).next() else {
        return 0;
    };

    let mut added = 0;
    for element in main.select(&CONTENT_SELECTOR) {
        let tag = element.value().name();
        let mode = match tag {
            "pre" | "code" => TextMode::Preformatted,
            _ => TextMode::Inline,
        };
        let text = TextCleaner::new(mode).clean(&element.text().collect::<String>());
        if text.is_empty() {
            continue;
        }

        match tag {
            "h1" => doc.add_heading(text, 1),
            "h2" => doc.add_heading(text, 2),
            "h3" => doc.add_heading(text, 3),
            "p" => doc.add_paragraph(text),
            "li" => doc.add_styled_paragraph(format!("• {}", text), DocxStyle::ListBullet),
            _ => doc.add_styled_paragraph(text, DocxStyle::IntenseQuote),
        };
        added += 1;
    }

    added
}

/// Two-phase scraper: discover unit links, then fetch each unit in order.
pub struct ModuleScraper<F, P> {
    config: ScrapeConfig,
    fetcher: F,
    pacer: P,
}

impl<F: PageFetcher, P: Pacer> ModuleScraper<F, P> {
    pub fn new(config: ScrapeConfig, fetcher: F, pacer: P) -> Self {
        Self { config, fetcher, pacer }
    }

    /// Fetch the start page and return its unit links.
    ///
    /// A missing navigation list and an empty one are both errors.
    pub fn discover_unit_links(&self, start_url: &str) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(start_url)?;
        let links = parse_unit_links(&html, start_url, &self.config)?;
        if links.is_empty() {
            return Err(Error::NoUnitLinks(start_url.to_string()));
        }
        info!("Found {} unit pages", links.len());
        Ok(links)
    }

    /// Scrape every unit page into one document.
    ///
    /// The first failed fetch aborts the run; nothing is returned for the
    /// pages gathered before it.
    pub fn scrape_module(&self, start_url: &str) -> Result<DocxBuilder> {
        let links = self.discover_unit_links(start_url)?;
        let mut doc = DocxBuilder::new();

        for (i, url) in links.iter().enumerate() {
            info!("Scraping page {}: {}", i + 1, url);
            let html = self.fetcher.fetch(url)?;
            extract_content(&html, &mut doc);
            self.pacer.pause(self.config.delay);
        }

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc2deck_core::{extract_sections, StyleClass};
    use doc2deck_docx::DocxReader;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::time::Duration;

    const BASE: &str = "https://learn.example.com/modules/agents/";

    const START_PAGE: &str = r#"<html><body>
      <nav><ul id="unit-list">
        <li><a href="1-introduction">Introduction</a></li>
        <li><a href="2-build">Build</a></li>
        <li><a href="/modules/agents/1-introduction">Introduction again</a></li>
        <li><a href="3-summary">Summary</a></li>
        <li><a>No link</a></li>
      </ul></nav>
      <a href="elsewhere">Outside</a>
    </body></html>"#;

    const UNIT_PAGE: &str = r#"<html><body>
      <header><h1>Site header</h1></header>
      <main>
        <h1>Introduction</h1>
        <p>Agents   combine
           models and tools.</p>
        <ul><li>Plan</li><li>  </li></ul>
        <h2>Example</h2>
        <pre>kernel = Kernel()
    agent = build(kernel)</pre>
      </main>
    </body></html>"#;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Fetch(String),
        Pause(Duration),
    }

    /// Serves canned pages and records fetches and pauses in one log.
    struct FakeSite {
        pages: HashMap<String, String>,
        events: RefCell<Vec<Event>>,
    }

    impl FakeSite {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages.iter().map(|(u, p)| (u.to_string(), p.to_string())).collect(),
                events: RefCell::new(Vec::new()),
            }
        }

        fn fetches(&self) -> usize {
            self.events.borrow().iter().filter(|e| matches!(e, Event::Fetch(_))).count()
        }

        fn pauses(&self) -> usize {
            self.events.borrow().iter().filter(|e| matches!(e, Event::Pause(_))).count()
        }
    }

    impl PageFetcher for FakeSite {
        fn fetch(&self, url: &str) -> Result<String> {
            self.events.borrow_mut().push(Event::Fetch(url.to_string()));
            self.pages.get(url).cloned().ok_or_else(|| Error::FetchError {
                url: url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
        }
    }

    impl Pacer for FakeSite {
        fn pause(&self, delay: Duration) {
            self.events.borrow_mut().push(Event::Pause(delay));
        }
    }

    fn unit(name: &str) -> String {
        format!("{}{}", BASE, name)
    }

    #[test]
    fn test_unit_links_are_resolved_and_deduplicated() {
        let links = parse_unit_links(START_PAGE, BASE, &ScrapeConfig::new(BASE)).unwrap();
        assert_eq!(links, vec![unit("1-introduction"), unit("2-build"), unit("3-summary")]);
    }

    #[test]
    fn test_missing_navigation_list() {
        let err = parse_unit_links("<html><body><ul id=\"other\"></ul></body></html>", BASE, &ScrapeConfig::new(BASE))
            .unwrap_err();
        assert!(matches!(err, Error::NavigationNotFound { ref list_id, .. } if list_id == "unit-list"));
    }

    #[test]
    fn test_custom_navigation_list_id() {
        let html = r#"<ul id="unit-list"><li><a href="wrong">No</a></li></ul>
            <ol><li>skip</li></ol>
            <ul id="units"><li><a href="right">Yes</a></li></ul>"#;
        let config = ScrapeConfig::new(BASE).with_nav_list_id("units");

        assert_eq!(parse_unit_links(html, BASE, &config).unwrap(), vec![unit("right")]);
    }

    #[test]
    fn test_each_unique_unit_fetched_once_with_pacing() {
        let (u1, u2, u3) = (unit("1-introduction"), unit("2-build"), unit("3-summary"));
        let site = FakeSite::new(&[(BASE, START_PAGE), (&u1, UNIT_PAGE), (&u2, UNIT_PAGE), (&u3, UNIT_PAGE)]);
        let delay = Duration::from_millis(250);
        let config = ScrapeConfig::new(BASE).with_delay(delay);

        let doc = ModuleScraper::new(config, &site, &site).scrape_module(BASE).unwrap();

        assert_eq!(
            *site.events.borrow(),
            vec![
                Event::Fetch(BASE.to_string()),
                Event::Fetch(u1),
                Event::Pause(delay),
                Event::Fetch(u2),
                Event::Pause(delay),
                Event::Fetch(u3),
                Event::Pause(delay),
            ]
        );
        assert_eq!(doc.len(), 15);
    }

    #[test]
    fn test_empty_navigation_list_aborts() {
        let site = FakeSite::new(&[(BASE, r#"<ul id="unit-list"><li>Soon</li></ul>"#)]);

        let err = ModuleScraper::new(ScrapeConfig::new(BASE), &site, &site)
            .scrape_module(BASE)
            .unwrap_err();

        assert!(matches!(err, Error::NoUnitLinks(_)));
        assert_eq!(site.fetches(), 1);
    }

    #[test]
    fn test_page_fetch_error_aborts_run() {
        let u1 = unit("1-introduction");
        let site = FakeSite::new(&[(BASE, START_PAGE), (&u1, UNIT_PAGE)]);

        let err = ModuleScraper::new(ScrapeConfig::new(BASE), &site, &site)
            .scrape_module(BASE)
            .unwrap_err();

        assert!(matches!(err, Error::FetchError { ref url, .. } if *url == unit("2-build")));
        assert_eq!(site.fetches(), 3);
        assert_eq!(site.pauses(), 1);
    }

    #[test]
    fn test_scraped_terminal_output_saves_cleanly() {
        let u1 = unit("1-introduction");
        let page = "<main><pre>echo \u{1b}[31mred\u{1b}[0m</pre><p>bell\u{7}here</p></main>";
        let start = format!(r#"<ul id="unit-list"><li><a href="{}">One</a></li></ul>"#, u1);
        let site = FakeSite::new(&[(BASE, start.as_str()), (&u1, page)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.docx");

        ModuleScraper::new(ScrapeConfig::new(BASE).with_delay(Duration::ZERO), &site, &site)
            .scrape_module(BASE)
            .unwrap()
            .save(&path)
            .unwrap();

        let texts: Vec<String> = DocxReader::new().open(&path).unwrap().into_iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["echo [31mred[0m", "bellhere"]);
    }

    #[test]
    fn test_extract_content_styles() {
        let mut doc = DocxBuilder::new();
        let added = extract_content(UNIT_PAGE, &mut doc);
        assert_eq!(added, 5);

        let mut buffer = Cursor::new(Vec::new());
        doc.write_to(&mut buffer).unwrap();
        buffer.set_position(0);
        let paragraphs = DocxReader::new().read(buffer).unwrap();

        let texts: Vec<_> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Introduction",
                "Agents combine models and tools.",
                "• Plan",
                "Example",
                "kernel = Kernel()\n    agent = build(kernel)",
            ]
        );
        assert_eq!(paragraphs[0].class, StyleClass::Heading(1));
        assert_eq!(paragraphs[2].class, StyleClass::ListItem);
        assert_eq!(paragraphs[3].class, StyleClass::Heading(2));
        assert_eq!(paragraphs[4].class, StyleClass::Quote);

        let sections = extract_sections(&paragraphs);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, vec!["Agents combine models and tools.", "• Plan"]);
    }

    #[test]
    fn test_page_without_main_adds_nothing() {
        let mut doc = DocxBuilder::new();
        assert_eq!(extract_content("<html><body><p>Loose</p></body></html>", &mut doc), 0);
        assert!(doc.is_empty());
    }
}

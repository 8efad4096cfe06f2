pub mod browser;
pub mod cleaner;
pub mod extractor;
pub mod links;
pub mod selectors;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::{ProgramRecord, SearchResult};

use self::browser::{Browser, Page};
use self::cleaner::{detail_to_record, Rejection};
use self::extractor::extract_details;
use self::links::collect_links;

// ── Per-page outcome ──────────────────────────────────────────────────────────

/// What one detail-page visit produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Kept(ProgramRecord),
    /// Page loaded but names were missing or off-topic.
    Filtered { url: String, reason: Rejection },
    /// Navigation or browser failure on this page only.
    Failed { url: String, reason: String },
}

// ── mytcas scraper ────────────────────────────────────────────────────────────

pub struct MytcasScraper<'a> {
    browser: &'a dyn Browser,
    config: &'a ScraperConfig,
}

impl<'a> MytcasScraper<'a> {
    pub fn new(browser: &'a dyn Browser, config: &'a ScraperConfig) -> Self {
        Self { browser, config }
    }

    /// Search every keyword on one shared tab. A failing keyword is logged
    /// and contributes nothing.
    pub async fn search_all(&self, keywords: &[String]) -> Result<Vec<SearchResult>, ScrapeError> {
        let page = self.browser.new_page().await?;
        let mut all = Vec::new();

        for keyword in keywords {
            info!("===== Searching '{}' =====", keyword);
            match collect_links(page.as_ref(), keyword, self.config).await {
                Ok(found) => all.extend(found),
                Err(e) => warn!("Search for '{}' failed: {}", keyword, e),
            }
        }

        if let Err(e) = page.close().await {
            warn!("Closing search tab: {}", e);
        }
        Ok(all)
    }

    /// Visit one detail page in its own tab. The tab is closed whatever happens.
    pub async fn fetch_program(&self, link: &SearchResult) -> PageOutcome {
        let page = match self.browser.new_page().await {
            Ok(p) => p,
            Err(e) => {
                return PageOutcome::Failed {
                    url: link.url.clone(),
                    reason: e.to_string(),
                };
            }
        };

        let outcome = self.visit(page.as_ref(), link).await;

        if let Err(e) = page.close().await {
            warn!("Closing tab for {}: {}", link.url, e);
        }
        outcome
    }

    async fn visit(&self, page: &dyn Page, link: &SearchResult) -> PageOutcome {
        if let Err(e) = page.goto(&link.url).await {
            return PageOutcome::Failed {
                url: link.url.clone(),
                reason: e.to_string(),
            };
        }

        let fields = extract_details(page, self.config.probe_timeout()).await;
        debug!("{}: {:?}", link.url, fields);

        match detail_to_record(link, fields, Utc::now().naive_utc()) {
            Ok(rec) => PageOutcome::Kept(rec),
            Err(reason) => PageOutcome::Filtered {
                url: link.url.clone(),
                reason,
            },
        }
    }
}

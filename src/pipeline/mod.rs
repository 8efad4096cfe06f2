//! Pipeline orchestrator: ties browser → scraper → storage together.
//!
//! ## Run
//!
//! `run()`:
//!   1. Search every keyword on one tab, collecting program links (deduplicated
//!      across the whole run; the first keyword to surface a URL owns it)
//!   2. Visit each link in a fresh tab, one at a time, with a fixed pause
//!      between visits
//!   3. Overwrite the output file with the kept records
//!
//! A failing keyword or page only loses its own contribution. Failing to
//! reach the browser at all aborts the run.

use crate::config::AppConfig;
use crate::models::{ProgramRecord, SearchResult};
use crate::scraper::browser::{Browser, WebDriverBrowser};
use crate::scraper::{MytcasScraper, PageOutcome};
use crate::storage::write_records;
use anyhow::{Context, Result};
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, keywords: &[String]) -> Result<PipelineStats> {
        let browser = WebDriverBrowser::launch(&self.config.scraper)
            .await
            .context("Failed to launch browser")?;
        let browser: Box<dyn Browser> = Box::new(browser);

        let scraped = self.scrape(browser.as_ref(), keywords).await;

        if let Err(e) = browser.quit().await {
            warn!("Browser quit: {}", e);
        }
        let (records, stats) = scraped?;

        let scfg = &self.config.scraper;
        write_records(&scfg.output_path, scfg.output_format, &records)
            .context("Failed to write output file")?;

        info!(
            "=== Done: {} keywords | {} links | {} kept | {} filtered | {} failed ===",
            stats.keywords, stats.links, stats.kept, stats.filtered, stats.failed
        );
        Ok(stats)
    }

    /// Everything except launching and saving.
    pub async fn scrape(
        &self,
        browser: &dyn Browser,
        keywords: &[String],
    ) -> Result<(Vec<ProgramRecord>, PipelineStats)> {
        let scraper = MytcasScraper::new(browser, &self.config.scraper);

        // ── 1. Collect links ──────────────────────────────────────────────────
        info!("=== Step 1: Searching {} keywords ===", keywords.len());
        let found = scraper
            .search_all(keywords)
            .await
            .context("Could not open search tab")?;
        let links = dedup_links(found);
        info!("{} unique program links", links.len());
        for l in &links {
            debug!(
                "  {} | {:?} | {:?} | {:?}",
                l.url, l.name, l.faculty, l.university
            );
        }

        // ── 2. Visit detail pages ─────────────────────────────────────────────
        info!("=== Step 2: Visiting {} detail pages ===", links.len());
        let mut records = Vec::new();
        let mut stats = PipelineStats {
            keywords: keywords.len(),
            links: links.len(),
            ..Default::default()
        };

        for (i, link) in links.iter().enumerate() {
            if i > 0 {
                sleep(self.config.scraper.request_delay()).await;
            }
            info!("[{}/{}] {}", i + 1, links.len(), link.url);

            match scraper.fetch_program(link).await {
                PageOutcome::Kept(rec) => {
                    info!(
                        "  {} | {} | {}",
                        rec.university_name, rec.course_name, rec.tuition_fee_raw
                    );
                    records.push(rec);
                    stats.kept += 1;
                }
                PageOutcome::Filtered { url, reason } => {
                    debug!("  dropped {}: {:?}", url, reason);
                    stats.filtered += 1;
                }
                PageOutcome::Failed { url, reason } => {
                    warn!("  {} failed: {}", url, reason);
                    stats.failed += 1;
                }
            }
        }

        Ok((records, stats))
    }
}

/// Keep the first occurrence of every URL across all keywords.
fn dedup_links(found: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    pub keywords: usize,
    pub links: usize,
    pub kept: usize,
    pub filtered: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::browser::fake::{FakeBrowser, FakeDoc, FakeSite};
    use crate::scraper::selectors;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn result_html(ids: &[&str]) -> String {
        let items: String = ids
            .iter()
            .map(|id| format!(r#"<li><a href="/programs/{id}"><span>{id}</span></a></li>"#))
            .collect();
        format!(r#"<html><body><ul class="t-programs">{items}</ul></body></html>"#)
    }

    fn url(id: &str) -> String {
        format!("https://course.mytcas.com/programs/{id}")
    }

    fn detail(uni: &str, course: &str, fee: &str) -> FakeDoc {
        FakeDoc::default()
            .with(&selectors::UNIVERSITY_NAME[0], uni)
            .with(&selectors::COURSE_NAME[0], course)
            .with(&selectors::TUITION_FEE[0], fee)
    }

    fn pipeline() -> Pipeline {
        let mut config = AppConfig::default();
        config.scraper.settle_ms = 0;
        config.scraper.request_delay_ms = 0;
        Pipeline::new(config)
    }

    fn site() -> FakeSite {
        let mut site = FakeSite::default();
        site.search_input = Some(selectors::SEARCH_INPUT[0]);
        site.results.insert("ปัญญาประดิษฐ์".into(), result_html(&["A1", "A2", "A3"]));
        site.results.insert("คอมพิวเตอร์".into(), result_html(&["A3", "C1"]));
        site.pages.insert(url("A1"), detail("มหาวิทยาลัยมหิดล", "วิศวกรรมปัญญาประดิษฐ์", "28,000.-/ภาคการศึกษา"));
        site.pages.insert(url("A2"), FakeDoc::failing());
        site.pages.insert(url("A3"), detail("มหาวิทยาลัยขอนแก่น", "วิศวกรรมคอมพิวเตอร์", "ไม่ระบุ"));
        site.pages.insert(url("C1"), detail("มหาวิทยาลัยธรรมศาสตร์", "บัญชีธุรกิจ", "30,000"));
        site
    }

    #[tokio::test]
    async fn test_run_survives_failed_page() {
        let site = Arc::new(site());
        let browser = FakeBrowser { site: Arc::clone(&site) };
        let keywords = vec!["ปัญญาประดิษฐ์".to_string(), "คอมพิวเตอร์".to_string()];

        let (records, stats) = pipeline().scrape(&browser, &keywords).await.unwrap();

        assert_eq!(
            stats,
            PipelineStats { keywords: 2, links: 4, kept: 2, filtered: 1, failed: 1 }
        );
        let urls: Vec<&str> = records.iter().map(|r| r.source_url.as_str()).collect();
        assert_eq!(urls, vec![url("A1"), url("A3")]);

        assert_eq!(records[0].tuition_fee_numeric, Some(28000.0));
        assert_eq!(records[1].tuition_fee_numeric, None);
        // A3 surfaced under both keywords; the first one owns it
        assert_eq!(records[1].search_term, "ปัญญาประดิษฐ์");
    }

    #[tokio::test]
    async fn test_every_tab_is_closed() {
        let site = Arc::new(site());
        let browser = FakeBrowser { site: Arc::clone(&site) };
        let keywords = vec!["ปัญญาประดิษฐ์".to_string(), "คอมพิวเตอร์".to_string()];

        pipeline().scrape(&browser, &keywords).await.unwrap();

        // one search tab + one per unique link, failed page included
        assert_eq!(site.opened.load(Ordering::SeqCst), 5);
        assert_eq!(site.closed.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_keyword_without_search_box_contributes_nothing() {
        let mut s = site();
        s.search_input = None;
        let browser = FakeBrowser { site: Arc::new(s) };

        let (records, stats) = pipeline()
            .scrape(&browser, &["ปัญญาประดิษฐ์".to_string()])
            .await
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(stats.links, 0);
    }
}

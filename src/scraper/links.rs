use ::scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::SearchResult;
use crate::scraper::browser::Page;
use crate::scraper::selectors;

// ── Search ────────────────────────────────────────────────────────────────────

/// Search the site for `keyword` on an already-open tab and return the
/// program links found, each URL once.
///
/// After submitting, a fixed settle sleep precedes polling for the result
/// list. The sleep papers over the site's client-side rendering and is not
/// a readiness signal.
pub async fn collect_links(
    page: &dyn Page,
    keyword: &str,
    config: &ScraperConfig,
) -> Result<Vec<SearchResult>, ScrapeError> {
    let base = Url::parse(&config.base_url).map_err(|source| ScrapeError::Url {
        url: config.base_url.clone(),
        source,
    })?;

    page.goto(base.as_str()).await?;

    let mut submitted = false;
    for locator in selectors::SEARCH_INPUT {
        if page
            .type_and_submit(locator, keyword, config.search_timeout())
            .await?
        {
            debug!("Search input matched {:?}", locator);
            submitted = true;
            break;
        }
    }
    if !submitted {
        return Err(ScrapeError::SearchInputMissing {
            url: base.to_string(),
        });
    }

    sleep(config.settle()).await;

    if !page
        .wait_visible(&selectors::RESULT_LIST, config.results_timeout())
        .await?
    {
        info!("'{}': no results rendered", keyword);
        return Ok(vec![]);
    }

    let html = page.source().await?;
    let results = parse_result_list(&html, &base, keyword);
    info!("'{}': {} program links", keyword, results.len());
    Ok(results)
}

// ── Result list ───────────────────────────────────────────────────────────────

/// Parse rendered search results. Each item contributes its program link,
/// resolved against `base`, plus the first three text lines as
/// name / faculty / university. Duplicate URLs keep their first occurrence.
pub fn parse_result_list(html: &str, base: &Url, keyword: &str) -> Vec<SearchResult> {
    let doc = Html::parse_document(html);
    let (Ok(item_sel), Ok(link_sel)) = (
        Selector::parse(selectors::RESULT_ITEM_CSS),
        Selector::parse(selectors::RESULT_LINK_CSS),
    ) else {
        warn!("Result selectors failed to parse");
        return vec![];
    };

    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for item in doc.select(&item_sel) {
        let Some(href) = item
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        if !href.contains(selectors::PROGRAM_PATH_MARKER) {
            continue;
        }
        let Ok(url) = base.join(href) else {
            debug!("Unresolvable href {:?}", href);
            continue;
        };
        if !seen.insert(url.to_string()) {
            continue;
        }

        let mut lines = text_lines(item).into_iter();
        results.push(SearchResult {
            keyword: keyword.to_string(),
            url: url.to_string(),
            name: lines.next(),
            faculty: lines.next(),
            university: lines.next(),
        });
    }

    results
}

/// Non-empty trimmed text nodes of an element, in document order.
fn text_lines(el: ElementRef<'_>) -> Vec<String> {
    el.text()
        .flat_map(|t| t.lines())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

// src/pipeline/scrape.rs

//! Scrape pipeline: authenticate once, then walk each college's listing.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, DepartmentResult, NoticeItem, RunResult, SourceConfig};
use crate::services::gateway::{self, Credentials};
use crate::services::{PageFetcher, extract_items};
use crate::utils::{time, url};

/// Advisory note shown when an intranet college is served from its public
/// fallback. Exact wording is part of the output contract.
const FALLBACK_NOTE: &str = "⚠️ WebVPN 不可用，当前显示公开新闻（非通知公告）";

/// Run the full scrape: authenticate at most once, then process each
/// college in configured order.
///
/// Partial failures never abort the run; only configuration defects and
/// client-construction errors propagate.
pub async fn run_scraper(config: &Config, credentials: Option<Credentials>) -> Result<RunResult> {
    let auth = gateway::authenticate(&config.crawler, credentials.as_ref()).await;
    let authenticated = auth.is_authenticated();

    let fetcher = PageFetcher::new(&config.crawler, &auth)?;

    let mut colleges = Vec::with_capacity(config.sources.len());
    for (index, source) in config.sources.iter().enumerate() {
        let result = scrape_college(config, &fetcher, source, authenticated).await?;
        colleges.push(result);

        if index + 1 < config.sources.len() {
            tokio::time::sleep(Duration::from_millis(config.crawler.department_delay_ms)).await;
        }
    }

    Ok(RunResult {
        updated_at: time::run_timestamp(),
        colleges,
    })
}

/// Scrape one college's listing pages.
///
/// Always produces a result, even when every page failed (empty items).
async fn scrape_college(
    config: &Config,
    fetcher: &PageFetcher,
    source: &SourceConfig,
    authenticated: bool,
) -> Result<DepartmentResult> {
    let resolved = source.resolve(authenticated);
    let mode = if resolved.via_gateway {
        "intranet via WebVPN"
    } else {
        "public"
    };
    log::info!("Scraping {} ({}) ...", source.name, mode);

    let mut items: Vec<NoticeItem> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for page_no in 1..=config.crawler.pages_to_fetch {
        let page_url = url::make_page_url(&resolved.url, page_no);
        log::info!("  → {page_url}");

        let page_items = match fetcher.fetch_page(&page_url, resolved.via_gateway).await {
            Ok(Some(document)) => extract_items(&document, &resolved.base_url),
            Ok(None) => {
                log::error!("  could not fetch page {page_no}, skipping remaining pages");
                break;
            }
            Err(e) if e.is_session_expired() => {
                log::warn!("  {e}; stopping pagination for {}", source.id);
                break;
            }
            Err(e) => return Err(e),
        };

        // An empty page means the listing ended
        if page_items.is_empty() {
            log::warn!("  no items on page {page_no}, stopping");
            break;
        }

        // Cross-page dedupe, first occurrence wins
        for item in page_items {
            if seen_urls.insert(item.url.clone()) {
                items.push(item);
            }
        }

        if page_no < config.crawler.pages_to_fetch {
            tokio::time::sleep(Duration::from_millis(config.crawler.page_delay_ms)).await;
        }
    }

    log::info!("  ✓ collected {} items", items.len());

    let note = if source.has_intranet() && !resolved.via_gateway {
        Some(FALLBACK_NOTE.to_string())
    } else {
        None
    };

    Ok(DepartmentResult {
        id: source.id.clone(),
        name: source.name.clone(),
        source_url: resolved.url,
        items,
        note,
    })
}

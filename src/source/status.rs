//! Status-page source
//!
//! Scrapes the service status page for elements carrying the configured
//! status-class marker and classifies each block's text into a
//! [`ServiceHealth`]. An unreachable page or a page with no matching blocks
//! yields no report for the cycle.

use scraper::{Html, Selector};

use super::PageFetcher;
use crate::models::{ServiceHealth, StatusReport};

/// Scraped service-status page
pub struct StatusPageSource {
    fetcher: PageFetcher,
    url: String,
    selector: Selector,
}

impl StatusPageSource {
    /// Create a source for the given page URL and status-block class marker.
    ///
    /// `block_classes` is the whitespace-separated class list that marks one
    /// status block on the page.
    pub fn new(
        fetcher: PageFetcher,
        url: impl Into<String>,
        block_classes: &str,
    ) -> Result<Self, String> {
        let selector = block_selector(block_classes)?;
        Ok(Self {
            fetcher,
            url: url.into(),
            selector,
        })
    }

    /// Source name for logging
    pub fn name(&self) -> &str {
        "status-page"
    }

    /// Fetch and classify the current status page; None when unavailable
    pub async fn fetch_report(&self) -> Option<StatusReport> {
        let html = self.fetcher.get_text(&self.url).await?;
        let report = parse_status_page(&html, &self.selector);
        if report.entries.is_empty() {
            tracing::warn!(url = %self.url, "no status blocks found on page");
        }
        Some(report)
    }
}

/// Build a selector matching `div` elements with every listed class
fn block_selector(block_classes: &str) -> Result<Selector, String> {
    let classes: Vec<&str> = block_classes.split_whitespace().collect();
    if classes.is_empty() {
        return Err("status block class marker must not be empty".to_string());
    }
    let css = format!("div.{}", classes.join("."));
    Selector::parse(&css).map_err(|e| format!("invalid status block selector {css:?}: {e}"))
}

/// Classify every marked block on the page, page order preserved
pub fn parse_status_page(html: &str, selector: &Selector) -> StatusReport {
    let document = Html::parse_document(html);
    let entries = document
        .select(selector)
        .map(|block| {
            let text = block.text().collect::<String>().trim().to_string();
            (ServiceHealth::classify(&text), text)
        })
        .collect();
    StatusReport { entries }
}

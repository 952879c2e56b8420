//! Unstructured fix-page source
//!
//! Scrapes the fixes page for repeated `a.file-item` card blocks. Each block
//! yields a title (the `div.file-name` text with archive extensions
//! stripped), an absolute download link and an optional size. Blocks missing
//! both a name and a link are skipped; results are deduplicated by title
//! preserving first-seen order.
//!
//! Identity note: two fixes whose names differ only by archive extension
//! collapse to the same title. That is the feed's documented dedup-by-title
//! contract, reproduced here on purpose.

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use super::{FetchOutcome, FetchSource, PageFetcher};
use crate::models::Item;

static ARCHIVE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(zip|rar|7z|tar\.gz)$").expect("valid suffix pattern"));

/// Scraped markup page of fix card blocks
pub struct FixFeedSource {
    fetcher: PageFetcher,
    url: String,
}

impl FixFeedSource {
    /// Create a source for the given fixes page URL
    pub fn new(fetcher: PageFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FetchSource for FixFeedSource {
    fn name(&self) -> &str {
        "fix-feed"
    }

    async fn fetch(&self) -> FetchOutcome {
        let Some(html) = self.fetcher.get_text(&self.url).await else {
            return FetchOutcome::Unavailable;
        };

        FetchOutcome::Snapshot(parse_fixes_page(&html, &self.url))
    }
}

/// Extract fix items from page markup.
///
/// `page_url` is the URL the markup was fetched from; relative download
/// links are resolved against it.
pub fn parse_fixes_page(html: &str, page_url: &str) -> Vec<Item> {
    let document = Html::parse_document(html);
    let card = Selector::parse("a.file-item").expect("valid card selector");
    let name = Selector::parse("div.file-name").expect("valid name selector");
    let size = Selector::parse("div.file-size").expect("valid size selector");

    let base = Url::parse(page_url).ok();

    let mut seen_titles = HashSet::new();
    let mut items = Vec::new();

    for block in document.select(&card) {
        let href = block.value().attr("href").map(str::to_string);
        let raw_name = block
            .select(&name)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .filter(|n| !n.is_empty());
        let size = block
            .select(&size)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let title = match (&raw_name, &href) {
            (Some(raw), _) => strip_archive_suffix(raw),
            // Fall back to the link's last path segment when the name block
            // is missing entirely.
            (None, Some(href)) => {
                let segment = href
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or("")
                    .replace("%20", " ");
                strip_archive_suffix(&segment)
            }
            (None, None) => continue,
        };
        if title.is_empty() {
            continue;
        }

        let download = href
            .map(|h| resolve_link(&h, base.as_ref()))
            .unwrap_or_default();

        // dedupe by title, first-seen wins
        if !seen_titles.insert(title.clone()) {
            continue;
        }

        items.push(
            Item::new(title)
                .with_meta("download", download)
                .with_meta("size", size),
        );
    }

    items
}

/// Strip known archive extensions from the end of a file name
fn strip_archive_suffix(name: &str) -> String {
    ARCHIVE_SUFFIX.replace(name, "").trim().to_string()
}

/// Resolve a possibly-relative link against the page base
fn resolve_link(href: &str, base: Option<&Url>) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(url) => url.to_string(),
        None => href.to_string(),
    }
}

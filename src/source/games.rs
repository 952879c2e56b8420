//! Structured game-feed source
//!
//! Fetches a JSON endpoint whose top level must be an array of game objects.
//! Any other top-level shape is treated as a fetch failure. Field names are
//! tolerated across feed revisions: `title|name`, `appid|id`,
//! `img|image|header_image`.

use async_trait::async_trait;
use serde_json::Value;

use super::{FetchOutcome, FetchSource, PageFetcher};
use crate::models::Item;

/// Structured JSON feed of games
pub struct GameFeedSource {
    fetcher: PageFetcher,
    url: String,
}

impl GameFeedSource {
    /// Create a source for the given feed URL
    pub fn new(fetcher: PageFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FetchSource for GameFeedSource {
    fn name(&self) -> &str {
        "game-feed"
    }

    async fn fetch(&self) -> FetchOutcome {
        let Some(value) = self.fetcher.get_json(&self.url).await else {
            return FetchOutcome::Unavailable;
        };

        match items_from_feed(&value) {
            Some(items) => FetchOutcome::Snapshot(items),
            None => {
                tracing::warn!(url = %self.url, "game feed top level is not a JSON array");
                FetchOutcome::Unavailable
            }
        }
    }
}

/// Normalize a feed document into items; None when the top level is not an array
pub fn items_from_feed(value: &Value) -> Option<Vec<Item>> {
    let entries = value.as_array()?;
    Some(entries.iter().map(item_from_entry).collect())
}

/// Normalize one feed object into an item.
///
/// A nameless entry still yields a non-empty key synthesized from the appid
/// so identity is never empty.
fn item_from_entry(entry: &Value) -> Item {
    let name = first_string(entry, &["title", "name"])
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let appid = first_scalar(entry, &["appid", "id"]).unwrap_or_else(|| "N/A".to_string());
    let image = first_string(entry, &["img", "image", "header_image"]);

    let name = if name.is_empty() {
        format!("Unknown Game ({appid})")
    } else {
        name
    };

    let mut item = Item::new(name).with_meta("appid", appid);
    if let Some(image) = image {
        item = item.with_meta("image", image);
    }
    item
}

/// First present string field among the candidates
fn first_string(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| entry.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

/// First present field among the candidates, stringified (ids may be numbers)
fn first_scalar(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match entry.get(*k) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

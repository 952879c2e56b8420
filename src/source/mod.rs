//! Fetch sources for monitored feeds
//!
//! A fetch source retrieves a snapshot of external entities from a remote
//! endpoint and returns either a normalized item list or an explicit
//! [`FetchOutcome::Unavailable`]. Sources never raise: network failure,
//! timeout, non-success status and malformed payloads all degrade to
//! `Unavailable`, which callers treat as "no data this cycle".
//!
//! Three realizations:
//!
//! - [`GameFeedSource`] - structured JSON array feed
//! - [`FixFeedSource`] - scraped markup page of fix card blocks
//! - [`StatusPageSource`] - scraped status page classified into health glyphs

mod fixes;
mod games;
mod status;

pub use fixes::FixFeedSource;
pub use games::GameFeedSource;
pub use status::StatusPageSource;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::models::Item;

/// Result of one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A complete snapshot of the source's current items
    Snapshot(Vec<Item>),
    /// The source could not be read this cycle; skip, do not error
    Unavailable,
}

impl FetchOutcome {
    /// Unwrap the snapshot items, None when unavailable
    pub fn items(self) -> Option<Vec<Item>> {
        match self {
            Self::Snapshot(items) => Some(items),
            Self::Unavailable => None,
        }
    }
}

/// Contract for a monitored remote source
#[async_trait]
pub trait FetchSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &str;

    /// Fetch the current snapshot; degrades to `Unavailable`, never errors
    async fn fetch(&self) -> FetchOutcome;
}

/// Shared HTTP fetcher with timeout and a bounded connection pool
///
/// This is the "never raise" boundary: all transport and decode failures are
/// logged and surfaced as `None`.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Create a fetcher from HTTP settings
    pub fn new(http: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .pool_max_idle_per_host(http.max_connections)
            .gzip(true)
            .user_agent(http.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL and parse the body as JSON
    pub async fn get_json(&self, url: &str) -> Option<serde_json::Value> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "fetch returned non-success");
            return None;
        }

        match response.json().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "fetch body is not valid JSON");
                None
            }
        }
    }

    /// GET a URL and return the body as text
    pub async fn get_text(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "fetch returned non-success");
            return None;
        }

        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "fetch body could not be read");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_items() {
        let snapshot = FetchOutcome::Snapshot(vec![Item::new("Alpha")]);
        assert_eq!(snapshot.items().unwrap().len(), 1);
        assert!(FetchOutcome::Unavailable.items().is_none());
    }

    #[test]
    fn test_fetcher_creation() {
        let fetcher = PageFetcher::new(&HttpConfig::default());
        assert!(fetcher.is_ok());
    }
}

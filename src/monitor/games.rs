//! Game-feed monitor
//!
//! Drives the structured game feed (new/updated pipeline) and the scraped
//! fixes page (fixed pipeline) through one cycle: fetch, diff against the
//! durable seen sets, notify configured destinations, then commit the seen
//! additions once. A skipped delivery still counts as seen: items are
//! announced at most once and never retried.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::diff::{diff, suppress};
use crate::error::Result;
use crate::models::{Feature, Item};
use crate::notify::{render, DiscordApi, Notifier};
use crate::source::{FetchOutcome, FetchSource, FixFeedSource, GameFeedSource, PageFetcher};
use crate::store::GameState;

/// Scheduler for the game-feed domain
pub struct GameMonitor {
    games: Box<dyn FetchSource>,
    fixes: Box<dyn FetchSource>,
    notifier: Notifier,
    state_path: PathBuf,
    interval: Duration,
}

impl GameMonitor {
    /// Create a monitor over explicit sources and transport (test seam)
    pub fn new(
        games: Box<dyn FetchSource>,
        fixes: Box<dyn FetchSource>,
        notifier: Notifier,
        state_path: PathBuf,
        interval: Duration,
    ) -> Self {
        Self {
            games,
            fixes,
            notifier,
            state_path,
            interval,
        }
    }

    /// Create a monitor from configuration with the real feed sources and
    /// Discord transport
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.http)?;
        let games = GameFeedSource::new(fetcher.clone(), config.games.feed_url.clone());
        let fixes = FixFeedSource::new(fetcher, config.games.fixes_url.clone());
        let notifier = Notifier::new(Arc::new(DiscordApi::new(&config.chat)?));

        Ok(Self::new(
            Box::new(games),
            Box::new(fixes),
            notifier,
            config.games.state_path.clone(),
            config.games_interval(),
        ))
    }

    /// Delivery front-end (shared with the command surface)
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Durable state file for this domain
    pub fn state_path(&self) -> &PathBuf {
        &self.state_path
    }

    /// Run the scheduler loop. One cycle per interval; a failed cycle is
    /// logged and the next proceeds.
    pub async fn run(&self) {
        let mut timer = super::cycle_timer(self.interval);
        loop {
            timer.tick().await;
            if let Err(e) = self.run_cycle().await {
                tracing::error!(domain = "games", error = %e, "monitor cycle failed");
            }
        }
    }

    /// One full cycle: new/updated pipeline, then fixes pipeline
    pub async fn run_cycle(&self) -> Result<()> {
        self.process_games().await?;
        self.process_fixes().await?;
        Ok(())
    }

    /// New/updated pipeline over the structured feed.
    ///
    /// Both feature diffs are computed from the same snapshot; a key
    /// announced as NEW this cycle is suppressed from the UPDATED rendering
    /// but still committed to both seen sets.
    async fn process_games(&self) -> Result<()> {
        let snapshot = match self.games.fetch().await {
            FetchOutcome::Snapshot(items) => items,
            FetchOutcome::Unavailable => {
                tracing::debug!(domain = "games", source = self.games.name(), "feed unavailable, skipping cycle");
                return Ok(());
            }
        };

        let state = GameState::load(&self.state_path);
        let by_key: HashMap<&str, &Item> =
            snapshot.iter().map(|i| (i.key.as_str(), i)).collect();

        let new_diff = diff(&snapshot, state.seen(Feature::NewGames));
        let update_diff = diff(&snapshot, state.seen(Feature::UpdatedGames));
        let update_render = suppress(&update_diff, &new_diff.to_announce);

        for key in &new_diff.to_announce {
            let Some(item) = by_key.get(key.as_str()) else {
                continue;
            };
            let payload = render::game_alert(item, Feature::NewGames);
            self.notifier
                .notify(state.channel(Feature::NewGames), &payload, Feature::NewGames)
                .await;
        }

        for key in &update_render {
            let Some(item) = by_key.get(key.as_str()) else {
                continue;
            };
            let payload = render::game_alert(item, Feature::UpdatedGames);
            self.notifier
                .notify(
                    state.channel(Feature::UpdatedGames),
                    &payload,
                    Feature::UpdatedGames,
                )
                .await;
        }

        if !new_diff.is_empty() || !update_diff.is_empty() {
            tracing::info!(
                domain = "games",
                new = new_diff.to_announce.len(),
                updated = update_render.len(),
                "cycle announced items"
            );
        }

        // Commit once, after the whole batch was handed to the notifier.
        GameState::commit_seen(
            &self.state_path,
            &[
                (Feature::NewGames, new_diff.to_announce),
                (Feature::UpdatedGames, update_diff.to_announce),
            ],
        )
        .map_err(|e| {
            tracing::error!(domain = "games", error = %e, "seen-set commit failed, items may re-announce");
            e
        })?;

        Ok(())
    }

    /// Fixes pipeline over the scraped page
    async fn process_fixes(&self) -> Result<()> {
        let snapshot = match self.fixes.fetch().await {
            FetchOutcome::Snapshot(items) => items,
            FetchOutcome::Unavailable => {
                tracing::debug!(domain = "games", source = self.fixes.name(), "fixes page unavailable, skipping");
                return Ok(());
            }
        };

        let state = GameState::load(&self.state_path);
        let by_key: HashMap<&str, &Item> =
            snapshot.iter().map(|i| (i.key.as_str(), i)).collect();

        let fixed_diff = diff(&snapshot, state.seen(Feature::FixedGames));

        for key in &fixed_diff.to_announce {
            let Some(item) = by_key.get(key.as_str()) else {
                continue;
            };
            let payload = render::fix_alert(item);
            self.notifier
                .notify(state.channel(Feature::FixedGames), &payload, Feature::FixedGames)
                .await;
        }

        if !fixed_diff.is_empty() {
            tracing::info!(
                domain = "games",
                fixed = fixed_diff.to_announce.len(),
                "cycle announced fixes"
            );
        }

        GameState::commit_seen(
            &self.state_path,
            &[(Feature::FixedGames, fixed_diff.to_announce)],
        )
        .map_err(|e| {
            tracing::error!(domain = "games", error = %e, "seen-set commit failed, items may re-announce");
            e
        })?;

        Ok(())
    }

    /// Read-only peek: items the next cycle would announce as NEW.
    ///
    /// Never touches the seen set. None when the feed is unavailable.
    pub async fn peek_new(&self) -> Option<Vec<Item>> {
        let snapshot = self.games.fetch().await.items()?;
        let state = GameState::load(&self.state_path);
        let outcome = diff(&snapshot, state.seen(Feature::NewGames));

        let by_key: HashMap<&str, &Item> =
            snapshot.iter().map(|i| (i.key.as_str(), i)).collect();
        Some(
            outcome
                .to_announce
                .iter()
                .filter_map(|k| by_key.get(k.as_str()).map(|i| (*i).clone()))
                .collect(),
        )
    }

    /// Read-only peek: the full current fixes snapshot.
    ///
    /// Never touches the seen set. None when the page is unavailable.
    pub async fn peek_fixes(&self) -> Option<Vec<Item>> {
        self.fixes.fetch().await.items()
    }

    /// Fetch the full game feed for the bulk listing command
    pub async fn fetch_listing(&self) -> Option<Vec<Item>> {
        self.games.fetch().await.items()
    }
}

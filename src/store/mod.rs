//! Durable seen-set and destination state
//!
//! Each monitored domain owns one JSON state file: the game domain keeps
//! per-feature seen sets plus per-feature destination channels, the status
//! domain keeps a guild-to-channel mapping. Loads are tolerant (missing keys
//! default, corrupted files load as empty) and saves are atomic via a temp
//! file rename.
//!
//! Mutation discipline: cycle commits and configuration commands both go
//! through the load-modify-save helpers here, re-reading the live file at
//! the point of mutation. A cycle never writes back a copy it cached across
//! suspension points, so a manual configuration change cannot be lost to an
//! in-flight cycle's commit.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use crate::error::StoreError;
use crate::models::Feature;

/// Game-domain durable state: seen sets and destinations per feature
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GameState {
    pub seen_new: HashSet<String>,
    pub seen_update: HashSet<String>,
    pub seen_fixed: HashSet<String>,
    pub channel_id_new: Option<u64>,
    pub channel_id_update: Option<u64>,
    pub channel_id_fixed: Option<u64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GameState {
    /// Load state from file, default if missing or corrupted
    pub fn load(path: &Path) -> Self {
        load_json(path)
    }

    /// Save state to file atomically
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json(self, path)
    }

    /// Seen set for a game feature.
    ///
    /// The status domain carries no seen set; `Feature::Status` reads as
    /// permanently empty rather than aliasing a game feature's set.
    pub fn seen(&self, feature: Feature) -> &HashSet<String> {
        static NO_SEEN: LazyLock<HashSet<String>> = LazyLock::new(HashSet::new);
        match feature {
            Feature::NewGames => &self.seen_new,
            Feature::UpdatedGames => &self.seen_update,
            Feature::FixedGames => &self.seen_fixed,
            Feature::Status => &NO_SEEN,
        }
    }

    /// Mutable seen set for a game feature; None for the status domain
    fn seen_mut(&mut self, feature: Feature) -> Option<&mut HashSet<String>> {
        match feature {
            Feature::NewGames => Some(&mut self.seen_new),
            Feature::UpdatedGames => Some(&mut self.seen_update),
            Feature::FixedGames => Some(&mut self.seen_fixed),
            Feature::Status => None,
        }
    }

    /// Configured destination channel for a game feature, None when unset
    pub fn channel(&self, feature: Feature) -> Option<u64> {
        match feature {
            Feature::NewGames => self.channel_id_new,
            Feature::UpdatedGames => self.channel_id_update,
            Feature::FixedGames => self.channel_id_fixed,
            Feature::Status => None,
        }
    }

    /// Set the destination channel for a game feature
    pub fn set_channel(&mut self, feature: Feature, channel: u64) {
        match feature {
            Feature::NewGames => self.channel_id_new = Some(channel),
            Feature::UpdatedGames => self.channel_id_update = Some(channel),
            Feature::FixedGames => self.channel_id_fixed = Some(channel),
            Feature::Status => {}
        }
    }

    /// Merge announced keys into the live state file.
    ///
    /// Re-reads the file, extends the named features' seen sets and saves.
    /// Called once per cycle after all items were handed to the notifier. A
    /// no-op (no file write) when every addition list is empty.
    pub fn commit_seen(
        path: &Path,
        additions: &[(Feature, Vec<String>)],
    ) -> Result<(), StoreError> {
        if additions.iter().all(|(_, keys)| keys.is_empty()) {
            return Ok(());
        }

        let mut live = Self::load(path);
        for (feature, keys) in additions {
            if let Some(seen) = live.seen_mut(*feature) {
                seen.extend(keys.iter().cloned());
            }
        }
        live.updated_at = Some(Utc::now());
        live.save(path)
    }

    /// Set a destination channel in the live state file
    pub fn commit_channel(path: &Path, feature: Feature, channel: u64) -> Result<(), StoreError> {
        let mut live = Self::load(path);
        live.set_channel(feature, channel);
        live.updated_at = Some(Utc::now());
        live.save(path)
    }
}

/// Status-domain durable state: destination channel per guild
///
/// Serializes as a bare `{"<guild_id>": channel_id}` object.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct StatusState {
    pub channels: BTreeMap<String, u64>,
}

impl StatusState {
    /// Load state from file, default if missing or corrupted
    pub fn load(path: &Path) -> Self {
        load_json(path)
    }

    /// Save state to file atomically
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json(self, path)
    }

    /// Set a guild's status channel in the live state file
    pub fn commit_channel(path: &Path, guild_id: u64, channel: u64) -> Result<(), StoreError> {
        let mut live = Self::load(path);
        live.channels.insert(guild_id.to_string(), channel);
        live.save(path)
    }
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Atomic write using temp file
    let temp_path = path.with_extension("tmp");
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&temp_path, content)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

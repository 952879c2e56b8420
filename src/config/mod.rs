//! Configuration management for the herald bot
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Every field is defaulted at construction so a
//! partially-specified config never produces ad-hoc key-presence checks
//! downstream.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Shared HTTP fetch settings
    pub http: HttpConfig,

    /// Game-feed domain settings
    pub games: GamesConfig,

    /// Status-page domain settings
    pub status: StatusConfig,

    /// Chat platform settings
    pub chat: ChatConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Shared HTTP fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum idle connections kept per host
    pub max_connections: usize,

    /// User agent string
    pub user_agent: String,
}

/// Game-feed domain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    /// Structured JSON feed of games
    pub feed_url: String,

    /// Unstructured markup page of fixes
    pub fixes_url: String,

    /// Durable state file (seen sets + destinations)
    pub state_path: PathBuf,

    /// Poll interval in seconds
    pub poll_interval_secs: u64,
}

/// Status-page domain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Status page URL
    pub page_url: String,

    /// CSS classes marking a status block on the page
    pub block_classes: String,

    /// Banner image shown on the live status panel
    pub banner_image_url: String,

    /// Durable state file (guild -> channel destinations)
    pub state_path: PathBuf,

    /// Poll interval in seconds (also the countdown duration)
    pub poll_interval_secs: u64,
}

/// Chat platform settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Bot authentication token
    pub token: String,

    /// REST API base URL (overridable for tests)
    pub api_base: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_parse::<u64>("HERALD_REQUEST_TIMEOUT") {
            config.http.request_timeout_secs = v;
        }
        if let Some(v) = env_parse::<usize>("HERALD_MAX_CONNECTIONS") {
            config.http.max_connections = v;
        }
        if let Ok(v) = std::env::var("HERALD_USER_AGENT") {
            config.http.user_agent = v;
        }

        if let Ok(v) = std::env::var("HERALD_GAMES_FEED_URL") {
            config.games.feed_url = v;
        }
        if let Ok(v) = std::env::var("HERALD_FIXES_URL") {
            config.games.fixes_url = v;
        }
        if let Ok(v) = std::env::var("HERALD_GAME_STATE_PATH") {
            config.games.state_path = v.into();
        }
        if let Some(v) = env_parse::<u64>("HERALD_GAMES_INTERVAL") {
            config.games.poll_interval_secs = v;
        }

        if let Ok(v) = std::env::var("HERALD_STATUS_URL") {
            config.status.page_url = v;
        }
        if let Ok(v) = std::env::var("HERALD_STATUS_STATE_PATH") {
            config.status.state_path = v.into();
        }
        if let Some(v) = env_parse::<u64>("HERALD_STATUS_INTERVAL") {
            config.status.poll_interval_secs = v;
        }

        if let Ok(v) = std::env::var("HERALD_BOT_TOKEN") {
            config.chat.token = v;
        }
        if let Ok(v) = std::env::var("HERALD_CHAT_API_BASE") {
            config.chat.api_base = v;
        }

        if let Ok(v) = std::env::var("HERALD_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Ok(v) = std::env::var("HERALD_LOG_FORMAT") {
            config.logging.format = v;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.http.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.games.poll_interval_secs == 0 || self.status.poll_interval_secs == 0 {
            anyhow::bail!("poll intervals must be greater than 0");
        }

        if self.games.feed_url.is_empty() || self.games.fixes_url.is_empty() {
            anyhow::bail!("game feed URLs must not be empty");
        }

        if self.status.page_url.is_empty() {
            anyhow::bail!("status page URL must not be empty");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Get the game-feed poll interval as Duration
    #[must_use]
    pub fn games_interval(&self) -> Duration {
        Duration::from_secs(self.games.poll_interval_secs)
    }

    /// Get the status-page poll interval as Duration
    #[must_use]
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status.poll_interval_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 8,
            max_connections: 100,
            user_agent: format!("herald/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            feed_url: String::from("https://generator.ryuu.lol/files/games.json"),
            fixes_url: String::from("https://generator.ryuu.lol/fixes"),
            state_path: PathBuf::from("data/game_state.json"),
            poll_interval_secs: 300,
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            page_url: String::from("https://status.manifestor.cc/"),
            block_classes: String::from("truncate text-xs font-semibold text-api-up"),
            banner_image_url: String::from(
                "https://media.giphy.com/media/kyLYXonQYYfwYDIeZl/giphy.gif",
            ),
            state_path: PathBuf::from("data/status_state.json"),
            poll_interval_secs: 300,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: String::from("https://discord.com/api/v10"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

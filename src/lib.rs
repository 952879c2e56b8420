//! herald - release-feed and status-page notification bot
//!
//! A polling notification daemon that watches a game-release feed and a
//! service-status page, diffs each snapshot against durable seen state, and
//! posts embeds into configured chat channels with at-most-once-per-item
//! semantics across restarts.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`source`] - Fetch sources (structured feed, scraped pages)
//! - [`diff`] - Change detection against seen sets
//! - [`models`] - Core data structures and types
//! - [`store`] - Durable seen-set and destination state
//! - [`notify`] - Message rendering and delivery
//! - [`monitor`] - Poll schedulers driving the fetch/diff/notify cycles
//! - [`commands`] - Owner-facing chat command handlers
//!
//! # Example
//!
//! ```no_run
//! use herald::config::Config;
//! use herald::monitor::GameMonitor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let _monitor = GameMonitor::from_config(&config)?;
//!     // monitor.run().await;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod source;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::diff::{diff, DiffOutcome};
    pub use crate::error::{Error, NotifyError, Result, StoreError};
    pub use crate::models::{Feature, Item, ServiceHealth, StatusReport};
    pub use crate::notify::{ChatApi, Delivery, MessagePayload, Notifier, SkipReason};
    pub use crate::source::{FetchOutcome, FetchSource};
    pub use crate::store::{GameState, StatusState};
}

// Direct re-exports for convenience
pub use models::{Feature, Item, ServiceHealth};

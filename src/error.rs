//! Unified error handling for the herald crate
//!
//! Fetch failures are deliberately *not* errors: every fetch source degrades
//! to [`crate::source::FetchOutcome::Unavailable`] so a bad cycle is skipped,
//! never propagated. The error types here cover the remaining failure modes:
//! delivery problems at the chat platform and persistence problems with the
//! durable state files.

use std::io;
use thiserror::Error;

/// Errors that can occur while delivering a message to a chat channel
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The destination channel no longer resolves (deleted or never existed)
    #[error("destination channel not found")]
    NotFound,

    /// The bot lacks permission to post or edit in the destination channel
    #[error("missing permission for destination channel")]
    Forbidden,

    /// HTTP transport failure talking to the chat platform
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Chat platform returned an unexpected status code
    #[error("chat platform returned status {0}")]
    Status(u16),

    /// Chat platform response body could not be interpreted
    #[error("malformed chat platform response: {0}")]
    MalformedResponse(String),
}

impl NotifyError {
    /// Classify an HTTP status code from the chat platform.
    ///
    /// 403 and 404 map to the per-item skip reasons; everything else is an
    /// unexpected status.
    pub fn from_status(status: u16) -> Self {
        match status {
            403 => Self::Forbidden,
            404 => Self::NotFound,
            other => Self::Status(other),
        }
    }

    /// Whether the same delivery could plausibly succeed if retried
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NotFound | Self::Forbidden => false,
            Self::Http(_) => true,
            Self::Status(code) => *code >= 500,
            Self::MalformedResponse(_) => false,
        }
    }
}

/// Errors that can occur while loading or saving durable state
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure reading or writing a state file
    #[error("state file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// State file contents could not be serialized
    #[error("state serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Unified error type for the herald crate
#[derive(Error, Debug)]
pub enum Error {
    /// Delivery errors at the chat platform
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),

    /// Durable state persistence errors
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("config error: {0}")]
    Config(String),

    /// HTTP client construction or transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is recoverable (the next cycle may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Notify(e) => e.is_recoverable(),
            // Persistence failures risk re-announcement; surfaced loudly but
            // the next cycle retries the commit.
            Self::Store(_) => true,
            Self::Config(_) => false,
            Self::Http(_) => true,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(NotifyError::from_status(403), NotifyError::Forbidden));
        assert!(matches!(NotifyError::from_status(404), NotifyError::NotFound));
        assert!(matches!(NotifyError::from_status(500), NotifyError::Status(500)));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(!NotifyError::Forbidden.is_recoverable());
        assert!(!NotifyError::NotFound.is_recoverable());
        assert!(NotifyError::Status(503).is_recoverable());
        assert!(!NotifyError::Status(400).is_recoverable());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing bot token");
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("missing bot token"));
    }
}

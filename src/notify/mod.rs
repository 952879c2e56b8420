//! Message rendering and delivery
//!
//! This module turns diffed items into display payloads and drives outbound
//! delivery through a [`ChatApi`] implementation. Delivery failures for one
//! item never abort the rest of a batch: unset destinations are silent,
//! deleted channels and permission failures are logged and skipped.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │      Notifier                        │
//! │  - destination resolution            │
//! │  - per-item skip taxonomy            │
//! │  - delivery logging                  │
//! └──────────────────────────────────────┘
//!                  │
//!                  ▼
//!          ┌──────────────┐
//!          │   ChatApi    │  (Discord REST adapter, test doubles)
//!          └──────────────┘
//! ```

mod discord;
mod paginate;
pub mod render;

pub use discord::DiscordApi;
pub use paginate::{deliver_paged, pages, PAGE_DELAY, PAGE_LINES};

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::NotifyError;
use crate::models::Feature;

/// Maximum characters the platform accepts in an embed description
pub const DESCRIPTION_MAX: usize = 4096;

/// Identifier of a sent message, used for in-place edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(pub String);

/// A renderable outbound message (embed)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePayload {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// Optional large banner image
    pub image_url: Option<String>,
    /// Optional clickable link attached to the title
    pub link_url: Option<String>,
    pub footer: String,
}

impl MessagePayload {
    /// Create a payload, bounding the description to the platform limit
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: truncate_chars(&description.into(), DESCRIPTION_MAX),
            ..Default::default()
        }
    }

    /// Set the accent color
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Set the large banner image
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the title link
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self
    }

    /// Set the footer attribution
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Replace the description, re-applying the length bound
    pub fn set_description(&mut self, description: &str) {
        self.description = truncate_chars(description, DESCRIPTION_MAX);
    }

    /// Replace the footer text
    pub fn set_footer(&mut self, footer: &str) {
        self.footer = footer.to_string();
    }
}

/// Truncate to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Why a delivery was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No destination configured for the feature; silent no-op
    NoDestination,
    /// Destination no longer resolves to a live channel
    NotFound,
    /// Bot lacks permission to post in the destination
    Forbidden,
    /// Transient transport failure; item is still counted as announced
    Transport,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDestination => "no-destination",
            Self::NotFound => "not-found",
            Self::Forbidden => "forbidden",
            Self::Transport => "transport",
        }
    }
}

/// Outcome of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered(MessageId),
    Skipped(SkipReason),
}

impl Delivery {
    /// Whether the message actually reached the channel
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Transport seam to the chat platform
///
/// Implement this trait to deliver through a different platform or to record
/// deliveries in tests.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Post a new message to a channel
    async fn send_message(
        &self,
        channel_id: u64,
        payload: &MessagePayload,
    ) -> Result<MessageId, NotifyError>;

    /// Edit a previously-sent message in place
    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: &MessageId,
        payload: &MessagePayload,
    ) -> Result<(), NotifyError>;
}

/// Delivery front-end applying the per-item skip taxonomy
#[derive(Clone)]
pub struct Notifier {
    api: Arc<dyn ChatApi>,
}

impl Notifier {
    /// Create a notifier over a chat transport
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    /// Access the underlying transport (for edits and pagination)
    pub fn api(&self) -> &Arc<dyn ChatApi> {
        &self.api
    }

    /// Deliver one payload to an optional destination.
    ///
    /// Never errors: every failure mode maps to a [`Delivery::Skipped`] so
    /// the caller's batch continues. Skips other than `NoDestination` are
    /// logged with feature context.
    pub async fn notify(
        &self,
        destination: Option<u64>,
        payload: &MessagePayload,
        feature: Feature,
    ) -> Delivery {
        let Some(channel_id) = destination else {
            return Delivery::Skipped(SkipReason::NoDestination);
        };

        match self.api.send_message(channel_id, payload).await {
            Ok(id) => {
                tracing::debug!(feature = %feature, channel = channel_id, "notification delivered");
                Delivery::Delivered(id)
            }
            Err(NotifyError::NotFound) => {
                tracing::error!(feature = %feature, channel = channel_id, "destination channel not found");
                Delivery::Skipped(SkipReason::NotFound)
            }
            Err(NotifyError::Forbidden) => {
                tracing::error!(feature = %feature, channel = channel_id, "missing access to destination channel");
                Delivery::Skipped(SkipReason::Forbidden)
            }
            Err(e) => {
                tracing::error!(feature = %feature, channel = channel_id, error = %e, "failed to deliver notification");
                Delivery::Skipped(SkipReason::Transport)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_bounded() {
        let long = "x".repeat(DESCRIPTION_MAX + 100);
        let payload = MessagePayload::new("t", long);
        assert_eq!(payload.description.chars().count(), DESCRIPTION_MAX);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ありがとう".repeat(1000);
        let truncated = truncate_chars(&text, DESCRIPTION_MAX);
        assert_eq!(truncated.chars().count(), DESCRIPTION_MAX);
        // Would panic on a byte-slice boundary violation.
        assert!(text.starts_with(&truncated));
    }

    #[test]
    fn test_payload_builder() {
        let payload = MessagePayload::new("Title", "Body")
            .with_color(0x5865F2)
            .with_image("https://cdn/img.png")
            .with_link("https://example.com")
            .with_footer("footer");
        assert_eq!(payload.image_url.as_deref(), Some("https://cdn/img.png"));
        assert_eq!(payload.link_url.as_deref(), Some("https://example.com"));
        assert_eq!(payload.footer, "footer");
    }

    #[test]
    fn test_skip_reason_labels() {
        assert_eq!(SkipReason::NoDestination.as_str(), "no-destination");
        assert_eq!(SkipReason::Forbidden.as_str(), "forbidden");
    }

    #[tokio::test]
    async fn test_notify_without_destination_is_silent_skip() {
        struct NeverCalled;
        #[async_trait]
        impl ChatApi for NeverCalled {
            async fn send_message(
                &self,
                _channel_id: u64,
                _payload: &MessagePayload,
            ) -> Result<MessageId, NotifyError> {
                panic!("send_message must not be called without a destination");
            }
            async fn edit_message(
                &self,
                _channel_id: u64,
                _message_id: &MessageId,
                _payload: &MessagePayload,
            ) -> Result<(), NotifyError> {
                panic!("edit_message must not be called without a destination");
            }
        }

        let notifier = Notifier::new(Arc::new(NeverCalled));
        let delivery = notifier
            .notify(None, &MessagePayload::new("t", "d"), Feature::NewGames)
            .await;
        assert_eq!(delivery, Delivery::Skipped(SkipReason::NoDestination));
    }

    #[tokio::test]
    async fn test_notify_maps_errors_to_skips() {
        struct AlwaysForbidden;
        #[async_trait]
        impl ChatApi for AlwaysForbidden {
            async fn send_message(
                &self,
                _channel_id: u64,
                _payload: &MessagePayload,
            ) -> Result<MessageId, NotifyError> {
                Err(NotifyError::Forbidden)
            }
            async fn edit_message(
                &self,
                _channel_id: u64,
                _message_id: &MessageId,
                _payload: &MessagePayload,
            ) -> Result<(), NotifyError> {
                Err(NotifyError::Forbidden)
            }
        }

        let notifier = Notifier::new(Arc::new(AlwaysForbidden));
        let delivery = notifier
            .notify(Some(1), &MessagePayload::new("t", "d"), Feature::FixedGames)
            .await;
        assert_eq!(delivery, Delivery::Skipped(SkipReason::Forbidden));
    }
}

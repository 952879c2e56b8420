//! Two-stage destination selection workflow
//!
//! The setup command walks the owner through picking a feature and then a
//! destination channel. Instead of nested runtime callbacks, the workflow is
//! an explicit state object advanced by discrete selection events:
//!
//! ```text
//! AwaitingFeature → AwaitingDestination → Committed
//! ```
//!
//! The caller persists the destination when the flow reaches `Committed`.

use crate::models::Feature;

/// Current stage of one setup interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFlow {
    /// Waiting for the owner to pick which feature to configure
    AwaitingFeature,
    /// Feature picked; waiting for the destination channel
    AwaitingDestination { feature: Feature },
    /// Both picked; ready to persist
    Committed { feature: Feature, channel_id: u64 },
}

/// A discrete selection made by the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    FeatureChosen(Feature),
    DestinationChosen(u64),
}

/// An event that does not fit the current stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("selection event out of order")]
pub struct OutOfOrderSelection;

impl SelectionFlow {
    /// Start a fresh setup workflow
    pub fn new() -> Self {
        Self::AwaitingFeature
    }

    /// Advance the workflow by one selection event
    pub fn advance(self, event: SelectionEvent) -> Result<Self, OutOfOrderSelection> {
        match (self, event) {
            (Self::AwaitingFeature, SelectionEvent::FeatureChosen(feature)) => {
                Ok(Self::AwaitingDestination { feature })
            }
            (Self::AwaitingDestination { feature }, SelectionEvent::DestinationChosen(channel_id)) => {
                Ok(Self::Committed {
                    feature,
                    channel_id,
                })
            }
            _ => Err(OutOfOrderSelection),
        }
    }
}

impl Default for SelectionFlow {
    fn default() -> Self {
        Self::new()
    }
}

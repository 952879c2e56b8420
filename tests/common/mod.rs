//! Common test utilities
//!
//! Shared by several test binaries; not every binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use herald::error::NotifyError;
use herald::models::Item;
use herald::notify::{ChatApi, MessageId, MessagePayload};
use herald::source::{FetchOutcome, FetchSource};

/// How the recording transport answers send attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    Deliver,
    Forbidden,
    NotFound,
}

/// In-memory chat transport recording every send and edit
pub struct RecordingApi {
    pub send_mode: SendMode,
    /// Fail edits with 403 once this many have succeeded
    pub edit_forbidden_after: Option<usize>,
    pub sends: Mutex<Vec<(u64, MessagePayload)>>,
    pub edits: Mutex<Vec<(u64, String, MessagePayload)>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            send_mode: SendMode::Deliver,
            edit_forbidden_after: None,
            sends: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
        }
    }

    pub fn with_send_mode(mut self, mode: SendMode) -> Self {
        self.send_mode = mode;
        self
    }

    pub fn with_edit_forbidden_after(mut self, successes: usize) -> Self {
        self.edit_forbidden_after = Some(successes);
        self
    }

    pub fn sent_titles(&self) -> Vec<String> {
        self.sends
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.title.clone())
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().unwrap().len()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatApi for RecordingApi {
    async fn send_message(
        &self,
        channel_id: u64,
        payload: &MessagePayload,
    ) -> Result<MessageId, NotifyError> {
        match self.send_mode {
            SendMode::Forbidden => return Err(NotifyError::Forbidden),
            SendMode::NotFound => return Err(NotifyError::NotFound),
            SendMode::Deliver => {}
        }
        let mut sends = self.sends.lock().unwrap();
        sends.push((channel_id, payload.clone()));
        Ok(MessageId(format!("msg-{}", sends.len())))
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: &MessageId,
        payload: &MessagePayload,
    ) -> Result<(), NotifyError> {
        let mut edits = self.edits.lock().unwrap();
        if let Some(limit) = self.edit_forbidden_after {
            if edits.len() >= limit {
                return Err(NotifyError::Forbidden);
            }
        }
        edits.push((channel_id, message_id.0.clone(), payload.clone()));
        Ok(())
    }
}

/// Fetch source returning a scripted outcome every call
pub struct ScriptedSource {
    name: String,
    outcome: FetchOutcome,
}

impl ScriptedSource {
    pub fn snapshot(name: &str, items: Vec<Item>) -> Self {
        Self {
            name: name.to_string(),
            outcome: FetchOutcome::Snapshot(items),
        }
    }

    pub fn unavailable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcome: FetchOutcome::Unavailable,
        }
    }
}

#[async_trait]
impl FetchSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> FetchOutcome {
        self.outcome.clone()
    }
}

/// Game item with an appid, as the structured feed produces them
pub fn game(name: &str, appid: &str) -> Item {
    Item::new(name).with_meta("appid", appid)
}

//! Discord REST transport
//!
//! Delivers payloads as embeds through the Discord HTTP API: messages are
//! created with `POST /channels/{id}/messages` and edited in place with
//! `PATCH /channels/{id}/messages/{mid}`. HTTP 403 and 404 map onto the
//! per-item skip taxonomy ([`NotifyError::Forbidden`] /
//! [`NotifyError::NotFound`]); everything else surfaces as a transport
//! error.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{ChatApi, MessageId, MessagePayload};
use crate::config::ChatConfig;
use crate::error::NotifyError;

/// Discord REST API adapter
pub struct DiscordApi {
    client: Client,
    api_base: String,
    token: String,
}

impl DiscordApi {
    /// Create an adapter from chat settings
    pub fn new(chat: &ChatConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_base: chat.api_base.trim_end_matches('/').to_string(),
            token: chat.token.clone(),
        })
    }

    /// Build the JSON body for a payload
    fn build_body(&self, payload: &MessagePayload) -> serde_json::Value {
        let mut embed = serde_json::json!({
            "title": payload.title,
            "description": payload.description,
            "color": payload.color,
            "footer": { "text": payload.footer },
        });
        if let Some(image) = &payload.image_url {
            embed["image"] = serde_json::json!({ "url": image });
        }
        if let Some(link) = &payload.link_url {
            embed["url"] = serde_json::json!(link);
        }
        serde_json::json!({ "embeds": [embed] })
    }

    /// Issue a request and classify the response status
    async fn request(
        &self,
        request: reqwest::RequestBuilder,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, NotifyError> {
        let response = request
            .header("Authorization", format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::from_status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| NotifyError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ChatApi for DiscordApi {
    async fn send_message(
        &self,
        channel_id: u64,
        payload: &MessagePayload,
    ) -> Result<MessageId, NotifyError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let body = self.build_body(payload);
        let response = self.request(self.client.post(&url), &body).await?;

        let id = response
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| NotifyError::MalformedResponse("message id missing".to_string()))?;
        Ok(MessageId(id.to_string()))
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: &MessageId,
        payload: &MessagePayload,
    ) -> Result<(), NotifyError> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.api_base, channel_id, message_id.0
        );
        let body = self.build_body(payload);
        self.request(self.client.patch(&url), &body).await?;
        Ok(())
    }
}

//! Slack incoming-webhook delivery.
//!
//! Slack incoming webhooks accept a `{"text": ...}` JSON payload; delivery
//! and retry behavior are shared with [`WebhookDelivery`].

use crate::delivery::webhook::{WebhookDelivery, WebhookError};

/// Delivers plain-text notifications to a Slack incoming webhook.
pub struct SlackDelivery {
    webhook: WebhookDelivery,
}

impl SlackDelivery {
    pub fn new() -> Self {
        Self {
            webhook: WebhookDelivery::new(),
        }
    }

    /// Post a message to a Slack incoming-webhook URL with retry.
    pub async fn deliver(&self, url: &str, text: &str) -> Result<(), WebhookError> {
        let payload = serde_json::json!({ "text": text });
        self.webhook.deliver(url, &payload).await
    }
}

impl Default for SlackDelivery {
    fn default() -> Self {
        Self::new()
    }
}

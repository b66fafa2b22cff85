//! Webhook sink — POST each new item as JSON to an external endpoint.
//!
//! Useful for integrating with external systems (Zapier, n8n, custom APIs).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use storycast_core::config::WebhookConfig;
use storycast_core::error::{Result, StorycastError};
use storycast_core::traits::Sink;
use storycast_core::types::{Item, ItemId, MediaKind};

/// Header carrying the body signature when a secret is configured.
pub const SIGNATURE_HEADER: &str = "X-Storycast-Signature";

#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    id: &'a ItemId,
    url: &'a str,
    kind: MediaKind,
}

/// Hex SHA-256 of `secret || body`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}

/// Webhook sink.
pub struct WebhookSink {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorycastError::Http(format!("Cannot build webhook client: {e}")))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Sink for WebhookSink {
    fn name(&self) -> &str { "webhook" }

    async fn connect(&mut self) -> Result<()> {
        url::Url::parse(&self.config.url)
            .map_err(|e| StorycastError::config(format!("Invalid webhook URL: {e}")))?;
        tracing::info!("Webhook sink ready");
        Ok(())
    }

    async fn deliver(&self, item: &Item) -> Result<()> {
        let body = serde_json::to_vec(&WebhookBody {
            id: &item.id,
            url: &item.payload.url,
            kind: item.payload.kind,
        })?;

        let mut request = self.client
            .post(&self.config.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(secret) = &self.config.secret {
            request = request.header(SIGNATURE_HEADER, sign(secret, &body));
        }

        let response = request.body(body).send().await
            .map_err(|e| StorycastError::delivery(format!("Webhook send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(StorycastError::delivery(format!("Webhook {status}: {text}")));
        }
        Ok(())
    }
}

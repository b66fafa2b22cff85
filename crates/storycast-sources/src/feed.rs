//! HTTP story feed source.
//!
//! Reads a story tray JSON document with a single GET and turns it into items.

use std::time::Duration;

use async_trait::async_trait;
use storycast_core::config::FeedConfig;
use storycast_core::error::{Result, StorycastError};
use storycast_core::traits::Source;
use storycast_core::types::Item;

use crate::media::StoryTray;

/// Story tray served over HTTP.
pub struct FeedSource {
    config: FeedConfig,
    client: reqwest::Client,
}

impl FeedSource {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("storycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorycastError::Http(format!("Cannot build feed client: {e}")))?;
        Ok(Self { config, client })
    }

    async fn load_tray(&self) -> Result<StoryTray> {
        let mut request = self.client.get(&self.config.url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await
            .map_err(|e| StorycastError::fetch(format!("Feed request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StorycastError::auth(format!("Feed rejected credentials ({status})")));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StorycastError::fetch(format!("Feed {status}: {text}")));
        }

        response.json::<StoryTray>().await
            .map_err(|e| StorycastError::fetch(format!("Invalid story tray: {e}")))
    }
}

#[async_trait]
impl Source for FeedSource {
    fn name(&self) -> &str { "feed" }

    async fn connect(&mut self) -> Result<()> {
        let tray = self.load_tray().await?;
        tracing::info!("Feed source connected ({} reels visible)", tray.reels.len());
        Ok(())
    }

    async fn fetch_candidates(&self) -> Result<Vec<Item>> {
        let tray = self.load_tray().await.map_err(|e| match e {
            StorycastError::AuthFailed(msg) => StorycastError::Fetch(msg),
            other => other,
        })?;
        let items = tray.into_items(self.config.owner_id.as_deref());
        tracing::debug!("Fetched {} stories from feed", items.len());
        Ok(items)
    }
}

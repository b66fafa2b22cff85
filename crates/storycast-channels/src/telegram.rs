//! Telegram Bot API sink.
//!
//! Stories are shared by URL: Telegram downloads the media itself, so nothing
//! is streamed through this process.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use storycast_core::config::TelegramConfig;
use storycast_core::error::{Result, StorycastError};
use storycast_core::traits::Sink;
use storycast_core::types::{Item, MediaKind};

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

/// Bot identity returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Telegram sink posting photos and videos into one chat.
pub struct TelegramSink {
    config: TelegramConfig,
    client: reqwest::Client,
    bot: Option<BotUser>,
}

impl TelegramSink {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorycastError::Http(format!("Cannot build Telegram client: {e}")))?;
        Ok(Self { config, client, bot: None })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    /// Bot API method and request body for an item.
    fn request_for(&self, item: &Item) -> (&'static str, serde_json::Value) {
        let (method, field) = match item.payload.kind {
            MediaKind::Video => ("sendVideo", "video"),
            MediaKind::Image => ("sendPhoto", "photo"),
        };
        let mut body = serde_json::json!({
            "chat_id": self.config.chat_id,
            field: item.payload.url,
        });
        if let Some(caption) = &self.config.caption {
            body["caption"] = serde_json::Value::String(caption.clone());
        }
        (method, body)
    }

    /// Get current bot info.
    pub async fn get_me(&self) -> Result<BotUser> {
        let response = self.client
            .get(self.method_url("getMe"))
            .send().await
            .map_err(|e| StorycastError::Http(format!("getMe failed: {e}")))?;

        let status = response.status();
        // A reply that is not a Bot API envelope (proxy or HTML error page) is an
        // `Http` error rather than `AuthFailed`; connect fails either way.
        let body: ApiResponse<BotUser> = response.json().await
            .map_err(|e| StorycastError::Http(format!("Invalid getMe response: {e}")))?;

        match body.result {
            Some(user) if body.ok => Ok(user),
            _ => Err(StorycastError::auth(format!(
                "Telegram {status}: {}",
                body.description.unwrap_or_else(|| "getMe rejected".into())
            ))),
        }
    }

    pub fn bot(&self) -> Option<&BotUser> {
        self.bot.as_ref()
    }
}

#[async_trait]
impl Sink for TelegramSink {
    fn name(&self) -> &str { "telegram" }

    async fn connect(&mut self) -> Result<()> {
        let bot = self.get_me().await?;
        tracing::info!(
            "Telegram sink connected as @{}",
            bot.username.as_deref().unwrap_or("unknown")
        );
        self.bot = Some(bot);
        Ok(())
    }

    async fn deliver(&self, item: &Item) -> Result<()> {
        let (method, body) = self.request_for(item);

        let response = self.client
            .post(self.method_url(method))
            .json(&body)
            .send().await
            .map_err(|e| StorycastError::delivery(format!("Telegram {method} failed: {e}")))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let parsed: Option<ApiResponse<serde_json::Value>> = serde_json::from_str(&text).ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(StorycastError::delivery(format!(
                "Telegram {method} {status}: {}",
                api.description.unwrap_or_default()
            ))),
            None => Err(StorycastError::delivery(format!("Telegram {method} {status}: {text}"))),
        }
    }
}

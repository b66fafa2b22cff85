//! Configuration loaded from `~/.storycast/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorycastError};

const MASK: &str = "***";

/// Longest accepted poll interval (one week).
pub const MAX_POLL_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorycastConfig {
    /// Seconds between poll cycles after the immediate first one.
    pub poll_interval_secs: u64,
    /// Treat everything seen on the first cycle as backlog and do not deliver it.
    #[serde(default = "default_true")]
    pub skip_backlog: bool,
    pub source: SourceConfig,
    pub sink: SinkConfig,
}

fn default_true() -> bool { true }
fn default_timeout_secs() -> u64 { 30 }

/// Content source selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Feed(FeedConfig),
}

/// HTTP story feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Only read the reel of this owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Messaging sink selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SinkConfig {
    Telegram(TelegramConfig),
    Webhook(WebhookConfig),
}

/// Telegram Bot API sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Override for tests and self-hosted Bot API servers.
    #[serde(default = "default_telegram_api")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_telegram_api() -> String { "https://api.telegram.org".into() }

/// Outbound webhook sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    /// Secret used to sign request bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl StorycastConfig {
    /// `~/.storycast`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".storycast")
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StorycastError::ConfigNotFound(format!(
                "{} (run `storycast init` to create one)",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| StorycastError::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(StorycastError::config("poll_interval_secs must be greater than 0"));
        }
        if self.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(StorycastError::config(format!(
                "poll_interval_secs must be at most {MAX_POLL_INTERVAL_SECS}"
            )));
        }

        match &self.source {
            SourceConfig::Feed(feed) => {
                check_url("source.url", &feed.url)?;
                check_timeout("source.timeout_secs", feed.timeout_secs)?;
            }
        }

        match &self.sink {
            SinkConfig::Telegram(tg) => {
                if tg.bot_token.trim().is_empty() {
                    return Err(StorycastError::config("sink.bot_token is empty"));
                }
                check_url("sink.api_base", &tg.api_base)?;
                check_timeout("sink.timeout_secs", tg.timeout_secs)?;
            }
            SinkConfig::Webhook(hook) => {
                check_url("sink.url", &hook.url)?;
                check_timeout("sink.timeout_secs", hook.timeout_secs)?;
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Copy with every credential replaced by a mask, for display.
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        match &mut config.source {
            SourceConfig::Feed(feed) => {
                if feed.token.is_some() {
                    feed.token = Some(MASK.into());
                }
            }
        }
        match &mut config.sink {
            SinkConfig::Telegram(tg) => tg.bot_token = MASK.into(),
            SinkConfig::Webhook(hook) => {
                if hook.secret.is_some() {
                    hook.secret = Some(MASK.into());
                }
            }
        }
        config
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| StorycastError::config(format!("Cannot serialize config: {e}")))
    }

    /// Starter config written by `storycast init`.
    pub fn template() -> &'static str {
        TEMPLATE
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| StorycastError::config(format!("{field} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(StorycastError::config(format!(
            "{field} must use http or https, got {other}"
        ))),
    }
}

fn check_timeout(field: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(StorycastError::config(format!("{field} must be greater than 0")));
    }
    Ok(())
}

const TEMPLATE: &str = r#"# storycast configuration

# Seconds between polls. The first poll runs immediately at startup.
poll_interval_secs = 300

# Items already published when storycast starts are remembered but not delivered.
skip_backlog = true

[source]
kind = "feed"
url = "https://example.com/stories.json"
# token = "feed-access-token"
# owner_id = "42"

[sink]
kind = "telegram"
bot_token = "123456:replace-me"
chat_id = 0
# caption = "New story"

# [sink]
# kind = "webhook"
# url = "https://hooks.example.com/storycast"
# secret = "shared-secret"
"#;

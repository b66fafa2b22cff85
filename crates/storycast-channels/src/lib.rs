//! # storycast channels
//! Messaging sinks that new stories are delivered to.

pub mod telegram;
pub mod webhook;

pub use telegram::TelegramSink;
pub use webhook::WebhookSink;

use storycast_core::config::SinkConfig;
use storycast_core::error::Result;
use storycast_core::traits::Sink;

/// Create a sink from configuration.
pub fn create_sink(config: &SinkConfig) -> Result<Box<dyn Sink>> {
    match config {
        SinkConfig::Telegram(tg) => Ok(Box::new(TelegramSink::new(tg.clone())?)),
        SinkConfig::Webhook(hook) => Ok(Box::new(WebhookSink::new(hook.clone())?)),
    }
}

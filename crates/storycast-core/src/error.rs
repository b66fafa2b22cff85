//! Unified error types for storycast.

use thiserror::Error;

/// Result type alias using StorycastError.
pub type Result<T> = std::result::Result<T, StorycastError>;

#[derive(Error, Debug)]
pub enum StorycastError {
    // Collaborator call errors
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    Other(String),
}

impl StorycastError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthFailed(msg.into())
    }
}

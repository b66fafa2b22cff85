//! Story items observed at the source and handed to the sink.

use serde::{Deserialize, Serialize};

/// Stable identifier of one content unit at the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How the sink should render a payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Fetchable media reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payload {
    pub url: String,
    pub kind: MediaKind,
}

/// One observed unit of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub payload: Payload,
    /// Set by the tracker for the current cycle only.
    #[serde(skip)]
    pub is_new: bool,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            payload: Payload { url: url.into(), kind },
            is_new: false,
        }
    }

    pub fn image(id: impl Into<ItemId>, url: impl Into<String>) -> Self {
        Self::new(id, url, MediaKind::Image)
    }

    pub fn video(id: impl Into<ItemId>, url: impl Into<String>) -> Self {
        Self::new(id, url, MediaKind::Video)
    }
}

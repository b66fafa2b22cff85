//! Story tray document and media selection.

use serde::Deserialize;
use storycast_core::types::{Item, MediaKind, Payload};

/// Story tray returned by the feed endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryTray {
    #[serde(default)]
    pub reels: Vec<Reel>,
}

/// One account's stories.
#[derive(Debug, Clone, Deserialize)]
pub struct Reel {
    pub owner: Owner,
    #[serde(default)]
    pub items: Vec<StoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub video_versions: Vec<MediaVersion>,
    #[serde(default)]
    pub image_versions: Vec<MediaVersion>,
}

/// One rendition of a piece of media.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaVersion {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl MediaVersion {
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Pick the payload for a story: the first video rendition if there is one,
/// otherwise the largest image. `None` when the entry carries no usable media.
pub fn select_media(entry: &StoryEntry) -> Option<Payload> {
    if let Some(video) = entry.video_versions.iter().find(|v| !v.url.is_empty()) {
        return Some(Payload { url: video.url.clone(), kind: MediaKind::Video });
    }

    entry
        .image_versions
        .iter()
        .filter(|v| !v.url.is_empty())
        .fold(None::<&MediaVersion>, |best, v| match best {
            Some(b) if b.area() >= v.area() => Some(b),
            _ => Some(v),
        })
        .map(|best| Payload { url: best.url.clone(), kind: MediaKind::Image })
}

impl StoryTray {
    /// Flatten the tray into items, keeping document order. With `owner_id`
    /// only that owner's reel is read.
    pub fn into_items(self, owner_id: Option<&str>) -> Vec<Item> {
        let mut items = vec![];
        for reel in self.reels {
            if owner_id.is_some_and(|owner| owner != reel.owner.id) {
                continue;
            }
            for entry in &reel.items {
                match select_media(entry) {
                    Some(payload) => items.push(Item {
                        id: entry.id.as_str().into(),
                        payload,
                        is_new: false,
                    }),
                    None => tracing::debug!(id = %entry.id, "story has no usable media, skipped"),
                }
            }
            if owner_id.is_some() {
                break;
            }
        }
        items
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

//! # storycast sources
//! Content sources that produce candidate story items.

pub mod feed;
pub mod media;

pub use feed::FeedSource;

use storycast_core::config::SourceConfig;
use storycast_core::error::Result;
use storycast_core::traits::Source;

/// Create a source from configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn Source>> {
    match config {
        SourceConfig::Feed(feed) => Ok(Box::new(FeedSource::new(feed.clone())?)),
    }
}

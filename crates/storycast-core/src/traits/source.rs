//! Content source trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Item;

/// Where candidate items come from.
///
/// Implementations must return the same `ItemId` for a content unit on every
/// fetch for as long as the unit stays available.
#[async_trait]
pub trait Source: Send + Sync {
    /// Source name, used in logs.
    fn name(&self) -> &str;

    /// Authenticate or check the source once at startup.
    async fn connect(&mut self) -> Result<()>;

    /// Fetch the current candidates, in source order.
    async fn fetch_candidates(&self) -> Result<Vec<Item>>;
}

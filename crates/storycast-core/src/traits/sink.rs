//! Messaging sink trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Item;

/// Where new items are delivered.
///
/// `deliver` may be called again for an item whose earlier delivery failed,
/// so implementations must tolerate repeats.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Sink name, used in logs.
    fn name(&self) -> &str;

    /// Authenticate against the sink once at startup.
    async fn connect(&mut self) -> Result<()>;

    /// Deliver one item.
    async fn deliver(&self, item: &Item) -> Result<()>;
}

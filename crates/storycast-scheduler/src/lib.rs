//! # storycast scheduler
//!
//! Drives poll cycles over time.
//!
//! ```text
//! start ─► cycle 0 (immediately)
//!       ─► tick every `interval` ─► cycle 1, 2, ...
//!       ─► shutdown token cancelled ─► stop before the next cycle
//! ```
//!
//! Cycles are awaited inline, so two cycles never run at once.

pub mod engine;
pub mod job;

pub use engine::Scheduler;
pub use job::PollJob;
pub use tokio_util::sync::CancellationToken;

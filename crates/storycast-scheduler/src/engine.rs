//! Interval loop.

use std::time::Duration;

use storycast_core::config::MAX_POLL_INTERVAL_SECS;
use storycast_core::error::{Result, StorycastError};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::job::PollJob;

/// Runs a job once right away and then once per interval.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(StorycastError::config("poll interval must be greater than zero"));
        }
        // The timer adds the period to the current instant on every tick.
        if interval > Duration::from_secs(MAX_POLL_INTERVAL_SECS)
            || Instant::now().checked_add(interval).is_none()
        {
            return Err(StorycastError::config(format!(
                "poll interval must be at most {MAX_POLL_INTERVAL_SECS}s"
            )));
        }
        Ok(Self { interval })
    }

    /// Run until `shutdown` is cancelled. Returns the number of cycles run.
    ///
    /// The token is checked between cycles only; a running cycle always
    /// finishes. A cycle that outlasts the interval delays the following
    /// ticks instead of causing a burst of catch-up cycles.
    pub async fn run<J: PollJob + ?Sized>(&self, job: &mut J, shutdown: CancellationToken) -> u64 {
        if shutdown.is_cancelled() {
            tracing::info!("Scheduler for {} cancelled before start", job.name());
            return 0;
        }

        tracing::info!(
            "Scheduler for {} started (interval {}s)",
            job.name(),
            self.interval.as_secs_f64()
        );

        job.poll().await;
        let mut cycles = 1u64;

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    break;
                }
                _ = ticker.tick() => {
                    job.poll().await;
                    cycles += 1;
                }
            }
        }

        tracing::info!("Scheduler for {} stopped after {cycles} cycles", job.name());
        cycles
    }
}

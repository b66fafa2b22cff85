//! Work the scheduler runs on every tick.

use async_trait::async_trait;
use storycast_orchestrator::Orchestrator;

/// One unit of periodic work. A call to `poll` must not fail; errors are the
/// job's own business to report.
#[async_trait]
pub trait PollJob: Send {
    fn name(&self) -> &str;

    async fn poll(&mut self);
}

#[async_trait]
impl PollJob for Orchestrator {
    fn name(&self) -> &str {
        "crosspost"
    }

    async fn poll(&mut self) {
        self.run_cycle().await;

        let stats = self.stats();
        tracing::debug!(
            cycles = stats.cycles,
            delivered = stats.delivered,
            failed = stats.failed,
            fetch_errors = stats.fetch_errors,
            known = self.tracker().len(),
            "crosspost totals"
        );
    }
}

//! # storycast orchestrator
//! One poll cycle: fetch candidates, classify them against the known set,
//! and deliver the new ones.
//!
//! ```text
//! Source::fetch_candidates ─► Tracker::observe ─► cycle 0? ─yes─► remember only
//!                                                    │
//!                                                    no
//!                                                    ▼
//!                                 Sink::deliver (each new item, in order)
//!                                        └─ on failure ─► Tracker::rollback
//! ```

pub mod report;
pub mod tracker;

pub use report::{CrosspostStats, CycleReport};
pub use tracker::Tracker;

use storycast_core::traits::{Sink, Source};

/// Runs poll cycles against one source and one sink.
pub struct Orchestrator {
    source: Box<dyn Source>,
    sink: Box<dyn Sink>,
    tracker: Tracker,
    skip_backlog: bool,
    cycles: u64,
    stats: CrosspostStats,
}

impl Orchestrator {
    pub fn new(source: Box<dyn Source>, sink: Box<dyn Sink>, tracker: Tracker) -> Self {
        Self {
            source,
            sink,
            tracker,
            skip_backlog: true,
            cycles: 0,
            stats: CrosspostStats::default(),
        }
    }

    /// Enable or disable withholding items seen on the first cycle.
    pub fn with_backlog_suppression(mut self, enabled: bool) -> Self {
        self.skip_backlog = enabled;
        self
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn stats(&self) -> CrosspostStats {
        self.stats
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles
    }

    /// Run one fetch-classify-deliver pass. Never fails: fetch and delivery
    /// errors are logged and recorded in the report, and the report itself is
    /// logged as a one-line summary.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::new(self.cycles);

        let candidates = match self.source.fetch_candidates().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to load items from {}: {e}", self.source.name());
                report.fetch_error = Some(e.to_string());
                vec![]
            }
        };
        report.fetched = candidates.len();

        let items = self.tracker.observe(candidates);
        report.new_items = items.iter().filter(|i| i.is_new).count();

        if self.cycles == 0 && self.skip_backlog {
            report.suppressed = report.fetched;
            tracing::info!(
                "Skipping {} items as they were published before launch",
                report.suppressed
            );
        } else {
            for item in items.iter().filter(|i| i.is_new) {
                match self.sink.deliver(item).await {
                    Ok(()) => {
                        tracing::info!(id = %item.id, kind = %item.payload.kind, "Item delivered to {}", self.sink.name());
                        report.delivered.push(item.id.clone());
                    }
                    Err(e) => {
                        self.tracker.rollback(&item.id);
                        tracing::error!(id = %item.id, "Failed to deliver item to {}: {e}", self.sink.name());
                        report.failed.push(item.id.clone());
                    }
                }
            }
        }

        if report.is_clean() {
            tracing::info!("{report}");
        } else {
            tracing::warn!("{report}");
        }

        self.stats.record(&report);
        self.cycles += 1;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use storycast_core::error::{Result, StorycastError};
    use storycast_core::types::{Item, ItemId};

    /// Returns a scripted batch per call, then empty batches.
    struct ScriptedSource {
        batches: Mutex<VecDeque<Result<Vec<Item>>>>,
    }

    impl ScriptedSource {
        fn new(batches: Vec<Result<Vec<Item>>>) -> Self {
            Self { batches: Mutex::new(batches.into()) }
        }
    }

    #[async_trait]
    impl Source for ScriptedSource {
        fn name(&self) -> &str { "scripted" }

        async fn connect(&mut self) -> Result<()> { Ok(()) }

        async fn fetch_candidates(&self) -> Result<Vec<Item>> {
            self.batches.lock().unwrap().pop_front().unwrap_or_else(|| Ok(vec![]))
        }
    }

    /// Records delivery attempts; fails for ids in `failing`.
    #[derive(Clone, Default)]
    struct RecordingSink {
        attempts: Arc<Mutex<Vec<String>>>,
        failing: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSink {
        fn fail_on(&self, id: &str) {
            self.failing.lock().unwrap().push(id.to_string());
        }

        fn heal(&self) {
            self.failing.lock().unwrap().clear();
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sink for RecordingSink {
        fn name(&self) -> &str { "recording" }

        async fn connect(&mut self) -> Result<()> { Ok(()) }

        async fn deliver(&self, item: &Item) -> Result<()> {
            let id = item.id.to_string();
            self.attempts.lock().unwrap().push(id.clone());
            if self.failing.lock().unwrap().contains(&id) {
                return Err(StorycastError::delivery(format!("rejected {id}")));
            }
            Ok(())
        }
    }

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::image(*id, format!("https://cdn.example/{id}.jpg"))).collect()
    }

    fn orchestrator(batches: Vec<Result<Vec<Item>>>, sink: &RecordingSink) -> Orchestrator {
        Orchestrator::new(
            Box::new(ScriptedSource::new(batches)),
            Box::new(sink.clone()),
            Tracker::new(),
        )
    }

    #[tokio::test]
    async fn test_backlog_suppressed_on_first_cycle() {
        for n in [0usize, 1, 5] {
            let ids: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let sink = RecordingSink::default();
            let mut orch = orchestrator(vec![Ok(items(&refs))], &sink);

            let report = orch.run_cycle().await;
            assert_eq!(report.cycle, 0);
            assert_eq!(report.suppressed, n);
            assert!(sink.attempts().is_empty());
            assert_eq!(orch.tracker().len(), n);
        }
    }

    #[tokio::test]
    async fn test_empty_first_cycle_still_consumes_gate() {
        let sink = RecordingSink::default();
        let mut orch = orchestrator(vec![Ok(vec![]), Ok(items(&["a"]))], &sink);

        orch.run_cycle().await;
        let report = orch.run_cycle().await;
        assert_eq!(report.cycle, 1);
        assert_eq!(sink.attempts(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_backlog_suppression_disabled() {
        let sink = RecordingSink::default();
        let mut orch = orchestrator(vec![Ok(items(&["a", "b"]))], &sink)
            .with_backlog_suppression(false);

        let report = orch.run_cycle().await;
        assert_eq!(report.suppressed, 0);
        assert_eq!(sink.attempts(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delivers_in_source_order() {
        let sink = RecordingSink::default();
        let mut orch = orchestrator(vec![Ok(vec![]), Ok(items(&["A", "B", "C"]))], &sink);

        orch.run_cycle().await;
        let report = orch.run_cycle().await;
        assert_eq!(sink.attempts(), vec!["A", "B", "C"]);
        let delivered: Vec<_> = report.delivered.iter().map(|id| id.as_str()).collect();
        assert_eq!(delivered, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_partial_batch_failure() {
        let sink = RecordingSink::default();
        sink.fail_on("2");
        let mut orch = orchestrator(
            vec![Ok(vec![]), Ok(items(&["1", "2", "3"])), Ok(items(&["1", "2", "3"]))],
            &sink,
        );

        orch.run_cycle().await;
        let report = orch.run_cycle().await;
        assert_eq!(sink.attempts(), vec!["1", "2", "3"]);
        assert_eq!(report.delivered.len(), 2);
        assert_eq!(report.failed, vec![ItemId::from("2")]);
        assert!(orch.tracker().is_known(&"1".into()));
        assert!(!orch.tracker().is_known(&"2".into()));
        assert!(orch.tracker().is_known(&"3".into()));

        sink.heal();
        let report = orch.run_cycle().await;
        assert_eq!(report.delivered, vec![ItemId::from("2")]);
        assert_eq!(sink.attempts(), vec!["1", "2", "3", "2"]);
    }

    #[tokio::test]
    async fn test_fetch_error_treated_as_empty_batch() {
        let sink = RecordingSink::default();
        let mut orch = orchestrator(
            vec![
                Ok(items(&["a"])),
                Err(StorycastError::fetch("feed unavailable")),
                Ok(items(&["a", "b"])),
            ],
            &sink,
        );

        orch.run_cycle().await;
        let report = orch.run_cycle().await;
        assert_eq!(report.fetched, 0);
        assert!(report.fetch_error.as_deref().unwrap().contains("feed unavailable"));
        assert!(orch.tracker().is_known(&"a".into()));

        let report = orch.run_cycle().await;
        assert!(report.is_clean());
        assert_eq!(sink.attempts(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_stats_track_cycles() {
        let sink = RecordingSink::default();
        sink.fail_on("y");
        let mut orch = orchestrator(
            vec![Ok(items(&["old"])), Ok(items(&["old", "x", "y"])), Err(StorycastError::fetch("down"))],
            &sink,
        );

        for _ in 0..3 {
            orch.run_cycle().await;
        }
        let stats = orch.stats();
        assert_eq!(orch.cycles_run(), 3);
        assert_eq!(stats.cycles, 3);
        assert_eq!(stats.fetched, 4);
        assert_eq!(stats.suppressed, 1);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.fetch_errors, 1);
    }

    /// Log sink for capturing formatted events in a test.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    #[tokio::test]
    async fn test_cycle_logs_summary_line() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let sink = RecordingSink::default();
        sink.fail_on("b");
        let mut orch = orchestrator(vec![Ok(vec![]), Ok(items(&["a", "b"]))], &sink);
        orch.run_cycle().await;
        orch.run_cycle().await;

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("cycle 0: fetched=0"));
        let summary = output
            .lines()
            .find(|l| l.contains("cycle 1:"))
            .expect("summary for cycle 1");
        assert!(summary.contains("WARN"));
        assert!(summary.contains("delivered=1 failed=1"));
    }
}

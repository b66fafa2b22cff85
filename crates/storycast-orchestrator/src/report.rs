//! Per-cycle reports and running totals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storycast_core::types::ItemId;

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub fetched: usize,
    pub new_items: usize,
    /// Items remembered but not delivered because they predate launch.
    pub suppressed: usize,
    /// Ids delivered, in delivery order.
    pub delivered: Vec<ItemId>,
    /// Ids whose delivery failed and were rolled back.
    pub failed: Vec<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl CycleReport {
    pub(crate) fn new(cycle: u64) -> Self {
        Self {
            cycle,
            started_at: Utc::now(),
            fetched: 0,
            new_items: 0,
            suppressed: 0,
            delivered: vec![],
            failed: vec![],
            fetch_error: None,
        }
    }

    /// True when nothing went wrong in this cycle.
    pub fn is_clean(&self) -> bool {
        self.fetch_error.is_none() && self.failed.is_empty()
    }
}

impl std::fmt::Display for CycleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cycle {}: fetched={} new={} delivered={} failed={} suppressed={}",
            self.cycle,
            self.fetched,
            self.new_items,
            self.delivered.len(),
            self.failed.len(),
            self.suppressed,
        )?;
        if let Some(err) = &self.fetch_error {
            write!(f, " fetch_error=\"{err}\"")?;
        }
        Ok(())
    }
}

/// Totals across every cycle since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrosspostStats {
    pub cycles: u64,
    pub fetched: u64,
    pub delivered: u64,
    pub failed: u64,
    pub suppressed: u64,
    pub fetch_errors: u64,
}

impl CrosspostStats {
    pub(crate) fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.fetched += report.fetched as u64;
        self.delivered += report.delivered.len() as u64;
        self.failed += report.failed.len() as u64;
        self.suppressed += report.suppressed as u64;
        if report.fetch_error.is_some() {
            self.fetch_errors += 1;
        }
    }
}

//! Scanner module containing the probing engine and result aggregation

pub mod aggregator;
pub mod engine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub use aggregator::ResultAggregator;
pub use engine::ScanEngine;

/// Events surfaced to the reporter while a scan runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    /// A path exists
    Found {
        path: String,
        status: u16,
        checked: usize,
        total: usize,
    },
    /// A probe came back with a negative status
    Progress { checked: usize, total: usize },
    /// A probe failed at the transport level
    Error {
        candidate: String,
        cause: String,
        checked: usize,
        total: usize,
    },
    /// Every candidate has been probed
    Finished { found: usize, checked: usize, total: usize },
    /// The scan was cancelled; nothing follows this event
    Interrupted { checked: usize, total: usize },
}

/// Final result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Base URL that was scanned
    pub target: String,

    /// Discovered paths and their status codes
    pub found: BTreeMap<String, u16>,

    /// Candidates in the wordlist
    pub total: usize,

    /// Probes that completed (found, not found, or failed)
    pub checked: usize,

    /// Probes that failed at the transport level
    pub errors: usize,

    /// True when the run was cut short by cancellation
    pub interrupted: bool,

    pub started_at: DateTime<Utc>,

    pub duration: Duration,
}

impl ScanReport {
    /// Number of discovered paths
    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    /// Probes per second over the whole run
    pub fn scan_rate(&self) -> f64 {
        crate::utils::rate(self.checked, self.duration)
    }
}

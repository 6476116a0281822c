//! Result aggregation
//!
//! The aggregator is owned by exactly one task. Workers hand it outcomes over
//! a channel, so the progress counter and the result set are only ever
//! mutated from one place and need no lock.

use crate::error::ProbeError;
use crate::probe::ProbeOutcome;
use crate::scanner::ScanEvent;
use std::collections::BTreeMap;
use tokio::sync::mpsc::UnboundedSender;

/// Collects probe outcomes into the result set and progress counters
#[derive(Debug)]
pub struct ResultAggregator {
    results: BTreeMap<String, u16>,
    total: usize,
    checked: usize,
    errors: usize,
    events: Option<UnboundedSender<ScanEvent>>,
}

impl ResultAggregator {
    pub fn new(total: usize) -> Self {
        Self {
            results: BTreeMap::new(),
            total,
            checked: 0,
            errors: 0,
            events: None,
        }
    }

    /// Forward progress and discovery events to `sender`
    pub fn with_events(mut self, sender: UnboundedSender<ScanEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Stop emitting events; counters keep updating
    pub fn silence(&mut self) {
        self.events = None;
    }

    pub fn is_silenced(&self) -> bool {
        self.events.is_none()
    }

    /// Record any outcome
    pub fn record(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Found { candidate, status } => self.record_found(candidate, status),
            ProbeOutcome::NotFound { candidate, status } => self.record_not_found(&candidate, status),
            ProbeOutcome::Error { candidate, cause } => self.record_error(candidate, cause),
        }
    }

    /// Record a discovered path; a repeated path keeps the latest status
    pub fn record_found(&mut self, candidate: String, status: u16) {
        self.checked += 1;
        self.results.insert(candidate.clone(), status);
        self.emit(ScanEvent::Found {
            path: candidate,
            status,
            checked: self.checked,
            total: self.total,
        });
    }

    pub fn record_not_found(&mut self, candidate: &str, status: u16) {
        self.checked += 1;
        log::trace!("/{} [{}] negative", candidate, status);
        self.emit(ScanEvent::Progress {
            checked: self.checked,
            total: self.total,
        });
    }

    pub fn record_error(&mut self, candidate: String, cause: ProbeError) {
        self.checked += 1;
        self.errors += 1;
        self.emit(ScanEvent::Error {
            candidate,
            cause: cause.to_string(),
            checked: self.checked,
            total: self.total,
        });
    }

    fn emit(&mut self, event: ScanEvent) {
        if let Some(sender) = &self.events {
            // Reporter gone: keep counting without events
            if sender.send(event).is_err() {
                self.events = None;
            }
        }
    }

    /// Number of discovered paths
    pub fn finalize(&self) -> usize {
        self.results.len()
    }

    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn results(&self) -> &BTreeMap<String, u16> {
        &self.results
    }

    /// Hand over the result set
    pub fn into_results(self) -> BTreeMap<String, u16> {
        self.results
    }
}

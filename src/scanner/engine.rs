//! Main scanning engine implementation

use crate::config::ScanConfig;
use crate::probe::{HttpProber, ProbeOutcome, Prober};
use crate::scanner::{ResultAggregator, ScanEvent, ScanReport};
use crate::target::Target;
use crate::utils::wordlist::WordSource;
use crate::utils::Logger;
use crate::ScanError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Main scanning engine
///
/// Candidates are dispatched one at a time; each probe runs in its own task
/// holding a semaphore permit, so at most `threads` probes are ever in flight.
/// Outcomes flow over a channel into a single aggregator task.
pub struct ScanEngine<P: Prober = HttpProber> {
    target: Arc<Target>,
    prober: Arc<P>,
    threads: usize,
}

impl ScanEngine<HttpProber> {
    /// Create a new scan engine with the given configuration
    pub fn new(config: &ScanConfig) -> crate::Result<Self> {
        let target = config.validate()?;
        let prober = HttpProber::from_config(config)?;
        Ok(Self::with_prober(target, prober, config.threads))
    }
}

impl<P: Prober> ScanEngine<P> {
    /// Create an engine around any prober
    pub fn with_prober(target: Target, prober: P, threads: usize) -> Self {
        Self {
            target: Arc::new(target),
            prober: Arc::new(prober),
            threads: threads.max(1),
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Probe every candidate of `source` exactly once
    ///
    /// When `cancel` fires, dispatch stops, in-flight probes are abandoned
    /// and the report comes back with `interrupted` set. `events`, if given,
    /// receives progress as it happens; after an [`ScanEvent::Interrupted`]
    /// nothing else is sent.
    pub async fn scan(
        &self,
        source: &WordSource,
        cancel: CancellationToken,
        events: Option<mpsc::UnboundedSender<ScanEvent>>,
    ) -> crate::Result<ScanReport> {
        let total = source.count()?;
        self.scan_counted(source, total, cancel, events).await
    }

    /// Same as [`ScanEngine::scan`] for a source whose size is already known
    pub async fn scan_counted(
        &self,
        source: &WordSource,
        total: usize,
        cancel: CancellationToken,
        events: Option<mpsc::UnboundedSender<ScanEvent>>,
    ) -> crate::Result<ScanReport> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        let words = source.words()?;
        log::debug!("Reading candidates from {}", source.describe());
        Logger::log_scan_start(self.target.as_str(), total, self.threads);

        let (outcome_tx, mut outcome_rx) = mpsc::channel::<ProbeOutcome>(self.threads);

        // Single owner of the result set and counters
        let mut aggregator = ResultAggregator::new(total);
        if let Some(sender) = events.clone() {
            aggregator = aggregator.with_events(sender);
        }
        let aggregator_cancel = cancel.clone();
        let aggregator_handle = tokio::spawn(async move {
            let mut cut_short = false;
            while let Some(outcome) = outcome_rx.recv().await {
                if !cut_short && aggregator_cancel.is_cancelled() {
                    cut_short = true;
                    aggregator.silence();
                }
                aggregator.record(outcome);
            }
            (aggregator, cut_short)
        });

        let semaphore = Arc::new(Semaphore::new(self.threads));
        let mut dispatch_stopped = false;
        let mut read_error = None;

        for word in words {
            let candidate = match word {
                Ok(candidate) => candidate,
                Err(e) => {
                    log::error!("Stopping dispatch: {}", e);
                    read_error = Some(e);
                    break;
                }
            };

            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    dispatch_stopped = true;
                    break;
                }
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let target = Arc::clone(&self.target);
            let prober = Arc::clone(&self.prober);
            let sender = outcome_tx.clone();
            let task_cancel = cancel.clone();

            tokio::spawn(async move {
                let _permit = permit; // Keep permit alive
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => {}
                    outcome = prober.probe(&target, candidate) => {
                        let _ = sender.send(outcome).await;
                    }
                }
            });
        }

        // Aggregator finishes once every task has dropped its sender
        drop(outcome_tx);
        let (aggregator, cut_short) = aggregator_handle
            .await
            .map_err(|e| ScanError::TaskFailed(e.to_string()))?;

        if let Some(e) = read_error {
            return Err(e);
        }

        let checked = aggregator.checked();
        let errors = aggregator.errors();
        let found = aggregator.finalize();
        let duration = start_time.elapsed();

        // Abandoned in-flight probes leave `checked` short of `total` even
        // when every candidate was already dispatched
        let interrupted =
            dispatch_stopped || cut_short || (cancel.is_cancelled() && checked < total);

        // Logged before the last event: nothing may follow the shutdown notice
        if interrupted {
            log::info!("Cancellation requested, {} of {} candidates checked", checked, total);
        } else {
            Logger::log_scan_complete(duration, found, checked);
        }

        if let Some(sender) = events {
            let last = if interrupted {
                ScanEvent::Interrupted { checked, total }
            } else {
                ScanEvent::Finished { found, checked, total }
            };
            let _ = sender.send(last);
        }

        Ok(ScanReport {
            target: self.target.to_string(),
            found: aggregator.into_results(),
            total,
            checked,
            errors,
            interrupted,
            started_at,
            duration,
        })
    }
}

//! Fixed-interval polling orchestrator
//!
//! One cycle submits every category in [`DocumentCategory::ALL`] order, one
//! after another, then runs a reconciliation pass. Categories never run in
//! parallel. Cancellation is observed between categories, before
//! reconciliation, and during the inter-cycle sleep; a document that has been
//! submitted always gets its write-back.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use einvoice_core::{ReconciliationService, SubmissionService};
//! use einvoice_infra::scheduling::{PollingOrchestrator, PollingOrchestratorConfig};
//!
//! # async fn example(
//! #     submission: Arc<SubmissionService>,
//! #     reconciliation: Arc<ReconciliationService>,
//! # ) -> Result<(), einvoice_infra::scheduling::SchedulerError> {
//! let mut orchestrator = PollingOrchestrator::new(
//!     submission,
//!     reconciliation,
//!     PollingOrchestratorConfig::default(),
//! );
//!
//! orchestrator.start()?;
//! // ... service runs ...
//! orchestrator.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use einvoice_core::{ReconciliationService, SubmissionService};
use einvoice_domain::constants::DEFAULT_POLLING_INTERVAL_SECS;
use einvoice_domain::{CycleReport, DocumentCategory, WorkerConfig};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};

/// Configuration for the polling orchestrator.
#[derive(Debug, Clone)]
pub struct PollingOrchestratorConfig {
    /// Sleep between the end of one cycle and the start of the next
    pub interval: Duration,
    /// Join timeout when stopping
    pub join_timeout: Duration,
}

impl Default for PollingOrchestratorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECS),
            join_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&WorkerConfig> for PollingOrchestratorConfig {
    fn from(config: &WorkerConfig) -> Self {
        Self { interval: config.polling_interval(), ..Self::default() }
    }
}

/// Drives submission and reconciliation cycles until cancelled.
pub struct PollingOrchestrator {
    submission: Arc<SubmissionService>,
    reconciliation: Arc<ReconciliationService>,
    config: PollingOrchestratorConfig,
    cancellation: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl PollingOrchestrator {
    pub fn new(
        submission: Arc<SubmissionService>,
        reconciliation: Arc<ReconciliationService>,
        config: PollingOrchestratorConfig,
    ) -> Self {
        Self {
            submission,
            reconciliation,
            config,
            cancellation: CancellationToken::new(),
            task_handle: None,
        }
    }

    /// Run a single cycle in place.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> CycleReport {
        execute_cycle(&self.submission, &self.reconciliation, cancel).await
    }

    /// Run cycles in place until `cancel` fires. The first cycle starts
    /// immediately. Returns the number of cycles started.
    pub async fn run_until_cancelled(&self, cancel: CancellationToken) -> u64 {
        process_loop(
            Arc::clone(&self.submission),
            Arc::clone(&self.reconciliation),
            self.config.interval,
            cancel,
        )
        .await
    }

    /// Spawn the polling loop on a background task.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval_secs = self.config.interval.as_secs(), "Starting polling orchestrator");

        self.cancellation = CancellationToken::new();

        let submission = Arc::clone(&self.submission);
        let reconciliation = Arc::clone(&self.reconciliation);
        let interval = self.config.interval;
        let cancel = self.cancellation.clone();

        let handle = tokio::spawn(async move {
            let cycles = process_loop(submission, reconciliation, interval, cancel).await;
            debug!(cycles, "Polling loop exited");
        });

        self.task_handle = Some(handle);
        Ok(())
    }

    /// Cancel the background loop and wait for it to finish.
    ///
    /// A cycle in progress finishes its current category first.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(handle) = self.task_handle.take() else {
            return Err(SchedulerError::NotRunning);
        };

        info!("Stopping polling orchestrator");
        self.cancellation.cancel();

        let join_timeout = self.config.join_timeout;
        match tokio::time::timeout(join_timeout, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "Polling task panicked");
                return Err(SchedulerError::TaskJoinFailed(e.to_string()));
            }
            Err(_) => {
                warn!("Polling task did not complete within timeout");
                return Err(SchedulerError::Timeout { seconds: join_timeout.as_secs() });
            }
        }

        info!("Polling orchestrator stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true while a background loop is active.
    pub fn is_running(&self) -> bool {
        self.task_handle.is_some()
    }
}

/// Dropping a running orchestrator only cancels it. The detached loop exits at
/// its next checkpoint, so an in-flight category still writes back.
impl Drop for PollingOrchestrator {
    fn drop(&mut self) {
        if self.task_handle.take().is_some() {
            self.cancellation.cancel();
        }
    }
}

async fn process_loop(
    submission: Arc<SubmissionService>,
    reconciliation: Arc<ReconciliationService>,
    interval: Duration,
    cancel: CancellationToken,
) -> u64 {
    let mut cycles = 0;

    while !cancel.is_cancelled() {
        cycles += 1;
        let report = execute_cycle(&submission, &reconciliation, &cancel).await;
        if report.cancelled {
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Polling loop cancelled during sleep");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    cycles
}

#[instrument(skip_all)]
async fn execute_cycle(
    submission: &SubmissionService,
    reconciliation: &ReconciliationService,
    cancel: &CancellationToken,
) -> CycleReport {
    let started = Instant::now();
    let mut report = CycleReport::default();
    info!("Polling cycle started");

    for category in DocumentCategory::ALL {
        if cancel.is_cancelled() {
            info!(next_category = %category, "Cancellation requested; ending cycle early");
            report.cancelled = true;
            return report;
        }
        report.categories.push(submission.process_category(category).await);
    }

    if cancel.is_cancelled() {
        info!("Cancellation requested; skipping reconciliation");
        report.cancelled = true;
        return report;
    }
    report.reconciliation = Some(reconciliation.run_pass().await);

    let failed_categories = report.categories.iter().filter(|c| c.extraction_error.is_some()).count();
    info!(
        submitted = report.documents_submitted(),
        captured = report.documents_captured(),
        errored = report.documents_errored(),
        failed_categories,
        finalized = report.reconciliation.as_ref().map_or(0, |r| r.finalized),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Polling cycle completed"
    );

    report
}

//! Batch dispatch and completion tracking.
//!
//! Each batch is archived by its own task, which processes its pull requests
//! one after another. At most `max_workers` batch tasks run at once. Statuses
//! flow back over a bounded results channel and are forwarded to the caller
//! in completion order.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::archive::{ArchiveWorker, OfflineStatusResponse};
use crate::github::models::PullRequest;

/// Counts reported when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Batches handed to workers.
    pub batches: usize,
    /// Pull requests handed to workers.
    pub dispatched: usize,
    /// Statuses reporting success.
    pub succeeded: usize,
    /// Statuses reporting failure.
    pub failed: usize,
}

impl PipelineSummary {
    /// Statuses received so far.
    #[must_use]
    pub const fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Dispatched pull requests without a status.
    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.dispatched.saturating_sub(self.completed())
    }

    fn record(&mut self, status: &OfflineStatusResponse) {
        if status.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Spawns batch workers and forwards their statuses.
#[derive(Debug, Clone, Copy)]
pub struct Synchronizer {
    max_workers: NonZeroUsize,
    result_capacity: NonZeroUsize,
}

impl Synchronizer {
    /// Creates a synchronizer running at most `max_workers` batches at once
    /// and buffering up to `result_capacity` statuses.
    #[must_use]
    pub const fn new(max_workers: NonZeroUsize, result_capacity: NonZeroUsize) -> Self {
        Self {
            max_workers,
            result_capacity,
        }
    }

    /// Archives every batch received from `batches` and forwards each status
    /// to `output`.
    ///
    /// Returns once `batches` has closed and every dispatched pull request
    /// has reported, closing `output`. If `output` is dropped early the
    /// remaining statuses are still drained so workers never block.
    pub async fn run(
        self,
        worker: Arc<dyn ArchiveWorker>,
        mut batches: mpsc::Receiver<Vec<PullRequest>>,
        output: mpsc::Sender<OfflineStatusResponse>,
    ) -> PipelineSummary {
        let (results_tx, mut results_rx) = mpsc::channel(self.result_capacity.get());
        let mut results_tx = Some(results_tx);
        let mut output = Some(output);
        let permits = Arc::new(Semaphore::new(self.max_workers.get()));
        let mut tasks = JoinSet::new();
        let mut summary = PipelineSummary::default();
        let mut batches_open = true;

        loop {
            if !batches_open && summary.outstanding() == 0 {
                break;
            }

            tokio::select! {
                received = batches.recv(), if batches_open => match (received, &results_tx) {
                    (Some(group), Some(sender)) => {
                        summary.batches += 1;
                        summary.dispatched += group.len();
                        tracing::debug!(batch_size = group.len(), "dispatching batch");
                        tasks.spawn(archive_batch(
                            Arc::clone(&worker),
                            Arc::clone(&permits),
                            group,
                            sender.clone(),
                        ));
                    }
                    _ => {
                        batches_open = false;
                        results_tx = None;
                    }
                },
                result = results_rx.recv() => {
                    let Some(status) = result else {
                        tracing::error!(
                            outstanding = summary.outstanding(),
                            "workers exited before reporting every pull request"
                        );
                        break;
                    };
                    summary.record(&status);
                    forward(&mut output, status).await;
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(error) = joined {
                        tracing::error!(%error, "batch worker failed");
                    }
                },
            }
        }

        summary
    }
}

/// Archives one batch sequentially once a worker permit is available.
async fn archive_batch(
    worker: Arc<dyn ArchiveWorker>,
    permits: Arc<Semaphore>,
    group: Vec<PullRequest>,
    results: mpsc::Sender<OfflineStatusResponse>,
) {
    let Ok(_permit) = permits.acquire_owned().await else {
        return;
    };
    for pull_request in &group {
        let status = worker.archive_one(pull_request).await;
        if results.send(status).await.is_err() {
            return;
        }
    }
}

async fn forward(
    output: &mut Option<mpsc::Sender<OfflineStatusResponse>>,
    status: OfflineStatusResponse,
) {
    let Some(sender) = output.as_ref() else {
        return;
    };
    if sender.send(status).await.is_err() {
        tracing::warn!("status receiver dropped; draining remaining statuses");
        *output = None;
    }
}

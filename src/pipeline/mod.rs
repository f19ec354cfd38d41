//! Streaming archive pipeline.
//!
//! ```text
//! Fetcher ──PullRequest──▶ Batcher ──Vec<PullRequest>──▶ Synchronizer ──▶ statuses
//!                                                         │  ▲
//!                                         one task per batch  results channel
//! ```
//!
//! [`ArchivePipeline::start`] spawns every stage and hands back a
//! [`PipelineRun`] whose status stream yields one [`OfflineStatusResponse`]
//! per pull request, in completion order.

pub mod batcher;
pub mod fetcher;
pub mod synchronizer;

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

pub use batcher::batch;
pub use fetcher::fetch_pull_requests;
pub use synchronizer::{PipelineSummary, Synchronizer};

use crate::archive::{ArchiveWorker, OfflineStatusResponse};
use crate::github::error::IntakeError;
use crate::github::gateway::{
    ListPullRequestsParams, MAX_PER_PAGE, PullRequestState, RepositoryGateway,
};
use crate::github::locator::RepositoryLocator;

/// Pull requests per batch unless configured.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = non_zero(5);
/// Concurrent batch workers unless configured.
pub const DEFAULT_MAX_WORKERS: NonZeroUsize = non_zero(8);
/// Results channel capacity unless configured.
pub const DEFAULT_RESULT_CAPACITY: NonZeroUsize = non_zero(1000);

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(count) => count,
        None => NonZeroUsize::MIN,
    }
}

/// Tuning for an archive run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Pull request state filter.
    pub state: PullRequestState,
    /// Listing page size.
    pub per_page: u8,
    /// Pull requests per batch.
    pub batch_size: NonZeroUsize,
    /// Batches archived concurrently.
    pub max_workers: NonZeroUsize,
    /// Capacity of the results channel.
    pub result_capacity: NonZeroUsize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            state: PullRequestState::Open,
            per_page: MAX_PER_PAGE,
            batch_size: DEFAULT_BATCH_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
            result_capacity: DEFAULT_RESULT_CAPACITY,
        }
    }
}

/// Archives every pull request of one repository.
pub struct ArchivePipeline {
    repositories: Arc<dyn RepositoryGateway>,
    worker: Arc<dyn ArchiveWorker>,
    locator: RepositoryLocator,
    options: PipelineOptions,
}

impl ArchivePipeline {
    /// Creates a pipeline listing pull requests through `repositories` and
    /// archiving them with `worker`.
    #[must_use]
    pub fn new(
        repositories: Arc<dyn RepositoryGateway>,
        worker: Arc<dyn ArchiveWorker>,
        locator: RepositoryLocator,
        options: PipelineOptions,
    ) -> Self {
        Self {
            repositories,
            worker,
            locator,
            options,
        }
    }

    /// Spawns the fetcher, batcher and synchronizer.
    ///
    /// Must be called within a Tokio runtime.
    #[must_use]
    pub fn start(self) -> PipelineRun {
        let Self {
            repositories,
            worker,
            locator,
            options,
        } = self;

        tracing::info!(
            repo = %locator,
            state = options.state.as_str(),
            batch_size = options.batch_size.get(),
            "starting archive run"
        );

        let (pull_requests_tx, pull_requests_rx) =
            mpsc::channel(usize::from(options.per_page.max(1)));
        let (batches_tx, batches_rx) = mpsc::channel(options.max_workers.get());
        let (statuses_tx, statuses_rx) = mpsc::channel(options.result_capacity.get());

        let params = ListPullRequestsParams {
            state: options.state,
            page: 1,
            per_page: options.per_page,
        };
        let fetcher = tokio::spawn(async move {
            fetch_pull_requests(repositories.as_ref(), &locator, params, pull_requests_tx).await
        });
        let batcher = tokio::spawn(batch(pull_requests_rx, batches_tx, options.batch_size));
        let synchronizer = Synchronizer::new(options.max_workers, options.result_capacity);

        let handle = tokio::spawn(async move {
            let summary = synchronizer.run(worker, batches_rx, statuses_tx).await;
            let batches = batcher.await.map_err(task_failed)?;
            let fetched = fetcher.await.map_err(task_failed)??;
            tracing::info!(
                fetched,
                batches,
                dispatched = summary.dispatched,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "archive run finished"
            );
            Ok(summary)
        });

        PipelineRun {
            statuses: statuses_rx,
            handle,
        }
    }
}

impl std::fmt::Debug for ArchivePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchivePipeline")
            .field("locator", &self.locator)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn task_failed(error: JoinError) -> IntakeError {
    IntakeError::Pipeline {
        message: error.to_string(),
    }
}

/// A running pipeline.
#[derive(Debug)]
pub struct PipelineRun {
    statuses: mpsc::Receiver<OfflineStatusResponse>,
    handle: JoinHandle<Result<PipelineSummary, IntakeError>>,
}

impl PipelineRun {
    /// Waits for the next status; `None` once every status has been received.
    pub async fn next_status(&mut self) -> Option<OfflineStatusResponse> {
        self.statuses.recv().await
    }

    /// Waits for the pipeline to finish.
    ///
    /// Statuses not yet received are discarded; the pipeline still archives
    /// every pull request it dispatched.
    ///
    /// # Errors
    ///
    /// Returns the listing error that ended the run early, or
    /// [`IntakeError::Pipeline`] when a stage task panicked.
    pub async fn finish(self) -> Result<PipelineSummary, IntakeError> {
        let Self { statuses, handle } = self;
        drop(statuses);
        handle.await.map_err(task_failed)?
    }
}

//! Pullbox library crate for archiving GitHub pull requests offline.
//!
//! The library lists a repository's pull requests through Octocrab, groups
//! them into batches, and archives each one (description, patch and
//! conversation) as individual messages in a local maildir. Every pull
//! request yields exactly one [`OfflineStatusResponse`].

pub mod archive;
pub mod config;
pub mod github;
pub mod pipeline;
pub mod telemetry;

pub use archive::{
    ArchiveError, ArchiveOutcome, ArchiveWorker, Maildir, MessageStore, OfflineStatusResponse,
    PullRequestArchiver, Recipient,
};
pub use config::PullboxConfig;
pub use github::{
    IntakeError, OctocrabGateway, PersonalAccessToken, PullRequestState, RepositoryLocator,
};
pub use pipeline::{ArchivePipeline, PipelineOptions, PipelineRun, PipelineSummary};

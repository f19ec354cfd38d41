//! Archival of a single pull request into the message store.
//!
//! Fetching the patch and the conversation comments are soft steps: their
//! failures are logged and recorded as omissions while the archive is still
//! written. Only a failure to persist the rendered messages fails the pull
//! request.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::github::error::IntakeError;
use crate::github::gateway::{ListCommentsParams, MAX_PER_PAGE, PullRequestGateway};
use crate::github::locator::{PullRequestNumber, RepositoryLocator};
use crate::github::models::{IssueComment, PullRequest};

use super::comment::{Comment, Comments};
use super::error::ArchiveError;
use super::maildir::MessageStore;
use super::mbox;
use super::recipient::Recipient;
use super::status::OfflineStatusResponse;

/// Content left out of an otherwise written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Omission {
    /// The patch could not be downloaded.
    Patch(IntakeError),
    /// Comment listing stopped early; pages fetched before the error are kept.
    Comments {
        /// Number of pages fetched successfully.
        pages_fetched: u32,
        /// The error that stopped listing.
        error: IntakeError,
    },
}

impl std::fmt::Display for Omission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patch(error) => write!(f, "patch omitted: {error}"),
            Self::Comments {
                pages_fetched,
                error,
            } => write!(
                f,
                "comments truncated after {pages_fetched} page(s): {error}"
            ),
        }
    }
}

/// Result of archiving one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Every message was fetched and written.
    Complete {
        /// Store identifiers of the written messages, in thread order.
        messages: Vec<String>,
    },
    /// The archive was written without some content.
    Degraded {
        /// Store identifiers of the written messages, in thread order.
        messages: Vec<String>,
        /// What was left out.
        omissions: Vec<Omission>,
    },
    /// The archive could not be written.
    Failed {
        /// The persistence error.
        error: ArchiveError,
    },
}

impl ArchiveOutcome {
    /// Collapses the outcome into the status reported to callers.
    ///
    /// Degraded archives report success.
    #[must_use]
    pub fn into_status(self, number: PullRequestNumber) -> OfflineStatusResponse {
        match self {
            Self::Complete { messages } | Self::Degraded { messages, .. } => {
                OfflineStatusResponse::succeeded(number, messages.into_iter().next())
            }
            Self::Failed { error } => OfflineStatusResponse::failed(number, error),
        }
    }
}

/// Archives pull requests one at a time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveWorker: Send + Sync {
    /// Archives `pull_request` and reports its terminal status.
    async fn archive_one(&self, pull_request: &PullRequest) -> OfflineStatusResponse;
}

/// Writes a pull request, its patch and its conversation into a
/// [`MessageStore`].
pub struct PullRequestArchiver {
    gateway: Arc<dyn PullRequestGateway>,
    store: Arc<dyn MessageStore>,
    recipient: Arc<Recipient>,
    locator: RepositoryLocator,
    per_page: u8,
}

impl PullRequestArchiver {
    /// Creates an archiver for pull requests of `locator`.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PullRequestGateway>,
        store: Arc<dyn MessageStore>,
        recipient: Arc<Recipient>,
        locator: RepositoryLocator,
    ) -> Self {
        Self {
            gateway,
            store,
            recipient,
            locator,
            per_page: MAX_PER_PAGE,
        }
    }

    /// Overrides the comment page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    /// Archives one pull request.
    pub async fn archive(&self, pull_request: &PullRequest) -> ArchiveOutcome {
        let number = pull_request.number;
        let to = self.recipient.address().await;
        let mut comments = Comments::new();
        let mut omissions = Vec::new();

        comments.push(Comment::opening(pull_request, &to));

        match self.gateway.pull_request_patch(pull_request).await {
            Ok(patch) => comments.push(Comment::patch(pull_request, &to, patch, Utc::now())),
            Err(error) => {
                tracing::warn!(repo = %self.locator, %number, %error, "unable to fetch patch");
                omissions.push(Omission::Patch(error));
            }
        }

        let (replies, truncated) = self.collect_comments(number).await;
        for reply in &replies {
            comments.push(Comment::reply(pull_request, &to, reply));
        }
        if let Some(omission) = truncated {
            omissions.push(omission);
        }

        comments.sort_chronologically();

        match self.persist(&comments).await {
            Ok(messages) if omissions.is_empty() => ArchiveOutcome::Complete { messages },
            Ok(messages) => ArchiveOutcome::Degraded {
                messages,
                omissions,
            },
            Err(error) => ArchiveOutcome::Failed { error },
        }
    }

    /// Lists every conversation comment, stopping at the first failed page.
    async fn collect_comments(
        &self,
        number: PullRequestNumber,
    ) -> (Vec<IssueComment>, Option<Omission>) {
        let mut collected = Vec::new();
        let mut params = ListCommentsParams {
            per_page: self.per_page,
            ..ListCommentsParams::first_page(number)
        };

        loop {
            match self
                .gateway
                .list_issue_comments(&self.locator, &params)
                .await
            {
                Ok(page) => {
                    tracing::debug!(
                        %number,
                        page = params.page,
                        count = page.items.len(),
                        "fetched comments"
                    );
                    collected.extend(page.items);
                    match page.page_info.next_page() {
                        Some(next) => params.page = next,
                        None => return (collected, None),
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        repo = %self.locator,
                        %number,
                        page = params.page,
                        %error,
                        "unable to fetch comments"
                    );
                    let omission = Omission::Comments {
                        pages_fetched: params.page.saturating_sub(1),
                        error,
                    };
                    return (collected, Some(omission));
                }
            }
        }
    }

    /// Renders every message and delivers them on the blocking pool,
    /// stopping at the first failure.
    async fn persist(&self, comments: &Comments) -> Result<Vec<String>, ArchiveError> {
        let rendered: Vec<String> = comments.iter().map(mbox::render).collect();
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || {
            rendered
                .iter()
                .map(|message| store.deliver(message.as_bytes()))
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(|error| ArchiveError::Delivery {
            message: error.to_string(),
        })?
    }
}

impl std::fmt::Debug for PullRequestArchiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullRequestArchiver")
            .field("locator", &self.locator)
            .field("recipient", &self.recipient)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ArchiveWorker for PullRequestArchiver {
    async fn archive_one(&self, pull_request: &PullRequest) -> OfflineStatusResponse {
        let number = pull_request.number;
        let outcome = self.archive(pull_request).await;
        if let ArchiveOutcome::Degraded { omissions, .. } = &outcome {
            let summary: Vec<String> = omissions.iter().map(ToString::to_string).collect();
            tracing::warn!(%number, omissions = ?summary, "archived with omissions");
        }
        outcome.into_status(number)
    }
}

#[cfg(test)]
#[path = "archiver_tests.rs"]
mod tests;

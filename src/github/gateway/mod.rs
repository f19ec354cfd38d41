//! Gateways for reading pull requests, patches and comments from GitHub.
//!
//! Each concern sits behind its own trait so the harvesting pipeline can be
//! driven by mocks in tests, while [`OctocrabGateway`] implements all of them
//! against the real API.

mod client;
mod error_mapping;
mod pull_request;
mod repository;
mod types;
mod user;

pub use client::OctocrabGateway;
pub use types::{
    ListCommentsParams, ListPullRequestsParams, MAX_PER_PAGE, PaginatedComments,
    PaginatedPullRequests, PullRequestState,
};

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{AuthenticatedUser, PullRequest};

/// Gateway for repository-level listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// List one page of pull requests for the repository.
    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        params: &ListPullRequestsParams,
    ) -> Result<PaginatedPullRequests, IntakeError>;
}

/// Gateway for the content attached to a single pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Fetch the raw patch text from the pull request's patch URL.
    async fn pull_request_patch(&self, pull_request: &PullRequest) -> Result<String, IntakeError>;

    /// List one page of conversation comments for the pull request.
    async fn list_issue_comments(
        &self,
        locator: &RepositoryLocator,
        params: &ListCommentsParams,
    ) -> Result<PaginatedComments, IntakeError>;
}

/// Gateway for the identity behind the token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Resolve the currently authenticated user.
    async fn current_user(&self) -> Result<AuthenticatedUser, IntakeError>;
}

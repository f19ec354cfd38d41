//! GitHub access for pull request harvesting.
//!
//! This module wraps Octocrab to list a repository's pull requests, download
//! their patches and conversation comments, and resolve the authenticated
//! user. Errors are mapped into user-friendly variants so that callers can
//! surface precise failures without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;

pub use error::IntakeError;
pub use gateway::{
    ListCommentsParams, ListPullRequestsParams, OctocrabGateway, PaginatedComments,
    PaginatedPullRequests, PullRequestGateway, PullRequestState, RepositoryGateway, UserGateway,
};
pub use locator::{
    PersonalAccessToken, PullRequestNumber, RepositoryLocator, RepositoryName, RepositoryOwner,
};
pub use models::{AuthenticatedUser, Author, IssueComment, PullRequest};
pub use pagination::PageInfo;

#[cfg(test)]
pub use gateway::{MockPullRequestGateway, MockRepositoryGateway, MockUserGateway};

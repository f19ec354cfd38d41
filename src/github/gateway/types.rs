//! Public request and response types for gateway operations.

use std::str::FromStr;

use crate::github::error::IntakeError;
use crate::github::locator::PullRequestNumber;
use crate::github::models::{IssueComment, PullRequest};
use crate::github::pagination::PageInfo;

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Pull request state filter for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestState {
    /// Only open pull requests.
    #[default]
    Open,
    /// Only closed (including merged) pull requests.
    Closed,
    /// All pull requests regardless of state.
    All,
}

impl PullRequestState {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl FromStr for PullRequestState {
    type Err = IntakeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" | "merged" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            other => Err(IntakeError::Configuration {
                message: format!(
                    "unknown pull request state '{other}' (expected open, closed or all)"
                ),
            }),
        }
    }
}

/// Parameters for listing pull requests.
///
/// Results are always requested oldest first (`sort=created`,
/// `direction=asc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPullRequestsParams {
    /// Filter by state.
    pub state: PullRequestState,
    /// Page number to fetch (1-based).
    pub page: u32,
    /// Items per page (max 100).
    pub per_page: u8,
}

impl Default for ListPullRequestsParams {
    fn default() -> Self {
        Self {
            state: PullRequestState::Open,
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    }
}

/// Parameters for listing conversation comments on one pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCommentsParams {
    /// Pull request whose comments are listed.
    pub number: PullRequestNumber,
    /// Page number to fetch (1-based).
    pub page: u32,
    /// Items per page (max 100).
    pub per_page: u8,
}

impl ListCommentsParams {
    /// First page of comments for `number` at the maximum page size.
    #[must_use]
    pub const fn first_page(number: PullRequestNumber) -> Self {
        Self {
            number,
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    }
}

/// One page of pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedPullRequests {
    /// Pull requests on this page, in API order.
    pub items: Vec<PullRequest>,
    /// Pagination state.
    pub page_info: PageInfo,
}

/// One page of conversation comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedComments {
    /// Comments on this page, in API order.
    pub items: Vec<IssueComment>,
    /// Pagination state.
    pub page_info: PageInfo,
}

pub(crate) fn validate_pagination_params(page: u32, per_page: u8) -> Result<(), IntakeError> {
    if page == 0 {
        return Err(IntakeError::InvalidPagination {
            message: "page must be at least 1".to_owned(),
        });
    }

    if per_page == 0 {
        return Err(IntakeError::InvalidPagination {
            message: "per_page must be at least 1".to_owned(),
        });
    }

    if per_page > MAX_PER_PAGE {
        return Err(IntakeError::InvalidPagination {
            message: format!("per_page must not exceed {MAX_PER_PAGE}"),
        });
    }

    Ok(())
}

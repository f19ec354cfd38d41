//! Test helpers for constructing pull request and comment fixtures.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use pullbox::github::models::test_support::{issue_comment, pull_request};
//!
//! let opened = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("valid timestamp");
//! let pr = pull_request(42, "Add feature", "octocat", opened);
//! assert_eq!(pr.number.get(), 42);
//!
//! let reply = issue_comment(1, "alice", "Nice!", opened);
//! assert_eq!(reply.author.handle(), "alice");
//! ```

use chrono::{DateTime, Utc};

use super::{Author, IssueComment, PullRequest};
use crate::github::locator::PullRequestNumber;

/// Builds a user author with no display name.
#[must_use]
pub fn user(login: &str) -> Author {
    Author::User {
        login: login.to_owned(),
        name: None,
    }
}

/// Builds a pull request opened by `author` at `created_at`.
///
/// The HTML URL points at `github.com/octo/repo`.
///
/// # Panics
///
/// Panics when `number` is zero.
#[must_use]
pub fn pull_request(
    number: u64,
    title: &str,
    author: &str,
    created_at: DateTime<Utc>,
) -> PullRequest {
    let Ok(validated) = PullRequestNumber::new(number) else {
        panic!("pull request fixtures need a non-zero number");
    };
    PullRequest {
        number: validated,
        title: title.to_owned(),
        body: format!("Body of #{number}"),
        html_url: format!("https://github.com/octo/repo/pull/{number}"),
        created_at,
        author: user(author),
    }
}

/// Builds an issue comment written by `author`.
#[must_use]
pub fn issue_comment(
    id: u64,
    author: &str,
    body: &str,
    created_at: DateTime<Utc>,
) -> IssueComment {
    IssueComment {
        id,
        body: body.to_owned(),
        author: user(author),
        created_at,
    }
}

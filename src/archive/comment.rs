//! Normalised mail records built from a pull request and its discussion.
//!
//! The pull request body, its patch and every conversation comment arrive
//! from different API calls; each is converted into a [`Comment`] so the
//! whole thread can be ordered by time and rendered uniformly.

use chrono::{DateTime, Utc};

use crate::github::models::{IssueComment, PullRequest};

/// Domain used for author addresses (`<handle>@users.noreply.<domain>`).
pub const NOREPLY_DOMAIN: &str = "github.com";

/// One message of an archived thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Recipient address shared by every message of the archive.
    pub to: String,
    /// Author display name.
    pub name: String,
    /// Author handle.
    pub username: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// When the message was written.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Opening message carrying the pull request description.
    #[must_use]
    pub fn opening(pull_request: &PullRequest, to: &str) -> Self {
        Self {
            to: to.to_owned(),
            name: pull_request.author.display_name().to_owned(),
            username: pull_request.author.handle().to_owned(),
            subject: subject(pull_request),
            message: pull_request.body.clone(),
            created_at: pull_request.created_at,
        }
    }

    /// Reply carrying the raw patch.
    ///
    /// A patch has no timestamp of its own, so it is stamped with `fetched_at`
    /// and normally sorts after every comment.
    #[must_use]
    pub fn patch(
        pull_request: &PullRequest,
        to: &str,
        patch: String,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            to: to.to_owned(),
            name: String::new(),
            username: String::new(),
            subject: reply_subject(pull_request),
            message: patch,
            created_at: fetched_at,
        }
    }

    /// Reply carrying one conversation comment.
    #[must_use]
    pub fn reply(pull_request: &PullRequest, to: &str, comment: &IssueComment) -> Self {
        Self {
            to: to.to_owned(),
            name: comment.author.display_name().to_owned(),
            username: comment.author.handle().to_owned(),
            subject: reply_subject(pull_request),
            message: comment.body.clone(),
            created_at: comment.created_at,
        }
    }

    /// The author's no-reply address.
    #[must_use]
    pub fn email(&self) -> String {
        format!("{}@users.noreply.{NOREPLY_DOMAIN}", self.username)
    }
}

/// `[#<number>] <title>`
fn subject(pull_request: &PullRequest) -> String {
    format!("[#{}] {}", pull_request.number, pull_request.title)
}

/// `RE: [#<number>] <title>`
fn reply_subject(pull_request: &PullRequest) -> String {
    format!("RE: {}", subject(pull_request))
}

/// An archived thread in arrival order until sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments(Vec<Comment>);

impl Comments {
    /// Creates an empty thread.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a message in arrival order.
    pub fn push(&mut self, comment: Comment) {
        self.0.push(comment);
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the thread has no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Orders messages by creation time, oldest first.
    ///
    /// The sort is stable: messages with equal timestamps keep their arrival
    /// order (body, then patch, then replies as fetched).
    pub fn sort_chronologically(&mut self) {
        self.0.sort_by_key(|comment| comment.created_at);
    }

    /// Iterates over the messages.
    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Comments {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Comment> for Comments {
    fn from_iter<I: IntoIterator<Item = Comment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//! Data models for pull requests, their authors and discussion comments.
//!
//! Types prefixed with `Api` are internal deserialisation targets for the
//! GitHub REST API and convert into the public domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::locator::PullRequestNumber;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Login GitHub reports for deleted accounts.
const GHOST_LOGIN: &str = "ghost";

/// The actor that opened a pull request or wrote a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    /// A human account.
    User {
        /// Stable handle.
        login: String,
        /// Display name, when the profile sets one.
        name: Option<String>,
    },
    /// An automation account such as `dependabot[bot]`.
    Bot {
        /// Stable handle.
        login: String,
    },
}

impl Author {
    /// Resolves an author from the loose shape GitHub returns.
    ///
    /// A non-empty bot login wins; otherwise the user login and optional
    /// display name are used.
    ///
    /// ```
    /// use pullbox::github::Author;
    ///
    /// let author = Author::resolve(Some(""), "dependabot[bot]", None);
    /// assert_eq!(author.handle(), "dependabot[bot]");
    /// ```
    #[must_use]
    pub fn resolve(bot_login: Option<&str>, user_login: &str, user_name: Option<&str>) -> Self {
        match bot_login {
            Some(login) if !login.is_empty() => Self::Bot {
                login: login.to_owned(),
            },
            _ => Self::User {
                login: user_login.to_owned(),
                name: user_name.map(ToOwned::to_owned),
            },
        }
    }

    /// Stable handle used for the author's mail address.
    #[must_use]
    pub fn handle(&self) -> &str {
        match self {
            Self::User { login, .. } | Self::Bot { login } => login,
        }
    }

    /// Human-readable name, falling back to the handle.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::User {
                name: Some(name), ..
            } if !name.is_empty() => name,
            Self::User { login, .. } | Self::Bot { login } => login,
        }
    }
}

/// A pull request as returned by the repository listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: PullRequestNumber,
    /// Title of the pull request.
    pub title: String,
    /// Description; empty when the author left none.
    pub body: String,
    /// Canonical HTML URL; the patch lives at `<url>.patch`.
    pub html_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Who opened the pull request.
    pub author: Author,
}

impl PullRequest {
    /// URL of the raw patch for this pull request.
    #[must_use]
    pub fn patch_url(&self) -> String {
        format!("{}.patch", self.html_url)
    }
}

/// Conversation (issue-style) comment on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: String,
    /// Who wrote the comment.
    pub author: Author,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// The account the token authenticates as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account login.
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) html_url: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComment {
    pub(crate) id: u64,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiAuthenticatedUser {
    pub(crate) login: String,
}

impl From<Option<ApiUser>> for Author {
    fn from(value: Option<ApiUser>) -> Self {
        let Some(user) = value else {
            return Self::resolve(None, GHOST_LOGIN, None);
        };
        let login = user.login.as_deref().unwrap_or(GHOST_LOGIN);
        let bot_login = user
            .kind
            .as_deref()
            .filter(|kind| kind.eq_ignore_ascii_case("bot"))
            .map(|_| login);
        Self::resolve(bot_login, login, user.name.as_deref())
    }
}

impl TryFrom<ApiPullRequest> for PullRequest {
    type Error = super::error::IntakeError;

    fn try_from(value: ApiPullRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            number: PullRequestNumber::new(value.number)?,
            title: value.title.unwrap_or_default(),
            body: value.body.unwrap_or_default(),
            html_url: value.html_url,
            created_at: value.created_at,
            author: value.user.into(),
        })
    }
}

impl From<ApiComment> for IssueComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.body.unwrap_or_default(),
            author: value.user.into(),
            created_at: value.created_at,
        }
    }
}

impl From<ApiAuthenticatedUser> for AuthenticatedUser {
    fn from(value: ApiAuthenticatedUser) -> Self {
        Self { login: value.login }
    }
}

//! Per-pull-request status reported to the caller.

use crate::github::locator::PullRequestNumber;

use super::error::ArchiveError;

/// Terminal status for one archived pull request.
///
/// Exactly one is emitted for every pull request the pipeline dispatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineStatusResponse {
    /// Whether the archive was written.
    pub success: bool,
    /// Identifier of the first written message, when successful.
    pub filename: Option<String>,
    /// Pull request the status refers to.
    pub number: PullRequestNumber,
    /// The hard error, when unsuccessful.
    pub error: Option<ArchiveError>,
}

impl OfflineStatusResponse {
    /// A successful archive whose first message was stored as `filename`.
    #[must_use]
    pub const fn succeeded(number: PullRequestNumber, filename: Option<String>) -> Self {
        Self {
            success: true,
            filename,
            number,
            error: None,
        }
    }

    /// A failed archive.
    #[must_use]
    pub const fn failed(number: PullRequestNumber, error: ArchiveError) -> Self {
        Self {
            success: false,
            filename: None,
            number,
            error: Some(error),
        }
    }
}

//! Offline archival of pull requests into a maildir.
//!
//! A pull request becomes a thread of [`Comment`]s (description, patch and
//! conversation), rendered as individual mail messages by [`mbox::render`]
//! and delivered to a [`MessageStore`].

pub mod archiver;
pub mod comment;
pub mod error;
pub mod maildir;
pub mod mbox;
pub mod recipient;
pub mod status;

pub use archiver::{ArchiveOutcome, ArchiveWorker, Omission, PullRequestArchiver};
pub use comment::{Comment, Comments};
pub use error::ArchiveError;
pub use maildir::{Maildir, MessageStore};
pub use recipient::Recipient;
pub use status::OfflineStatusResponse;

#[cfg(test)]
pub use archiver::MockArchiveWorker;

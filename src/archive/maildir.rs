//! Maildir archive store.
//!
//! Each message is written to `tmp/` and renamed into `new/` under a
//! process-unique name, so concurrent workers delivering into the same
//! directory never overwrite or interleave each other's messages.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use chrono::Utc;

use super::error::ArchiveError;

const SUBDIRECTORIES: [&str; 3] = ["tmp", "new", "cur"];

static DELIVERY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Destination for rendered messages.
#[cfg_attr(test, mockall::automock)]
pub trait MessageStore: Send + Sync {
    /// Persists one message and returns its identifier within the store.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Store`] when the message cannot be written.
    fn deliver(&self, message: &[u8]) -> Result<String, ArchiveError>;
}

/// A maildir rooted at a directory on disk.
#[derive(Debug)]
pub struct Maildir {
    root: Utf8PathBuf,
    dir: Dir,
    hostname: String,
}

impl Maildir {
    /// Opens the maildir at `root`, creating it and its `tmp`, `new` and
    /// `cur` subdirectories when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Store`] when a directory cannot be created or
    /// opened.
    pub fn open(root: &Utf8Path) -> Result<Self, ArchiveError> {
        let hostname = sysinfo::System::host_name().unwrap_or_else(|| "localhost".to_owned());
        Self::open_with_hostname(root, &hostname)
    }

    /// Opens the maildir at `root`, naming deliveries after `hostname`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Store`] when a directory cannot be created or
    /// opened.
    pub fn open_with_hostname(root: &Utf8Path, hostname: &str) -> Result<Self, ArchiveError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|error| ArchiveError::store(root, &error))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|error| ArchiveError::store(root, &error))?;

        for subdirectory in SUBDIRECTORIES {
            dir.create_dir_all(subdirectory)
                .map_err(|error| ArchiveError::store(root.join(subdirectory), &error))?;
        }

        Ok(Self {
            root: root.to_owned(),
            dir,
            hostname: sanitize_hostname(hostname),
        })
    }

    /// Returns the maildir root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn unique_name(&self) -> String {
        let now = Utc::now();
        let sequence = DELIVERY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}.M{}P{}Q{sequence}.{}",
            now.timestamp(),
            now.timestamp_subsec_micros(),
            std::process::id(),
            self.hostname,
        )
    }
}

impl MessageStore for Maildir {
    fn deliver(&self, message: &[u8]) -> Result<String, ArchiveError> {
        let name = self.unique_name();
        let staged = Utf8PathBuf::from("tmp").join(&name);
        let delivered = Utf8PathBuf::from("new").join(&name);

        let mut file = self
            .dir
            .create(&staged)
            .map_err(|error| ArchiveError::store(self.root.join(&staged), &error))?;
        file.write_all(message)
            .and_then(|()| file.sync_all())
            .map_err(|error| ArchiveError::store(self.root.join(&staged), &error))?;
        drop(file);

        self.dir
            .rename(&staged, &self.dir, &delivered)
            .map_err(|error| ArchiveError::store(self.root.join(&delivered), &error))?;

        tracing::debug!(path = %self.root.join(&delivered), "delivered message");
        Ok(delivered.into_string())
    }
}

/// Escapes the characters maildir reserves in unique names.
fn sanitize_hostname(hostname: &str) -> String {
    hostname.replace('/', "\\057").replace(':', "\\072")
}

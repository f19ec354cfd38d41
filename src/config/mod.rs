//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pullbox.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PULLBOX_REPO`, `PULLBOX_TOKEN`, or legacy
//!    `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--repo`/`-r`, `--token`/`-t`, `--dir`/`-d`
//!
//! # Configuration File
//!
//! ```toml
//! repo = "octocat/hello-world"
//! token = "ghp_example"
//! dir = "/home/mona/Mail/hello-world"
//! state = "open"
//! batch_size = 5
//! max_workers = 8
//! timeout_seconds = 600
//! ```

use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::IntakeError;
use crate::github::gateway::{MAX_PER_PAGE, PullRequestState};
use crate::github::locator::RepositoryLocator;
use crate::pipeline::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_WORKERS, DEFAULT_RESULT_CAPACITY, PipelineOptions,
};

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PULLBOX_REPO` or `--repo`: Repository slug or URL
/// - `PULLBOX_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `PULLBOX_DIR` or `--dir`: Archive directory
///
/// # Example
///
/// ```no_run
/// use pullbox::PullboxConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = PullboxConfig::load().expect("failed to load configuration");
/// let locator = config.require_repository().expect("repository required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PULLBOX",
    discovery(
        dotfile_name = ".pullbox.toml",
        config_file_name = "pullbox.toml",
        app_name = "pullbox"
    )
)]
pub struct PullboxConfig {
    /// Repository to archive, as `owner/name` or a repository URL.
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `PULLBOX_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PULLBOX_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Maildir the archive is written to. Defaults to the current directory.
    ///
    /// Can be provided via:
    /// - CLI: `--dir <DIR>` or `-d <DIR>`
    /// - Environment: `PULLBOX_DIR`
    /// - Config file: `dir = "..."`
    #[ortho_config(cli_short = 'd')]
    pub dir: Option<String>,

    /// Pull request state to archive: `open`, `closed`, or `all`.
    #[ortho_config()]
    pub state: String,

    /// Number of pull requests each worker archives in sequence.
    #[ortho_config()]
    pub batch_size: usize,

    /// Page size for repository listings, between 1 and 100.
    #[ortho_config()]
    pub per_page: u8,

    /// Maximum number of batches archived concurrently.
    #[ortho_config()]
    pub max_workers: usize,

    /// Number of statuses buffered between workers and the caller.
    #[ortho_config()]
    pub result_capacity: usize,

    /// Overall deadline for the run, in seconds.
    ///
    /// When it passes, the run stops waiting for outstanding statuses.
    /// In-flight requests are not cancelled.
    #[ortho_config()]
    pub timeout_seconds: Option<u64>,
}

impl Default for PullboxConfig {
    fn default() -> Self {
        Self {
            repo: None,
            token: None,
            dir: None,
            state: PullRequestState::Open.as_str().to_owned(),
            batch_size: DEFAULT_BATCH_SIZE.get(),
            per_page: MAX_PER_PAGE,
            max_workers: DEFAULT_MAX_WORKERS.get(),
            result_capacity: DEFAULT_RESULT_CAPACITY.get(),
            timeout_seconds: None,
        }
    }
}

impl PullboxConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, IntakeError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(IntakeError::MissingToken)
    }

    /// Parses the configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingRepository`] when no repository is
    /// configured, or the parse error for a malformed slug or URL.
    pub fn require_repository(&self) -> Result<RepositoryLocator, IntakeError> {
        let repo = self
            .repo
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(IntakeError::MissingRepository)?;
        RepositoryLocator::from_input(repo)
    }

    /// Returns the archive directory, falling back to the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Io`] when the current directory cannot be
    /// determined or is not valid UTF-8.
    pub fn archive_dir(&self) -> Result<Utf8PathBuf, IntakeError> {
        if let Some(dir) = self.dir.as_deref().filter(|value| !value.is_empty()) {
            return Ok(Utf8PathBuf::from(dir));
        }

        let current = env::current_dir().map_err(|error| IntakeError::Io {
            message: format!("failed to resolve current directory: {error}"),
        })?;
        Utf8PathBuf::from_path_buf(current).map_err(|path| IntakeError::Io {
            message: format!("current directory is not valid UTF-8: {}", path.display()),
        })
    }

    /// Returns the overall deadline, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Checks value ranges that the type system does not enforce.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), IntakeError> {
        self.pipeline_options().map(|_| ())
    }

    /// Converts the tuning fields into [`PipelineOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] naming the first invalid field.
    pub fn pipeline_options(&self) -> Result<PipelineOptions, IntakeError> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(IntakeError::Configuration {
                message: format!("per_page must be between 1 and {MAX_PER_PAGE}"),
            });
        }
        if self.timeout_seconds == Some(0) {
            return Err(IntakeError::Configuration {
                message: "timeout_seconds must be greater than zero".to_owned(),
            });
        }

        Ok(PipelineOptions {
            state: self.state.parse()?,
            per_page: self.per_page,
            batch_size: non_zero("batch_size", self.batch_size)?,
            max_workers: non_zero("max_workers", self.max_workers)?,
            result_capacity: non_zero("result_capacity", self.result_capacity)?,
        })
    }
}

fn non_zero(field: &str, value: usize) -> Result<NonZeroUsize, IntakeError> {
    NonZeroUsize::new(value).ok_or_else(|| IntakeError::Configuration {
        message: format!("{field} must be greater than zero"),
    })
}

#[cfg(test)]
mod tests;

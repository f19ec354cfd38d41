//! Tracing subscriber installation for the command-line tool.
//!
//! Logs go to stderr. `RUST_LOG` selects what is recorded (default
//! `pullbox=info`) and `LOG_FORMAT=json` switches to one JSON object per
//! line for log aggregation.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::github::error::IntakeError;

const DEFAULT_DIRECTIVE: &str = "pullbox=info";

/// Output format of the log stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Selects the format from a `LOG_FORMAT` value.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(format) if format.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Builds the event filter from a `RUST_LOG` value.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the directives do not parse.
pub fn env_filter(value: Option<&str>) -> Result<EnvFilter, IntakeError> {
    let directives = value
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE);
    EnvFilter::try_new(directives).map_err(|error| IntakeError::Configuration {
        message: format!("invalid RUST_LOG directives '{directives}': {error}"),
    })
}

/// Installs the global subscriber from `RUST_LOG` and `LOG_FORMAT`.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the filter does not parse or
/// a global subscriber is already installed.
pub fn init_tracing() -> Result<(), IntakeError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let log_format = std::env::var("LOG_FORMAT").ok();
    let filter = env_filter(rust_log.as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match LogFormat::from_env_value(log_format.as_deref()) {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
    };

    installed.map_err(|error| IntakeError::Configuration {
        message: format!("failed to install tracing subscriber: {error}"),
    })
}

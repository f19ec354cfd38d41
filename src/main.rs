//! Pullbox CLI entrypoint: archive a repository's pull requests to a maildir.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use pullbox::telemetry::init_tracing;
use pullbox::{IntakeError, PullboxConfig};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = init_tracing() {
        return report(&error);
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "archive run failed");
            report(&error)
        }
    }
}

async fn run() -> Result<(), IntakeError> {
    let config = load_config()?;
    config.validate()?;
    cli::archive::run(&config).await.map(|_| ())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PullboxConfig, IntakeError> {
    PullboxConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}

fn report(error: &IntakeError) -> ExitCode {
    if writeln!(io::stderr().lock(), "{error}").is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::FAILURE
}

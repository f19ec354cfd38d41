//! Repository archive operation.

use std::io::{self, Write};
use std::sync::Arc;

use camino::Utf8Path;
use pullbox::github::{PullRequestGateway, RepositoryGateway, UserGateway};
use pullbox::{
    ArchivePipeline, IntakeError, Maildir, OctocrabGateway, OfflineStatusResponse,
    PersonalAccessToken, PipelineRun, PipelineSummary, PullRequestArchiver, PullboxConfig,
    Recipient, RepositoryLocator,
};

use super::output::write_run_summary;

/// Archives every pull request of the configured repository.
///
/// # Errors
///
/// Returns [`IntakeError::MissingRepository`] or
/// [`IntakeError::MissingToken`] when required configuration is missing,
/// the listing error when the repository cannot be listed, or
/// [`IntakeError::Timeout`] when the configured deadline passes.
pub async fn run(config: &PullboxConfig) -> Result<PipelineSummary, IntakeError> {
    let mut stdout = io::stdout();
    run_with_gateway_builder(config, OctocrabGateway::for_token, &mut stdout).await
}

/// Archives pull requests using a custom gateway builder.
///
/// This function is exposed for testing with stub gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &PullboxConfig,
    build_gateway: F,
    writer: &mut W,
) -> Result<PipelineSummary, IntakeError>
where
    G: RepositoryGateway + PullRequestGateway + UserGateway + 'static,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, IntakeError>,
    W: Write,
{
    let options = config.pipeline_options()?;
    let locator = config.require_repository()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let dir = config.archive_dir()?;
    let store = Arc::new(open_maildir(&dir)?);
    let root = store.root().to_owned();

    let gateway = Arc::new(build_gateway(&token, &locator)?);
    let users = Arc::clone(&gateway) as Arc<dyn UserGateway>;
    let pull_requests = Arc::clone(&gateway) as Arc<dyn PullRequestGateway>;
    let recipient = Arc::new(Recipient::from_system(users));
    let archiver = PullRequestArchiver::new(pull_requests, store, recipient, locator.clone())
        .with_per_page(options.per_page);
    let pipeline = ArchivePipeline::new(gateway, Arc::new(archiver), locator.clone(), options);
    let mut run = pipeline.start();

    let mut received = 0_usize;
    match config.timeout() {
        Some(deadline) => {
            let statuses = report_statuses(&mut run, &mut received);
            if tokio::time::timeout(deadline, statuses).await.is_err() {
                tracing::error!(
                    repo = %locator,
                    received,
                    "deadline expired before every pull request reported"
                );
                return Err(IntakeError::Timeout {
                    seconds: deadline.as_secs(),
                    received,
                });
            }
        }
        None => report_statuses(&mut run, &mut received).await,
    }

    let summary = run.finish().await?;
    write_run_summary(writer, &locator, &root, &summary)?;
    Ok(summary)
}

fn open_maildir(dir: &Utf8Path) -> Result<Maildir, IntakeError> {
    Maildir::open(dir).map_err(|error| IntakeError::Io {
        message: error.to_string(),
    })
}

/// Logs every status as it arrives, counting them in `received`.
async fn report_statuses(run: &mut PipelineRun, received: &mut usize) {
    while let Some(status) = run.next_status().await {
        *received += 1;
        log_status(&status);
    }
}

fn log_status(status: &OfflineStatusResponse) {
    let number = status.number;
    match (&status.filename, &status.error) {
        (_, Some(error)) => tracing::error!(%number, %error, "failed to archive pull request"),
        (Some(filename), None) => tracing::info!(%number, %filename, "archived pull request"),
        (None, None) => tracing::info!(%number, "archived pull request"),
    }
}

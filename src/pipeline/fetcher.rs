//! Paginated listing of a repository's pull requests onto a stream.

use tokio::sync::mpsc;

use crate::github::error::IntakeError;
use crate::github::gateway::{ListPullRequestsParams, RepositoryGateway};
use crate::github::locator::RepositoryLocator;
use crate::github::models::PullRequest;

/// Lists every page of pull requests and forwards each item to `output`.
///
/// Each item of a page is sent before the next page is requested, so the
/// bounded `output` channel throttles listing. Returning drops `output`,
/// which closes the stream for downstream stages whether listing finished or
/// failed. A closed receiver stops listing early without error.
///
/// Returns the number of pull requests forwarded.
///
/// # Errors
///
/// Returns the gateway error for the first page that cannot be listed.
pub async fn fetch_pull_requests(
    gateway: &dyn RepositoryGateway,
    locator: &RepositoryLocator,
    mut params: ListPullRequestsParams,
    output: mpsc::Sender<PullRequest>,
) -> Result<usize, IntakeError> {
    let mut forwarded = 0_usize;

    loop {
        let page = gateway.list_pull_requests(locator, &params).await?;
        tracing::debug!(
            repo = %locator,
            page = params.page,
            count = page.items.len(),
            "listed pull requests"
        );

        for pull_request in page.items {
            if output.send(pull_request).await.is_err() {
                tracing::debug!(repo = %locator, "pull request stream closed by receiver");
                return Ok(forwarded);
            }
            forwarded += 1;
        }

        match page.page_info.next_page() {
            Some(next) => params.page = next,
            None => return Ok(forwarded),
        }
    }
}

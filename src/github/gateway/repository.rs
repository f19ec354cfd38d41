//! Repository-level pull request listing through Octocrab.

use async_trait::async_trait;
use octocrab::Page;

use crate::github::error::IntakeError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{ApiPullRequest, PullRequest};
use crate::github::pagination::PageInfo;

use super::RepositoryGateway;
use super::client::OctocrabGateway;
use super::error_mapping::map_octocrab_error;
use super::types::{ListPullRequestsParams, PaginatedPullRequests, validate_pagination_params};

#[async_trait]
impl RepositoryGateway for OctocrabGateway {
    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        params: &ListPullRequestsParams,
    ) -> Result<PaginatedPullRequests, IntakeError> {
        validate_pagination_params(params.page, params.per_page)?;

        let page_str = params.page.to_string();
        let per_page_str = params.per_page.to_string();

        let query_params = [
            ("state", params.state.as_str()),
            ("sort", "created"),
            ("direction", "asc"),
            ("page", page_str.as_str()),
            ("per_page", per_page_str.as_str()),
        ];

        let page_result: Page<ApiPullRequest> = self
            .client
            .get(locator.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        // Extract pagination info before consuming items.
        let has_next = page_result.next.is_some();
        let total_pages = page_result.number_of_pages();

        let items = page_result
            .items
            .into_iter()
            .map(PullRequest::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let page_info = PageInfo::builder(params.page, params.per_page)
            .total_pages(total_pages)
            .has_next(has_next)
            .build();

        Ok(PaginatedPullRequests { items, page_info })
    }
}

//! Patch and conversation-comment retrieval for a single pull request.

use async_trait::async_trait;
use http::StatusCode;
use http::header::AUTHORIZATION;
use octocrab::Page;

use crate::github::error::IntakeError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{ApiComment, IssueComment, PullRequest};
use crate::github::pagination::PageInfo;

use super::PullRequestGateway;
use super::client::OctocrabGateway;
use super::error_mapping::{map_http_error, map_octocrab_error, map_reqwest_error};
use super::types::{ListCommentsParams, PaginatedComments, validate_pagination_params};

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    async fn pull_request_patch(&self, pull_request: &PullRequest) -> Result<String, IntakeError> {
        let patch_url = pull_request.patch_url();
        let response = self
            .http
            .get(&patch_url)
            .header(AUTHORIZATION, format!("bearer {}", self.token.value()))
            .send()
            .await
            .map_err(|error| map_reqwest_error("patch", &error))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(map_http_error(
                "patch",
                status,
                Some(format!("bad response from {patch_url}")),
            ));
        }

        response
            .text()
            .await
            .map_err(|error| map_reqwest_error("patch", &error))
    }

    async fn list_issue_comments(
        &self,
        locator: &RepositoryLocator,
        params: &ListCommentsParams,
    ) -> Result<PaginatedComments, IntakeError> {
        validate_pagination_params(params.page, params.per_page)?;

        let page_str = params.page.to_string();
        let per_page_str = params.per_page.to_string();
        let query_params = [
            ("page", page_str.as_str()),
            ("per_page", per_page_str.as_str()),
        ];

        let page_result: Page<ApiComment> = self
            .client
            .get(
                locator.issue_comments_path(params.number),
                Some(&query_params),
            )
            .await
            .map_err(|error| map_octocrab_error("issue comments", &error))?;

        let page_info = PageInfo::builder(params.page, params.per_page)
            .total_pages(page_result.number_of_pages())
            .has_next(page_result.next.is_some())
            .build();

        Ok(PaginatedComments {
            items: page_result.items.into_iter().map(IssueComment::from).collect(),
            page_info,
        })
    }
}

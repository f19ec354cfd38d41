//! Wiremock stand-ins for the GitHub endpoints an archive run touches.

use camino::Utf8Path;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pullbox::github::{PullRequestGateway, UserGateway};
use pullbox::{
    ArchivePipeline, IntakeError, Maildir, OctocrabGateway, PersonalAccessToken, PipelineOptions,
    PullRequestArchiver, Recipient, RepositoryLocator,
};

/// Listing endpoint for `owner/repo` under the enterprise API prefix.
pub const PULLS_PATH: &str = "/api/v3/repos/owner/repo/pulls";
/// Patch text served for every pull request.
pub const PATCH_BODY: &str = "diff --git a/README b/README\n+hello\n";
/// Hostname used for maildir names and recipient addresses.
pub const ARCHIVE_HOST: &str = "archive-host";

/// Pull request JSON as the REST API returns it.
pub fn pull_request_json(server: &MockServer, number: u64) -> serde_json::Value {
    json!({
        "number": number,
        "title": format!("Change {number}"),
        "body": format!("Description of change {number}"),
        "state": "open",
        "html_url": format!("{}/owner/repo/pull/{number}", server.uri()),
        "created_at": "2024-01-01T00:00:00Z",
        "user": { "login": "contributor", "type": "User" }
    })
}

fn link_header(server: &MockServer, base: &str, next_page: u32) -> String {
    let next = format!("{}{base}?page={next_page}", server.uri());
    format!("<{next}>; rel=\"next\"")
}

/// Serves pull requests `first..=last` as listing page `page`.
pub async fn mount_pull_request_page(
    server: &MockServer,
    page: u32,
    first: u64,
    last: u64,
    has_next: bool,
) {
    let items: Vec<_> = (first..=last)
        .map(|number| pull_request_json(server, number))
        .collect();
    let mut response = ResponseTemplate::new(200).set_body_json(items);
    if has_next {
        response = response.insert_header("Link", link_header(server, PULLS_PATH, page + 1));
    }

    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Rejects listing page `page` as if the token had been revoked.
pub async fn mount_rejected_pull_request_page(server: &MockServer, page: u32) {
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(server)
        .await;
}

/// Serves the same patch for every pull request.
pub async fn mount_patches(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/owner/repo/pull/\d+\.patch$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PATCH_BODY))
        .mount(server)
        .await;
}

/// Answers every comment listing with an empty page unless a more specific
/// mock matches first.
pub async fn mount_no_comments(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v3/repos/owner/repo/issues/\d+/comments$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Serves one page of comments on pull request `number`.
pub async fn mount_comment_page(
    server: &MockServer,
    number: u64,
    page: u32,
    bodies: &[&str],
    has_next: bool,
) {
    let comments_path = format!("/api/v3/repos/owner/repo/issues/{number}/comments");
    let items: Vec<_> = bodies
        .iter()
        .zip(1_u64..)
        .map(|(body, offset)| {
            json!({
                "id": u64::from(page) * 100 + offset,
                "body": body,
                "user": { "login": "reviewer", "type": "User" },
                "created_at": format!("2024-01-0{}T00:00:00Z", page + 1)
            })
        })
        .collect();
    let mut response = ResponseTemplate::new(200).set_body_json(items);
    if has_next {
        response = response.insert_header("Link", link_header(server, &comments_path, page + 1));
    }

    Mock::given(method("GET"))
        .and(path(comments_path))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Fails comment page `page` of pull request `number` with a server error.
pub async fn mount_failing_comment_page(server: &MockServer, number: u64, page: u32) {
    let comments_path = format!("/api/v3/repos/owner/repo/issues/{number}/comments");
    Mock::given(method("GET"))
        .and(path(comments_path))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Server Error" })),
        )
        .mount(server)
        .await;
}

/// Resolves the token to `login`.
pub async fn mount_user(server: &MockServer, login: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": login })))
        .mount(server)
        .await;
}

/// Wires a pipeline against `server` that delivers into the maildir at `root`.
///
/// # Errors
///
/// Returns the error raised while building the gateway or opening the
/// maildir.
pub fn pipeline_for(
    server: &MockServer,
    root: &Utf8Path,
    options: PipelineOptions,
) -> Result<ArchivePipeline, IntakeError> {
    let locator = RepositoryLocator::parse(&format!("{}/owner/repo", server.uri()))?;
    let token = PersonalAccessToken::new("ghp_integration")?;
    let gateway = Arc::new(OctocrabGateway::for_token(&token, &locator)?);
    let opened = Maildir::open_with_hostname(root, ARCHIVE_HOST);
    let store = opened.map_err(|error| IntakeError::Io {
        message: error.to_string(),
    })?;
    let recipient = Recipient::new(
        Arc::clone(&gateway) as Arc<dyn UserGateway>,
        Some(ARCHIVE_HOST.to_owned()),
    );
    let archiver = PullRequestArchiver::new(
        Arc::clone(&gateway) as Arc<dyn PullRequestGateway>,
        Arc::new(store),
        Arc::new(recipient),
        locator.clone(),
    );

    Ok(ArchivePipeline::new(gateway, Arc::new(archiver), locator, options))
}

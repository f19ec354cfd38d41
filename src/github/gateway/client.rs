//! Client construction for the Octocrab-backed gateway.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::IntakeError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};

use super::error_mapping::map_octocrab_error;

const USER_AGENT: &str = concat!("pullbox/", env!("CARGO_PKG_VERSION"));

/// Gateway backed by Octocrab for API calls and reqwest for raw patches.
///
/// The patch URL lives on the web host rather than the API host, so it is
/// fetched with a plain HTTP client carrying the same bearer token.
pub struct OctocrabGateway {
    pub(super) client: Octocrab,
    pub(super) http: reqwest::Client,
    pub(super) token: PersonalAccessToken,
}

impl OctocrabGateway {
    /// Creates a gateway from pre-built clients.
    #[must_use]
    pub const fn new(client: Octocrab, http: reqwest::Client, token: PersonalAccessToken) -> Self {
        Self {
            client,
            http,
            token,
        }
    }

    /// Builds authenticated clients for the repository's API host.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the base URI cannot be parsed or
    /// `IntakeError::Api` when either client fails to construct.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, IntakeError> {
        let client = build_octocrab_client(token, locator.api_base().as_str())?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| IntakeError::Api {
                message: format!("build HTTP client failed: {error}"),
            })?;
        Ok(Self::new(client, http, token.clone()))
    }
}

/// Builds an Octocrab client for the given token and API base URL.
fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, IntakeError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| IntakeError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

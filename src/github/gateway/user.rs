//! Lookup of the account behind the configured token.

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::models::{ApiAuthenticatedUser, AuthenticatedUser};

use super::UserGateway;
use super::client::OctocrabGateway;
use super::error_mapping::map_octocrab_error;

#[async_trait]
impl UserGateway for OctocrabGateway {
    async fn current_user(&self) -> Result<AuthenticatedUser, IntakeError> {
        self.client
            .get::<ApiAuthenticatedUser, _, _>("/user", None::<&()>)
            .await
            .map(AuthenticatedUser::from)
            .map_err(|error| map_octocrab_error("current user", &error))
    }
}

//! Recipient address shared by every archived message.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::github::gateway::UserGateway;

const FALLBACK_LOGIN: &str = "mbox";
const FALLBACK_HOST: &str = "localhost";

/// Builds `<login>@<host>` recipient addresses.
///
/// The authenticated user's login is looked up once and then shared by all
/// workers. A failed lookup is not cached, so a later pull request retries it.
pub struct Recipient {
    users: Arc<dyn UserGateway>,
    hostname: Option<String>,
    login: OnceCell<String>,
}

impl Recipient {
    /// Creates a recipient for the given local hostname.
    #[must_use]
    pub const fn new(users: Arc<dyn UserGateway>, hostname: Option<String>) -> Self {
        Self {
            users,
            hostname,
            login: OnceCell::const_new(),
        }
    }

    /// Creates a recipient using the machine's hostname.
    #[must_use]
    pub fn from_system(users: Arc<dyn UserGateway>) -> Self {
        Self::new(users, sysinfo::System::host_name())
    }

    /// Returns the recipient address for archived messages.
    ///
    /// Falls back to `mbox@` when the authenticated user cannot be resolved
    /// and to `localhost` when the hostname is unknown.
    pub async fn address(&self) -> String {
        let host = self
            .hostname
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_HOST);

        let login = self
            .login
            .get_or_try_init(|| async {
                self.users.current_user().await.map(|user| user.login)
            })
            .await;

        match login {
            Ok(login) => format!("{login}@{host}"),
            Err(error) => {
                tracing::warn!(error = %error, "could not resolve the authenticated user");
                format!("{FALLBACK_LOGIN}@{host}")
            }
        }
    }
}

impl std::fmt::Debug for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipient")
            .field("hostname", &self.hostname)
            .field("login", &self.login.get())
            .finish_non_exhaustive()
    }
}

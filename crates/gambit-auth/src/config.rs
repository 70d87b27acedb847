//! Identity provider configuration.

use std::time::Duration;

/// Where and how to reach the identity provider.
///
/// `#[derive(Clone)]` because the same config feeds both the HTTP client
/// and the controller, which uses `auth_url` as the issuer claim when it
/// builds game parties.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Realm URL of the provider. The token endpoint lives at
    /// `{auth_url}/protocol/openid-connect/token`.
    pub auth_url: String,

    /// OAuth2 client id sent with every grant.
    pub client_id: String,

    /// OAuth2 client secret sent with every grant.
    pub client_secret: String,

    /// Per-request timeout. `None` keeps the transport default, which
    /// waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            auth_url:
                "https://keycloak-platformdemo-chess.noumena.cloud/realms/noumena"
                    .to_string(),
            client_id: "noumena".to_string(),
            client_secret: "test".to_string(),
            timeout: None,
        }
    }
}

impl IdentityConfig {
    /// Sets the realm URL.
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Sets the client credentials.
    pub fn client(
        mut self,
        id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.client_id = id.into();
        self.client_secret = secret.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The OpenID Connect token endpoint for this realm.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/protocol/openid-connect/token",
            self.auth_url.trim_end_matches('/')
        )
    }
}

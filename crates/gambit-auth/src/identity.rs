//! Identity provider client: the two token-issuing exchanges.
//!
//! Gambit doesn't issue tokens itself. It talks to an OAuth2 provider's
//! token endpoint with exactly two grants:
//!
//! - `password` — username/password in, token pair out ([`acquire`])
//! - `refresh_token` — refresh token in, new token pair out ([`renew`])
//!
//! Neither exchange retries. A failed refresh means the session is dead,
//! and retrying it would only hammer the provider; the retry policy lives
//! in [`with_auth_retry`](crate::with_auth_retry) instead.
//!
//! [`acquire`]: IdentityProvider::acquire
//! [`renew`]: IdentityProvider::renew

use serde::Deserialize;

use crate::{AuthError, IdentityConfig, TokenPair};

/// Issues token pairs.
///
/// A trait so the controller can run against the real provider
/// ([`HttpIdentityClient`]) or an in-memory fake in tests.
///
/// # Example
///
/// ```rust
/// use gambit_auth::{AuthError, IdentityProvider, TokenPair};
///
/// /// Hands out fixed tokens to anyone. Tests only.
/// struct StaticIdentity;
///
/// impl IdentityProvider for StaticIdentity {
///     async fn acquire(
///         &self,
///         _username: &str,
///         _password: &str,
///     ) -> Result<TokenPair, AuthError> {
///         TokenPair::new("access", "refresh")
///     }
///
///     async fn renew(
///         &self,
///         _refresh_token: &str,
///     ) -> Result<TokenPair, AuthError> {
///         TokenPair::new("access-2", "refresh-2")
///     }
/// }
/// ```
pub trait IdentityProvider: Send + Sync + 'static {
    /// Exchanges credentials for a token pair (password grant).
    ///
    /// # Errors
    /// - [`AuthError::InvalidCredentials`] — transport failure or rejection
    /// - [`AuthError::MalformedTokenResponse`] — a token field is missing
    fn acquire(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<TokenPair, AuthError>> + Send;

    /// Exchanges a refresh token for a new pair (refresh grant).
    ///
    /// # Errors
    /// - [`AuthError::RefreshRejected`] — transport failure or rejection
    /// - [`AuthError::MalformedTokenResponse`] — a token field is missing
    fn renew(
        &self,
        refresh_token: &str,
    ) -> impl std::future::Future<Output = Result<TokenPair, AuthError>> + Send;
}

// ---------------------------------------------------------------------------
// HttpIdentityClient
// ---------------------------------------------------------------------------

/// [`IdentityProvider`] backed by an OpenID Connect token endpoint.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
}

/// The fields we need from the token endpoint's JSON body. Anything else
/// (`expires_in`, `scope`, ...) is ignored.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl HttpIdentityClient {
    /// Builds a client with its own connection pool.
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be constructed (TLS backend
    /// initialisation).
    pub fn new(config: IdentityConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    /// Builds a client that shares an existing connection pool.
    pub fn with_client(http: reqwest::Client, config: IdentityConfig) -> Self {
        Self { http, config }
    }

    /// Posts one grant to the token endpoint.
    ///
    /// `rejected` is the error for transport failures and non-success
    /// statuses; it differs per grant so logs and users can tell a bad
    /// password from a dead session.
    async fn exchange(
        &self,
        grant_type: &str,
        params: &[(&str, &str)],
        rejected: AuthError,
    ) -> Result<TokenPair, AuthError> {
        let mut form = vec![
            ("grant_type", grant_type),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        form.extend_from_slice(params);

        let response = self
            .http
            .post(self.config.token_endpoint())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(grant_type, error = %e, "token endpoint unreachable");
                rejected.clone()
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(grant_type, %status, "token endpoint rejected grant");
            return Err(rejected);
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            tracing::warn!(grant_type, error = %e, "token response is not valid JSON");
            AuthError::MalformedTokenResponse
        })?;

        match (body.access_token, body.refresh_token) {
            (Some(access), Some(refresh)) => TokenPair::new(access, refresh),
            _ => {
                tracing::warn!(grant_type, "token response lacks a token field");
                Err(AuthError::MalformedTokenResponse)
            }
        }
    }
}

impl IdentityProvider for HttpIdentityClient {
    async fn acquire(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, AuthError> {
        tracing::debug!(%username, "requesting password grant");
        self.exchange(
            "password",
            &[("username", username), ("password", password)],
            AuthError::InvalidCredentials,
        )
        .await
    }

    async fn renew(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        tracing::debug!("requesting refresh grant");
        self.exchange(
            "refresh_token",
            &[("refresh_token", refresh_token)],
            AuthError::RefreshRejected,
        )
        .await
    }
}

//! Refresh-and-retry for authenticated calls.
//!
//! Access tokens expire. When an authenticated call fails because of that,
//! the right reaction is to renew the token pair once and try the call
//! once more. [`with_auth_retry`] is that policy as an ordinary function:
//! every call site that needs it wraps its operation explicitly.
//!
//! ```text
//! op(access) ──ok──→ done
//!     │
//!    err ──(no expiry signal)──→ original error
//!     │
//!  (expiry signal)
//!     ↓
//! renew(refresh) ──err──→ clear session, SessionExpired
//!     │
//!    ok ──→ store pair ──→ op(new access) ──→ whatever it returns
//! ```
//!
//! At most one refresh and one retry per logical action, so a dead session
//! can never turn into a retry storm.

use std::future::Future;

use crate::{AuthError, IdentityProvider, Session};

/// Lets the retry policy ask an error whether it was caused by a stale or
/// rejected access token.
pub trait ExpirySignal {
    /// Returns `true` if refreshing the token pair might fix this failure.
    fn signals_token_expiry(&self) -> bool;
}

/// The fallback expiry heuristic: does the failure's description mention
/// "token" or "unauthorized" (in any case)?
///
/// Errors with structured status information should check that first and
/// use this only when nothing better is available.
pub fn mentions_token_expiry(description: &str) -> bool {
    let lower = description.to_lowercase();
    lower.contains("token") || lower.contains("unauthorized")
}

/// Runs `op` with the session's access token, recovering once from an
/// expired token.
///
/// `op` receives the access token to send and is invoked at most twice.
/// The second invocation only happens after a successful refresh, and its
/// result is returned as-is: a second failure is never retried.
///
/// # Errors
/// - [`AuthError::NotLoggedIn`] — the session holds no tokens; `op` is not
///   invoked
/// - [`AuthError::SessionExpired`] — the refresh failed; the session has
///   been cleared
/// - any error from `op` that carries no expiry signal, unchanged
pub async fn with_auth_retry<I, T, E, F, Fut>(
    session: &mut Session,
    identity: &I,
    mut op: F,
) -> Result<T, E>
where
    I: IdentityProvider,
    E: ExpirySignal + From<AuthError> + std::fmt::Display,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let access_token = session
        .tokens()
        .ok_or(AuthError::NotLoggedIn)?
        .access_token()
        .to_string();

    let err = match op(access_token).await {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    if !err.signals_token_expiry() {
        return Err(err);
    }

    let Some(refresh_token) =
        session.tokens().map(|t| t.refresh_token().to_string())
    else {
        return Err(err);
    };

    tracing::info!(error = %err, "access token rejected, refreshing");

    match identity.renew(&refresh_token).await {
        Ok(tokens) => {
            let access_token = tokens.access_token().to_string();
            session.set_tokens(tokens);
            tracing::debug!("token pair renewed, retrying once");
            op(access_token).await
        }
        Err(refresh_err) => {
            tracing::warn!(
                error = %refresh_err,
                "token refresh failed, clearing session"
            );
            session.clear();
            Err(AuthError::SessionExpired.into())
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

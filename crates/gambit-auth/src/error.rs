//! Error types for the auth layer.

/// Errors that can occur while acquiring, refreshing or using tokens.
///
/// The messages are deliberately short and fixed. The underlying cause
/// (HTTP status, provider response) is logged, never carried to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The password grant failed: wrong credentials, or the provider
    /// could not be reached.
    #[error("invalid credentials or provider unreachable")]
    InvalidCredentials,

    /// The refresh grant failed. The session can no longer be trusted.
    #[error("token refresh rejected or provider unreachable")]
    RefreshRejected,

    /// The provider answered, but without both `access_token` and
    /// `refresh_token`.
    #[error("malformed token response")]
    MalformedTokenResponse,

    /// An authenticated call was attempted on a session with no tokens.
    #[error("please log in first")]
    NotLoggedIn,

    /// Recovery from an expired token failed and the session was cleared.
    /// Only a fresh login can continue.
    #[error("session expired, please log in again")]
    SessionExpired,
}

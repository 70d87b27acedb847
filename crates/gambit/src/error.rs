//! Unified error type for Gambit.

use gambit_auth::{AuthError, ExpirySignal, mentions_token_expiry};
use gambit_engine::EngineError;
use gambit_notation::FormatError;

use crate::MoveError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// Malformed square or color notation. Never reached the network.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Login, refresh or session failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A classified move rejection.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Any other engine failure.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The HTTP clients could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl GambitError {
    /// A short message that is safe to show to the user.
    ///
    /// Local and auth errors already have user-grade messages. Engine and
    /// transport errors are reduced to a category so provider internals
    /// never reach the screen.
    pub fn user_message(&self) -> String {
        match self {
            Self::Format(e) => e.to_string(),
            Self::Auth(e) => e.to_string(),
            Self::Move(e) => e.to_string(),
            Self::Engine(EngineError::Unauthorized(_)) => {
                "Not authorized for this game.".to_string()
            }
            Self::Engine(EngineError::Rejected { .. }) => {
                "The chess engine rejected the request.".to_string()
            }
            Self::Engine(EngineError::InvalidGameId(_)) => {
                "No such game.".to_string()
            }
            Self::Engine(EngineError::InvalidUrl(_)) => {
                "The chess engine address is misconfigured.".to_string()
            }
            Self::Engine(EngineError::Request(_)) => {
                "The chess engine is unreachable. Please try again.".to_string()
            }
            Self::Engine(EngineError::Decode(_)) => {
                "Unexpected response from the chess engine.".to_string()
            }
            Self::Client(_) => "Client setup failed.".to_string(),
        }
    }

    /// `true` when the session can no longer be used and the user has to
    /// log in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Auth(AuthError::SessionExpired | AuthError::NotLoggedIn)
        )
    }
}

/// A 401 from the engine is the authoritative expiry signal. Without one,
/// fall back to looking for "token"/"unauthorized" in the description or
/// anywhere in the response body.
impl ExpirySignal for GambitError {
    fn signals_token_expiry(&self) -> bool {
        match self {
            Self::Engine(e) => {
                e.is_unauthorized()
                    || mentions_token_expiry(&e.to_string())
                    || e.body().is_some_and(mentions_token_expiry)
            }
            _ => false,
        }
    }
}

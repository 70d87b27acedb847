//! Session types: the client's record of who is logged in.
//!
//! A "session" here is the state of one user interaction context. It tracks:
//! - WHO is logged in (`username`)
//! - WHAT tokens authorize their calls (`TokenPair`)
//! - WHICH game they are looking at (`active_game_id`)
//!
//! The session is a plain value. Callers own it, pass it by `&mut` into
//! every controller call and drop or [`clear`](Session::clear) it on logout.
//! Sharing one session between concurrent requests is unsupported:
//! interleaved refreshes would each invalidate the other's tokens.

use std::fmt;

use crate::AuthError;

// ---------------------------------------------------------------------------
// TokenPair
// ---------------------------------------------------------------------------

/// An access/refresh token pair issued by the identity provider.
///
/// Both tokens are always present and non-empty. The fields are private
/// and [`TokenPair::new`] is the only constructor, so a half-populated
/// pair cannot exist.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    access_token: String,
    refresh_token: String,
}

impl TokenPair {
    /// Builds a pair, rejecting empty tokens.
    ///
    /// # Errors
    /// Returns [`AuthError::MalformedTokenResponse`] if either token is
    /// empty.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        if access_token.is_empty() || refresh_token.is_empty() {
            return Err(AuthError::MalformedTokenResponse);
        }
        Ok(Self {
            access_token,
            refresh_token,
        })
    }

    /// The bearer token for engine calls.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The token used to obtain a new pair.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

/// Tokens are credentials; keep them out of logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's client-side session.
///
/// ```text
///   empty ──(login)──→ authenticated ──(logout / refresh failure)──→ empty
///                         ↑      │
///          (restore_session)    (user detached, tokens kept)
///                         │      ↓
///                         restorable
/// ```
///
/// `Default` is the empty session, created at startup.
#[derive(Debug, Clone, Default)]
pub struct Session {
    username: Option<String>,
    remembered_username: Option<String>,
    tokens: Option<TokenPair>,
    active_game_id: Option<String>,
}

impl Session {
    /// Creates an empty, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that holds tokens from an earlier interaction
    /// but has no active user yet.
    ///
    /// This is the state `restore_session` recovers from: the refresh token
    /// is renewed and `remembered_username` becomes the active user again.
    pub fn restorable(
        remembered_username: impl Into<String>,
        tokens: TokenPair,
    ) -> Self {
        Self {
            username: None,
            remembered_username: Some(remembered_username.into()),
            tokens: Some(tokens),
            active_game_id: None,
        }
    }

    // -- Token store ------------------------------------------------------

    /// Stores a new token pair, replacing any previous one.
    pub fn set_tokens(&mut self, tokens: TokenPair) {
        self.tokens = Some(tokens);
    }

    /// The current token pair, if any.
    pub fn tokens(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    /// Drops the token pair but keeps the rest of the session.
    pub fn clear_tokens(&mut self) {
        self.tokens = None;
    }

    // -- User -------------------------------------------------------------

    /// The logged-in user, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The username recorded at the last login, used for restoration.
    pub fn remembered_username(&self) -> Option<&str> {
        self.remembered_username.as_deref()
    }

    /// Marks `username` as the active user and remembers it for restores.
    pub fn set_user(&mut self, username: impl Into<String>) {
        let username = username.into();
        self.remembered_username = Some(username.clone());
        self.username = Some(username);
    }

    /// Makes the remembered username active again.
    ///
    /// Returns `false` (and changes nothing) if no username was remembered.
    pub fn reactivate_remembered_user(&mut self) -> bool {
        match &self.remembered_username {
            Some(name) => {
                self.username = Some(name.clone());
                true
            }
            None => false,
        }
    }

    /// `true` when tokens are held but no user is active.
    pub fn needs_restore(&self) -> bool {
        self.tokens.is_some() && self.username.is_none()
    }

    /// `true` when both a user and a token pair are present.
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some() && self.tokens.is_some()
    }

    // -- Active game ------------------------------------------------------

    /// The game the user is currently viewing.
    pub fn active_game_id(&self) -> Option<&str> {
        self.active_game_id.as_deref()
    }

    /// Sets the game the user is viewing.
    pub fn set_active_game(&mut self, game_id: impl Into<String>) {
        self.active_game_id = Some(game_id.into());
    }

    /// Returns to the games list.
    pub fn clear_active_game(&mut self) {
        self.active_game_id = None;
    }

    /// Wipes every field. Used on logout and on unrecoverable auth failure.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

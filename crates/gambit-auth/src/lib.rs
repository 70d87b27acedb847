//! Authentication token lifecycle for Gambit.
//!
//! This crate handles everything between "the user typed a password" and
//! "this request carries a valid bearer token":
//!
//! 1. **Acquisition** — exchanging credentials for a token pair
//!    ([`IdentityProvider::acquire`])
//! 2. **Storage** — holding the pair inside the caller's [`Session`]
//! 3. **Expiry recovery** — refreshing once and retrying once when a call
//!    fails because the access token went stale ([`with_auth_retry`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Controller (above)  ← threads a Session through every call
//!     ↕
//! Auth Layer (this crate)  ← tokens, identity provider, retry policy
//!     ↕
//! Identity provider (remote)  ← password and refresh_token grants
//! ```

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod identity;
mod retry;
mod session;

pub use config::IdentityConfig;
pub use error::AuthError;
pub use identity::{HttpIdentityClient, IdentityProvider};
pub use retry::{ExpirySignal, mentions_token_expiry, with_auth_retry};
pub use session::{Session, TokenPair};

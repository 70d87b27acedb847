//! # Gambit
//!
//! Client-side session and turn controller for a remote chess engine
//! guarded by an OAuth2 identity provider.
//!
//! The caller owns a [`Session`](prelude::Session) and passes it into every
//! [`GameController`] call. The controller logs in, keeps tokens fresh
//! (one refresh, one retry, never more), translates `"e2"`-style squares
//! into engine coordinates and turns engine rejections into one of three
//! user-facing [`MoveError`]s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gambit::prelude::*;
//!
//! # async fn run() -> Result<(), GambitError> {
//! let controller = GameController::connect(GambitConfig::default())?;
//! let mut session = Session::new();
//!
//! controller.login(&mut session, "alice", "secret").await?;
//! let game = controller
//!     .create_game(&mut session, "alice", "bob", "white")
//!     .await?;
//! controller
//!     .submit_move(&mut session, &game.id, "e2", "e4", Color::White)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod controller;
mod error;
mod moves;
pub mod telemetry;

pub use config::GambitConfig;
pub use controller::{GameController, GameView};
pub use error::GambitError;
pub use moves::MoveError;

/// Everything needed to drive a session, in one import.
pub mod prelude {
    pub use crate::{
        GambitConfig, GambitError, GameController, GameView, MoveError,
    };
    pub use gambit_auth::{
        AuthError, HttpIdentityClient, IdentityConfig, IdentityProvider,
        Session, TokenPair,
    };
    pub use gambit_engine::{
        EngineApi, EngineConfig, EngineError, GameDetail, GameSummary,
        HttpEngineClient, Parties, Party, Piece,
    };
    pub use gambit_notation::{
        Color, FormatError, Move, PieceKind, Position, parse_square,
        to_square,
    };
}

//! Chess engine access for Gambit.
//!
//! Provides the [`EngineApi`] trait, which abstracts over the remote
//! engine's REST operations, and the wire models those operations exchange.
//! The engine is the single source of truth for game state: nothing
//! returned here is cached, and no chess rule is checked locally.
//!
//! # Feature Flags
//!
//! - `http` (default) — [`HttpEngineClient`] via `reqwest`

#![allow(async_fn_in_trait)]

mod config;
mod error;
#[cfg(feature = "http")]
mod http;
mod models;

pub use config::EngineConfig;
pub use error::EngineError;
#[cfg(feature = "http")]
pub use http::HttpEngineClient;
pub use models::{Claims, GameDetail, GameSummary, Parties, Party, Piece};

use gambit_notation::{Color, Move};

/// The engine's REST surface.
///
/// Every operation takes the bearer token to authenticate with; the caller
/// (normally the retry wrapper) decides which token that is.
pub trait EngineApi: Send + Sync + 'static {
    /// Creates a game between two parties and returns it with its new id.
    async fn create_game(
        &self,
        access_token: &str,
        parties: &Parties,
    ) -> Result<GameDetail, EngineError>;

    /// Lists the games visible to the caller.
    async fn list_games(
        &self,
        access_token: &str,
    ) -> Result<Vec<GameSummary>, EngineError>;

    /// Fetches one game.
    async fn get_game(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<GameDetail, EngineError>;

    /// Fetches the pieces currently on the board.
    async fn get_board(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<Vec<Piece>, EngineError>;

    /// Fetches whose turn it is.
    async fn get_current_turn(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<Color, EngineError>;

    /// Submits a move for white.
    async fn make_white_move(
        &self,
        access_token: &str,
        game_id: &str,
        mv: Move,
    ) -> Result<(), EngineError>;

    /// Submits a move for black.
    async fn make_black_move(
        &self,
        access_token: &str,
        game_id: &str,
        mv: Move,
    ) -> Result<(), EngineError>;
}

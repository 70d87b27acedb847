//! Classification of rejected moves.

use gambit_engine::EngineError;

/// Why a move submission failed, in terms a player can act on.
///
/// Only these three categories ever reach the user; the engine's raw
/// error text stays in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The engine judged the move illegal.
    #[error("Invalid move! Please check the rules of chess.")]
    InvalidMove,

    /// The move was submitted for a side that is not to move, or by a
    /// player who does not own the side to move.
    #[error("Not your turn!")]
    NotYourTurn,

    /// Anything else.
    #[error("Move failed. Please try again.")]
    Unknown,
}

impl MoveError {
    /// Classifies an engine's rejection text.
    ///
    /// Matching is by substring, ignoring case. "Invalid move" is checked
    /// first.
    pub fn classify(reason: &str) -> Self {
        let lower = reason.to_lowercase();
        if lower.contains("invalid move") {
            Self::InvalidMove
        } else if lower.contains("not your turn") {
            Self::NotYourTurn
        } else {
            Self::Unknown
        }
    }

    /// Classifies an engine failure.
    ///
    /// The engine's structured rejection message is tried first, then the
    /// full response body, then the error description. The first category
    /// other than [`Unknown`](Self::Unknown) wins.
    pub fn from_engine(err: &EngineError) -> Self {
        [err.reason(), err.body()]
            .into_iter()
            .flatten()
            .map(Self::classify)
            .find(|category| *category != Self::Unknown)
            .unwrap_or_else(|| Self::classify(&err.to_string()))
    }
}

//! Error types for the notation layer.

/// Malformed square or color notation.
///
/// Always raised locally, before any request is built, so a `FormatError`
/// never costs a network round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The square is not exactly two characters long.
    #[error("square must be two characters like 'e2', got {0:?}")]
    WrongLength(String),

    /// The first character is not a file letter `a`-`h`.
    #[error("file must be between 'a' and 'h', got {0:?}")]
    InvalidFile(char),

    /// The second character is not a rank digit `1`-`8`.
    #[error("rank must be between 1 and 8, got {0:?}")]
    InvalidRank(char),

    /// A zero-based coordinate fell outside `0..=7`.
    #[error("coordinate ({file}, {rank}) is off the board")]
    OffBoard { file: u8, rank: u8 },

    /// The text does not name a side.
    #[error("unknown color {0:?}, expected WHITE or BLACK")]
    UnknownColor(String),
}

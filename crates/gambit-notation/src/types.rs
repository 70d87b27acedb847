//! Coordinate and piece types shared with the chess engine.
//!
//! Every type here has a fixed wire form because the engine decodes it:
//! positions are `{"x": file, "y": rank}`, colors and piece kinds are
//! upper-case strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FormatError;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A square on the board in engine coordinates.
///
/// `file` 0 is the a-file, `rank` 0 is the first rank. Both are always in
/// `0..=7`: the fields are private and every constructor (including
/// deserialization) goes through [`Position::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    /// Creates a position, rejecting coordinates off the 8x8 board.
    pub fn new(file: u8, rank: u8) -> Result<Self, FormatError> {
        if file > 7 || rank > 7 {
            return Err(FormatError::OffBoard { file, rank });
        }
        Ok(Self { file, rank })
    }

    /// Zero-based file (0 = 'a').
    pub fn file(&self) -> u8 {
        self.file
    }

    /// Zero-based rank (0 = first rank).
    pub fn rank(&self) -> u8 {
        self.rank
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::to_square(*self))
    }
}

impl FromStr for Position {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_square(s)
    }
}

/// The engine's field names for a position.
#[derive(Serialize, Deserialize)]
struct RawPosition {
    x: u8,
    y: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = FormatError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.x, raw.y)
    }
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        RawPosition {
            x: pos.file,
            y: pos.rank,
        }
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A move from one square to another.
///
/// No legality is implied: the engine is the only judge of chess rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    /// Builds a move from two squares in algebraic notation.
    ///
    /// # Errors
    /// Returns [`FormatError`] if either square is malformed.
    pub fn parse(from: &str, to: &str) -> Result<Self, FormatError> {
        Ok(Self {
            from: crate::parse_square(from)?,
            to: crate::parse_square(to)?,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One side of the board.
///
/// Serialized as `"WHITE"` / `"BLACK"`, which is also what the engine
/// returns for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The wire name of this color.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "WHITE",
            Self::Black => "BLACK",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"white"`, `"White"` and `"WHITE"` all parse.
impl FromStr for Color {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("WHITE") {
            Ok(Self::White)
        } else if trimmed.eq_ignore_ascii_case("BLACK") {
            Ok(Self::Black)
        } else {
            Err(FormatError::UnknownColor(s.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The type of a chess piece, as reported by the engine's board view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

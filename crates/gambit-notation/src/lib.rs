//! Board coordinates and square notation for Gambit.
//!
//! Humans write squares as `"e2"`; the chess engine speaks zero-based
//! `(file, rank)` pairs. This crate owns that translation and the small
//! value types both sides share:
//!
//! - **Types** ([`Position`], [`Move`], [`Color`], [`PieceKind`]) — the
//!   coordinate and piece vocabulary that travels on the wire.
//! - **Translator** ([`parse_square`], [`to_square`]) — algebraic notation
//!   to coordinates and back.
//! - **Errors** ([`FormatError`]) — malformed notation. These are purely
//!   local; nothing in this crate touches the network.
//!
//! ```text
//! "e2" ──parse_square──→ Position { file: 4, rank: 1 } ──to_square──→ "e2"
//! ```

mod error;
mod square;
mod types;

pub use error::FormatError;
pub use square::{parse_square, to_square};
pub use types::{Color, Move, PieceKind, Position};

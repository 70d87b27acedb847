//! Wire models exchanged with the chess engine.
//!
//! The engine exposes games as protocol objects whose framework fields
//! carry an `@` prefix (`@id`, `@state`, `@parties`). We serialize with
//! those names and also accept the plain ones when decoding.

use std::collections::BTreeMap;

use gambit_notation::{Color, Move, PieceKind, Position};
use serde::{Deserialize, Serialize};

/// Claim name → claim values, e.g. `"preferred_username" → ["alice"]`.
///
/// `BTreeMap` keeps the serialized order stable, which makes request
/// bodies predictable in logs and tests.
pub type Claims = BTreeMap<String, Vec<String>>;

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// One side of a game, identified by identity claims rather than by a
/// display name.
///
/// The engine authorizes each move by matching the caller's token claims
/// against the party, so the party must name the user the way the identity
/// provider does: `preferred_username` plus the issuer `iss`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub entity: Claims,
    #[serde(default)]
    pub access: Claims,
}

impl Party {
    /// The party for `username` as issued by `issuer`.
    pub fn for_user(username: &str, issuer: &str) -> Self {
        let mut entity = Claims::new();
        entity.insert(
            "preferred_username".to_string(),
            vec![username.to_string()],
        );
        entity.insert("iss".to_string(), vec![issuer.to_string()]);
        Self {
            entity,
            access: Claims::new(),
        }
    }

    /// All values of one identity claim.
    pub fn claim(&self, name: &str) -> Option<&[String]> {
        self.entity.get(name).map(Vec::as_slice)
    }

    /// The first `preferred_username` value, if any.
    pub fn preferred_username(&self) -> Option<&str> {
        self.claim("preferred_username")
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Both sides of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parties {
    pub white: Party,
    pub black: Party,
}

impl Parties {
    /// The party playing `color`.
    pub fn get(&self, color: Color) -> &Party {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// The color `username` plays, judged by `preferred_username`.
    pub fn color_of(&self, username: &str) -> Option<Color> {
        if self.white.preferred_username() == Some(username) {
            Some(Color::White)
        } else if self.black.preferred_username() == Some(username) {
            Some(Color::Black)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

/// One entry of the games list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
    #[serde(rename = "@state", alias = "state", default)]
    pub state: String,
}

/// A full game as returned by create and get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetail {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
    #[serde(rename = "@state", alias = "state", default)]
    pub state: String,
    #[serde(rename = "@parties", alias = "parties")]
    pub parties: Parties,
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
    pub position: Position,
}

// ---------------------------------------------------------------------------
// Request and envelope bodies
// ---------------------------------------------------------------------------

/// Body of the create-game call.
#[derive(Serialize)]
pub(crate) struct CreateGame<'a> {
    #[serde(rename = "@parties")]
    pub(crate) parties: &'a Parties,
}

/// Body of the make-move calls.
#[derive(Serialize)]
pub(crate) struct MoveCommand {
    #[serde(rename = "move")]
    pub(crate) mv: Move,
}

/// The list endpoint wraps its results in a page object.
#[derive(Deserialize)]
pub(crate) struct GamePage {
    #[serde(default)]
    pub(crate) items: Vec<GameSummary>,
}

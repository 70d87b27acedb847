//! `GameController`: the operations a chess client performs against the
//! identity provider and the engine.
//!
//! The controller holds no per-user state. Every call takes the caller's
//! [`Session`], and every engine call goes through
//! [`with_auth_retry`] so an expired access token is renewed once,
//! transparently.

use gambit_auth::{
    AuthError, HttpIdentityClient, IdentityProvider, Session, with_auth_retry,
};
use gambit_engine::{
    EngineApi, GameDetail, GameSummary, HttpEngineClient, Parties, Party, Piece,
};
use gambit_notation::{Color, Move};
use tracing::{debug, info, warn};

use crate::{GambitConfig, GambitError, MoveError};

/// A game as seen by one player: the engine's game record, the board, the
/// side to move, and which side (if any) the viewer plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub game: GameDetail,
    pub board: Vec<Piece>,
    pub turn: Color,
    /// `None` when the viewer is not a party to the game.
    pub my_color: Option<Color>,
}

impl GameView {
    /// `true` when the side to move belongs to the viewer.
    pub fn is_my_turn(&self) -> bool {
        self.my_color == Some(self.turn)
    }

    /// The party across the board from the viewer. `None` for spectators.
    pub fn opponent(&self) -> Option<&Party> {
        self.my_color
            .map(|color| self.game.parties.get(color.opponent()))
    }

    /// The piece on `file`/`rank`, if any.
    pub fn piece_at(&self, file: u8, rank: u8) -> Option<&Piece> {
        self.board.iter().find(|piece| {
            piece.position.file() == file && piece.position.rank() == rank
        })
    }
}

/// Drives one client's interaction with the chess service.
///
/// Generic over the identity provider and the engine so tests can swap in
/// in-memory fakes; [`connect`](GameController::connect) builds the HTTP
/// versions.
pub struct GameController<I, E> {
    identity: I,
    engine: E,
    issuer: String,
}

impl GameController<HttpIdentityClient, HttpEngineClient> {
    /// Builds HTTP clients for the configured identity provider and engine.
    ///
    /// The identity provider's realm URL doubles as the issuer written into
    /// new games' parties.
    pub fn connect(config: GambitConfig) -> Result<Self, GambitError> {
        let issuer = config.identity.auth_url.clone();
        let identity =
            HttpIdentityClient::new(config.identity).map_err(GambitError::Client)?;
        let engine =
            HttpEngineClient::new(config.engine).map_err(GambitError::Client)?;
        Ok(Self::new(identity, engine, issuer))
    }
}

impl<I, E> GameController<I, E>
where
    I: IdentityProvider,
    E: EngineApi,
{
    /// Creates a controller from its two collaborators.
    pub fn new(identity: I, engine: E, issuer: impl Into<String>) -> Self {
        Self {
            identity,
            engine,
            issuer: issuer.into(),
        }
    }

    /// The issuer recorded in the parties of games this controller creates.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The identity provider.
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    // -- Session lifecycle ------------------------------------------------

    /// Exchanges credentials for a token pair.
    ///
    /// On success the session holds the tokens and `username` becomes the
    /// active (and remembered) user. On failure the session is untouched.
    pub async fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<(), GambitError> {
        match self.identity.acquire(username, password).await {
            Ok(tokens) => {
                session.set_tokens(tokens);
                session.set_user(username);
                info!(username, "logged in");
                Ok(())
            }
            Err(e) => {
                warn!(username, error = %e, "login failed");
                Err(e.into())
            }
        }
    }

    /// Recovers a session that holds tokens but no active user.
    ///
    /// Returns `Ok(true)` if the session was restored and `Ok(false)` if
    /// there was nothing to restore. A session with tokens but no
    /// remembered username cannot be restored and is cleared without a
    /// network call.
    ///
    /// # Errors
    /// - [`AuthError::SessionExpired`] — the refresh was rejected; the
    ///   session has been cleared
    pub async fn restore_session(
        &self,
        session: &mut Session,
    ) -> Result<bool, GambitError> {
        if !session.needs_restore() {
            return Ok(false);
        }
        if session.remembered_username().is_none() {
            warn!("tokens present without a remembered user, clearing session");
            session.clear();
            return Ok(false);
        }
        let Some(refresh_token) =
            session.tokens().map(|t| t.refresh_token().to_string())
        else {
            return Ok(false);
        };

        match self.identity.renew(&refresh_token).await {
            Ok(tokens) => {
                session.set_tokens(tokens);
                session.reactivate_remembered_user();
                info!(username = session.username(), "session restored");
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "session restore failed, clearing session");
                session.clear();
                Err(AuthError::SessionExpired.into())
            }
        }
    }

    /// Ends the session locally. The identity provider is not contacted.
    pub fn logout(&self, session: &mut Session) {
        if let Some(username) = session.username() {
            info!(username, "logged out");
        }
        session.clear();
    }

    // -- Reads ------------------------------------------------------------

    /// Lists the games visible to the logged-in user.
    pub async fn list_games(
        &self,
        session: &mut Session,
    ) -> Result<Vec<GameSummary>, GambitError> {
        let engine = &self.engine;
        with_auth_retry(session, &self.identity, move |token| async move {
            engine.list_games(&token).await.map_err(GambitError::from)
        })
        .await
    }

    /// Fetches one game.
    pub async fn get_game(
        &self,
        session: &mut Session,
        game_id: &str,
    ) -> Result<GameDetail, GambitError> {
        let engine = &self.engine;
        with_auth_retry(session, &self.identity, move |token| async move {
            engine.get_game(&token, game_id).await.map_err(GambitError::from)
        })
        .await
    }

    /// Fetches the pieces on the board of one game.
    pub async fn get_board(
        &self,
        session: &mut Session,
        game_id: &str,
    ) -> Result<Vec<Piece>, GambitError> {
        let engine = &self.engine;
        with_auth_retry(session, &self.identity, move |token| async move {
            engine.get_board(&token, game_id).await.map_err(GambitError::from)
        })
        .await
    }

    /// Fetches whose turn it is in one game.
    pub async fn get_turn(
        &self,
        session: &mut Session,
        game_id: &str,
    ) -> Result<Color, GambitError> {
        let engine = &self.engine;
        with_auth_retry(session, &self.identity, move |token| async move {
            engine
                .get_current_turn(&token, game_id)
                .await
                .map_err(GambitError::from)
        })
        .await
    }

    // -- Writes -----------------------------------------------------------

    /// Creates a game between the requesting user and an opponent.
    ///
    /// `requested_color` is the requester's side; anything other than
    /// `"WHITE"` (compared ignoring case) means black.
    pub async fn create_game(
        &self,
        session: &mut Session,
        requesting_username: &str,
        opponent_username: &str,
        requested_color: &str,
    ) -> Result<GameDetail, GambitError> {
        let requester_is_white =
            requested_color.trim().eq_ignore_ascii_case(Color::White.as_str());
        let (white, black) = if requester_is_white {
            (requesting_username, opponent_username)
        } else {
            (opponent_username, requesting_username)
        };
        let parties = Parties {
            white: Party::for_user(white, &self.issuer),
            black: Party::for_user(black, &self.issuer),
        };

        let engine = &self.engine;
        let parties = &parties;
        let game = with_auth_retry(session, &self.identity, move |token| async move {
            engine
                .create_game(&token, parties)
                .await
                .map_err(GambitError::from)
        })
        .await?;

        info!(game_id = %game.id, white, black, "game created");
        Ok(game)
    }

    /// Submits a move for the side `current_turn`.
    ///
    /// Squares are validated before anything is sent. Engine rejections
    /// come back as [`GambitError::Move`] with one of the three
    /// [`MoveError`] categories; auth failures pass through unchanged.
    pub async fn submit_move(
        &self,
        session: &mut Session,
        game_id: &str,
        from: &str,
        to: &str,
        current_turn: Color,
    ) -> Result<(), GambitError> {
        let mv = Move::parse(from, to)?;

        let engine = &self.engine;
        let result = with_auth_retry(session, &self.identity, move |token| async move {
            match current_turn {
                Color::White => engine.make_white_move(&token, game_id, mv).await,
                Color::Black => engine.make_black_move(&token, game_id, mv).await,
            }
            .map_err(GambitError::from)
        })
        .await;

        match result {
            Ok(()) => {
                info!(game_id, %mv, side = %current_turn, "move accepted");
                Ok(())
            }
            Err(GambitError::Engine(e)) => {
                let category = MoveError::from_engine(&e);
                warn!(game_id, %mv, error = %e, ?category, "move rejected");
                Err(category.into())
            }
            Err(other) => Err(other),
        }
    }

    // -- Game view --------------------------------------------------------

    /// Opens a game for the logged-in user: fetches the game, board and
    /// side to move, and records it as the session's active game.
    pub async fn open_game(
        &self,
        session: &mut Session,
        game_id: &str,
    ) -> Result<GameView, GambitError> {
        let game = self.get_game(session, game_id).await?;
        let board = self.get_board(session, game_id).await?;
        let turn = self.get_turn(session, game_id).await?;

        let my_color = session
            .username()
            .and_then(|username| game.parties.color_of(username));
        session.set_active_game(game_id);
        debug!(game_id, ?my_color, %turn, "game opened");

        Ok(GameView {
            game,
            board,
            turn,
            my_color,
        })
    }

    /// Returns from a game to the games list.
    pub fn close_game(&self, session: &mut Session) {
        session.clear_active_game();
    }

    /// Submits a move in an opened game on behalf of the viewer.
    ///
    /// Refuses locally with [`MoveError::NotYourTurn`] when the side to move
    /// is not the viewer's, so the engine is never asked.
    pub async fn play_move(
        &self,
        session: &mut Session,
        view: &GameView,
        from: &str,
        to: &str,
    ) -> Result<(), GambitError> {
        if !view.is_my_turn() {
            debug!(game_id = %view.game.id, "move refused locally, not the viewer's turn");
            return Err(MoveError::NotYourTurn.into());
        }
        self.submit_move(session, &view.game.id, from, to, view.turn)
            .await
    }
}

//! Behavioural tests for `GameController` with in-memory collaborators.
//!
//! `FakeIdentity` hands out numbered token pairs; `FakeEngine` accepts a
//! single access token and records every call it receives, so each test can
//! assert exactly what reached the network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use gambit::prelude::*;

const ISSUER: &str = "https://idp.test/realms/chess";
const GAME_ID: &str = "game-1";

// =========================================================================
// Fakes
// =========================================================================

/// Accepts `alice`/`bob` with password `pw`. Every renew returns
/// `access-2`/`refresh-2` unless `renew_ok` is false.
struct FakeIdentity {
    renew_ok: bool,
    acquire_calls: AtomicUsize,
    renewed_with: Mutex<Vec<String>>,
}

impl FakeIdentity {
    fn new() -> Self {
        Self {
            renew_ok: true,
            acquire_calls: AtomicUsize::new(0),
            renewed_with: Mutex::new(Vec::new()),
        }
    }

    fn refusing_renewal() -> Self {
        Self {
            renew_ok: false,
            ..Self::new()
        }
    }

    fn renewed_with(&self) -> Vec<String> {
        self.renewed_with.lock().unwrap().clone()
    }
}

impl IdentityProvider for FakeIdentity {
    async fn acquire(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, AuthError> {
        self.acquire_calls.fetch_add(1, Ordering::SeqCst);
        match (username, password) {
            ("alice" | "bob", "pw") => TokenPair::new("access-1", "refresh-1"),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn renew(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.renewed_with
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        if self.renew_ok {
            TokenPair::new("access-2", "refresh-2")
        } else {
            Err(AuthError::RefreshRejected)
        }
    }
}

/// Chess engine that only honours `valid_token` and answers 401 with
/// "token expired" otherwise. Moves fail with `move_rejection` when set.
struct FakeEngine {
    valid_token: String,
    turn: Color,
    move_rejection: Option<(u16, String)>,
    list_failure: Option<(u16, String)>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<Parties>>,
}

impl FakeEngine {
    fn accepting(token: &str) -> Self {
        Self {
            valid_token: token.to_string(),
            turn: Color::White,
            move_rejection: None,
            list_failure: None,
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    fn with_turn(mut self, turn: Color) -> Self {
        self.turn = turn;
        self
    }

    fn rejecting_moves(mut self, status: u16, message: &str) -> Self {
        self.move_rejection = Some((status, message.to_string()));
        self
    }

    fn failing_lists(mut self, status: u16, message: &str) -> Self {
        self.list_failure = Some((status, message.to_string()));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn created(&self) -> Vec<Parties> {
        self.created.lock().unwrap().clone()
    }

    /// Records `call` and checks the bearer token.
    fn authorize(&self, call: String, token: &str) -> Result<(), EngineError> {
        self.calls.lock().unwrap().push(format!("{call} [{token}]"));
        if token == self.valid_token {
            Ok(())
        } else {
            Err(EngineError::Unauthorized("token expired".into()))
        }
    }

    fn game(&self) -> GameDetail {
        GameDetail {
            id: GAME_ID.into(),
            state: "inProgress".into(),
            parties: Parties {
                white: Party::for_user("alice", ISSUER),
                black: Party::for_user("bob", ISSUER),
            },
        }
    }

    fn submit(&self, call: String, token: &str) -> Result<(), EngineError> {
        self.authorize(call, token)?;
        match &self.move_rejection {
            Some((status, body)) => Err(EngineError::rejected(*status, body.clone())),
            None => Ok(()),
        }
    }
}

impl EngineApi for FakeEngine {
    async fn create_game(
        &self,
        access_token: &str,
        parties: &Parties,
    ) -> Result<GameDetail, EngineError> {
        self.authorize("create".into(), access_token)?;
        self.created.lock().unwrap().push(parties.clone());
        Ok(GameDetail {
            id: "game-new".into(),
            state: "inProgress".into(),
            parties: parties.clone(),
        })
    }

    async fn list_games(
        &self,
        access_token: &str,
    ) -> Result<Vec<GameSummary>, EngineError> {
        self.authorize("list".into(), access_token)?;
        if let Some((status, message)) = &self.list_failure {
            return Err(EngineError::rejected(*status, message.clone()));
        }
        Ok(vec![GameSummary {
            id: GAME_ID.into(),
            state: "inProgress".into(),
        }])
    }

    async fn get_game(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<GameDetail, EngineError> {
        self.authorize(format!("game {game_id}"), access_token)?;
        Ok(self.game())
    }

    async fn get_board(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<Vec<Piece>, EngineError> {
        self.authorize(format!("board {game_id}"), access_token)?;
        Ok(vec![Piece {
            kind: PieceKind::King,
            color: Color::White,
            position: parse_square("e1").unwrap(),
        }])
    }

    async fn get_current_turn(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<Color, EngineError> {
        self.authorize(format!("turn {game_id}"), access_token)?;
        Ok(self.turn)
    }

    async fn make_white_move(
        &self,
        access_token: &str,
        game_id: &str,
        mv: Move,
    ) -> Result<(), EngineError> {
        self.submit(format!("white {game_id} {mv}"), access_token)
    }

    async fn make_black_move(
        &self,
        access_token: &str,
        game_id: &str,
        mv: Move,
    ) -> Result<(), EngineError> {
        self.submit(format!("black {game_id} {mv}"), access_token)
    }
}

// =========================================================================
// Helpers
// =========================================================================

type Controller = GameController<FakeIdentity, FakeEngine>;

fn controller(identity: FakeIdentity, engine: FakeEngine) -> Controller {
    GameController::new(identity, engine, ISSUER)
}

fn logged_in(user: &str, access: &str, refresh: &str) -> Session {
    let mut session = Session::new();
    session.set_tokens(TokenPair::new(access, refresh).unwrap());
    session.set_user(user);
    session
}

// =========================================================================
// Login, logout and restore
// =========================================================================

#[tokio::test]
async fn test_login_stores_tokens_and_user() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = Session::new();

    ctl.login(&mut session, "alice", "pw").await.unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.username(), Some("alice"));
    assert_eq!(session.remembered_username(), Some("alice"));
    assert_eq!(session.tokens().unwrap().access_token(), "access-1");
    assert_eq!(session.tokens().unwrap().refresh_token(), "refresh-1");
    assert_eq!(ctl.identity().acquire_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_bad_password_leaves_session_untouched() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("bob", "access-old", "refresh-old");

    let err = ctl.login(&mut session, "alice", "wrong").await.unwrap_err();

    assert!(matches!(err, GambitError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(session.username(), Some("bob"));
    assert_eq!(session.tokens().unwrap().access_token(), "access-old");
}

#[tokio::test]
async fn test_logout_clears_everything_without_network() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");
    session.set_active_game(GAME_ID);

    ctl.logout(&mut session);

    assert!(!session.is_authenticated());
    assert!(session.tokens().is_none());
    assert!(session.active_game_id().is_none());
    assert!(ctl.identity().renewed_with().is_empty());
    assert!(ctl.engine().calls().is_empty());
}

#[tokio::test]
async fn test_restore_session_renews_and_reactivates_user() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-2"));
    let mut session =
        Session::restorable("alice", TokenPair::new("access-1", "refresh-1").unwrap());

    let restored = ctl.restore_session(&mut session).await.unwrap();

    assert!(restored);
    assert_eq!(session.username(), Some("alice"));
    assert_eq!(session.tokens().unwrap().access_token(), "access-2");
    assert_eq!(ctl.identity().renewed_with(), vec!["refresh-1"]);
}

#[tokio::test]
async fn test_restore_session_refresh_failure_clears_session() {
    let ctl = controller(
        FakeIdentity::refusing_renewal(),
        FakeEngine::accepting("access-2"),
    );
    let mut session =
        Session::restorable("alice", TokenPair::new("access-1", "refresh-1").unwrap());

    let err = ctl.restore_session(&mut session).await.unwrap_err();

    assert!(err.requires_login());
    assert!(session.tokens().is_none());
    assert!(session.remembered_username().is_none());
}

#[tokio::test]
async fn test_restore_session_nothing_to_restore() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));

    let mut empty = Session::new();
    assert!(!ctl.restore_session(&mut empty).await.unwrap());

    let mut active = logged_in("alice", "access-1", "refresh-1");
    assert!(!ctl.restore_session(&mut active).await.unwrap());
    assert_eq!(active.username(), Some("alice"));

    assert!(ctl.identity().renewed_with().is_empty());
}

#[tokio::test]
async fn test_restore_session_without_remembered_user_clears() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = Session::new();
    session.set_tokens(TokenPair::new("access-1", "refresh-1").unwrap());

    let restored = ctl.restore_session(&mut session).await.unwrap();

    assert!(!restored);
    assert!(session.tokens().is_none());
    assert!(ctl.identity().renewed_with().is_empty());
}

// =========================================================================
// Token expiry
// =========================================================================

#[tokio::test]
async fn test_list_games_valid_token_calls_engine_once() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let games = ctl.list_games(&mut session).await.unwrap();

    assert_eq!(games.len(), 1);
    assert_eq!(ctl.engine().calls(), vec!["list [access-1]"]);
    assert!(ctl.identity().renewed_with().is_empty());
}

#[tokio::test]
async fn test_list_games_expired_token_refreshes_and_retries_once() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-2"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let games = ctl.list_games(&mut session).await.unwrap();

    assert_eq!(games[0].id, GAME_ID);
    assert_eq!(
        ctl.engine().calls(),
        vec!["list [access-1]", "list [access-2]"]
    );
    assert_eq!(ctl.identity().renewed_with(), vec!["refresh-1"]);
    assert_eq!(session.tokens().unwrap().access_token(), "access-2");
    assert_eq!(session.tokens().unwrap().refresh_token(), "refresh-2");
}

#[tokio::test]
async fn test_list_games_still_unauthorized_after_refresh_is_not_retried_again() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-9"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let err = ctl.list_games(&mut session).await.unwrap_err();

    assert!(matches!(err, GambitError::Engine(EngineError::Unauthorized(_))));
    assert_eq!(ctl.engine().calls().len(), 2);
    assert_eq!(ctl.identity().renewed_with().len(), 1);
}

#[tokio::test]
async fn test_list_games_refresh_failure_expires_session() {
    let ctl = controller(
        FakeIdentity::refusing_renewal(),
        FakeEngine::accepting("access-2"),
    );
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let err = ctl.list_games(&mut session).await.unwrap_err();

    assert!(matches!(err, GambitError::Auth(AuthError::SessionExpired)));
    assert_eq!(ctl.engine().calls().len(), 1);
    assert!(session.tokens().is_none());
    assert!(session.username().is_none());
}

#[tokio::test]
async fn test_list_games_other_engine_error_is_not_retried() {
    let engine = FakeEngine::accepting("access-1").failing_lists(500, "database down");
    let ctl = controller(FakeIdentity::new(), engine);
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let err = ctl.list_games(&mut session).await.unwrap_err();

    assert!(matches!(
        err,
        GambitError::Engine(EngineError::Rejected { status: 500, .. })
    ));
    assert_eq!(ctl.engine().calls().len(), 1);
    assert!(ctl.identity().renewed_with().is_empty());
}

#[tokio::test]
async fn test_engine_call_without_login_is_refused_locally() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = Session::new();

    let err = ctl.get_board(&mut session, GAME_ID).await.unwrap_err();

    assert!(matches!(err, GambitError::Auth(AuthError::NotLoggedIn)));
    assert!(ctl.engine().calls().is_empty());
}

// =========================================================================
// create_game
// =========================================================================

#[tokio::test]
async fn test_create_game_requester_white() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let game = ctl
        .create_game(&mut session, "alice", "bob", "white")
        .await
        .unwrap();

    assert_eq!(game.id, "game-new");
    let parties = &ctl.engine().created()[0];
    assert_eq!(parties.white.preferred_username(), Some("alice"));
    assert_eq!(parties.black.preferred_username(), Some("bob"));
    assert_eq!(parties.white.claim("iss"), Some(&[ISSUER.to_string()][..]));
}

#[tokio::test]
async fn test_create_game_requester_black() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    ctl.create_game(&mut session, "alice", "bob", "BLACK")
        .await
        .unwrap();

    let parties = &ctl.engine().created()[0];
    assert_eq!(parties.white.preferred_username(), Some("bob"));
    assert_eq!(parties.black.preferred_username(), Some("alice"));
}

#[tokio::test]
async fn test_create_game_color_is_case_insensitive() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    ctl.create_game(&mut session, "alice", "bob", "WhItE")
        .await
        .unwrap();

    assert_eq!(
        ctl.engine().created()[0].white.preferred_username(),
        Some("alice")
    );
}

// =========================================================================
// submit_move
// =========================================================================

#[tokio::test]
async fn test_submit_move_dispatches_by_side() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    ctl.submit_move(&mut session, GAME_ID, "e2", "e4", Color::White)
        .await
        .unwrap();
    ctl.submit_move(&mut session, GAME_ID, "E7", "e5", Color::Black)
        .await
        .unwrap();

    assert_eq!(
        ctl.engine().calls(),
        vec![
            "white game-1 e2-e4 [access-1]",
            "black game-1 e7-e5 [access-1]",
        ]
    );
}

#[tokio::test]
async fn test_submit_move_malformed_square_never_reaches_engine() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    for (from, to) in [("z9", "e4"), ("e2", "e9"), ("e", "e4"), ("e2", "e44")] {
        let err = ctl
            .submit_move(&mut session, GAME_ID, from, to, Color::White)
            .await
            .unwrap_err();
        assert!(matches!(err, GambitError::Format(_)), "{from}-{to}: {err}");
    }
    assert!(ctl.engine().calls().is_empty());
}

#[tokio::test]
async fn test_submit_move_not_your_turn_is_classified() {
    let engine = FakeEngine::accepting("access-1").rejecting_moves(400, "Not your turn");
    let ctl = controller(FakeIdentity::new(), engine);
    let mut session = logged_in("bob", "access-1", "refresh-1");

    let err = ctl
        .submit_move(&mut session, GAME_ID, "e7", "e5", Color::Black)
        .await
        .unwrap_err();

    assert!(matches!(err, GambitError::Move(MoveError::NotYourTurn)));
    assert_eq!(err.user_message(), "Not your turn!");
}

#[tokio::test]
async fn test_submit_move_invalid_move_is_classified() {
    let engine = FakeEngine::accepting("access-1")
        .rejecting_moves(400, "Invalid move: pawn cannot move three squares");
    let ctl = controller(FakeIdentity::new(), engine);
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let err = ctl
        .submit_move(&mut session, GAME_ID, "e2", "e5", Color::White)
        .await
        .unwrap_err();

    assert!(matches!(err, GambitError::Move(MoveError::InvalidMove)));
}

#[tokio::test]
async fn test_submit_move_other_rejection_is_unknown() {
    let engine = FakeEngine::accepting("access-1").rejecting_moves(500, "boom");
    let ctl = controller(FakeIdentity::new(), engine);
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let err = ctl
        .submit_move(&mut session, GAME_ID, "e2", "e4", Color::White)
        .await
        .unwrap_err();

    assert!(matches!(err, GambitError::Move(MoveError::Unknown)));
    assert_eq!(err.user_message(), "Move failed. Please try again.");
}

#[tokio::test]
async fn test_submit_move_expired_token_retries_same_move() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-2"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    ctl.submit_move(&mut session, GAME_ID, "g1", "f3", Color::White)
        .await
        .unwrap();

    assert_eq!(
        ctl.engine().calls(),
        vec![
            "white game-1 g1-f3 [access-1]",
            "white game-1 g1-f3 [access-2]",
        ]
    );
}

#[tokio::test]
async fn test_submit_move_refresh_failure_is_an_auth_error() {
    let ctl = controller(
        FakeIdentity::refusing_renewal(),
        FakeEngine::accepting("access-2"),
    );
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let err = ctl
        .submit_move(&mut session, GAME_ID, "e2", "e4", Color::White)
        .await
        .unwrap_err();

    assert!(matches!(err, GambitError::Auth(AuthError::SessionExpired)));
    assert!(!session.is_authenticated());
}

// =========================================================================
// Game view
// =========================================================================

#[tokio::test]
async fn test_open_game_derives_viewer_color_and_turn() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("alice", "access-1", "refresh-1");

    let view = ctl.open_game(&mut session, GAME_ID).await.unwrap();

    assert_eq!(view.my_color, Some(Color::White));
    assert_eq!(view.turn, Color::White);
    assert!(view.is_my_turn());
    assert_eq!(
        view.opponent().and_then(Party::preferred_username),
        Some("bob")
    );
    assert_eq!(view.piece_at(4, 0).map(|p| p.kind), Some(PieceKind::King));
    assert!(view.piece_at(4, 1).is_none());
    assert_eq!(session.active_game_id(), Some(GAME_ID));

    ctl.close_game(&mut session);
    assert!(session.active_game_id().is_none());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_open_game_as_spectator_has_no_color() {
    let ctl = controller(FakeIdentity::new(), FakeEngine::accepting("access-1"));
    let mut session = logged_in("carol", "access-1", "refresh-1");

    let view = ctl.open_game(&mut session, GAME_ID).await.unwrap();

    assert_eq!(view.my_color, None);
    assert!(!view.is_my_turn());
    assert!(view.opponent().is_none());
}

#[tokio::test]
async fn test_play_move_out_of_turn_is_refused_locally() {
    let engine = FakeEngine::accepting("access-1").with_turn(Color::Black);
    let ctl = controller(FakeIdentity::new(), engine);
    let mut session = logged_in("alice", "access-1", "refresh-1");
    let view = ctl.open_game(&mut session, GAME_ID).await.unwrap();
    let fetches = ctl.engine().calls().len();

    let err = ctl
        .play_move(&mut session, &view, "e2", "e4")
        .await
        .unwrap_err();

    assert!(matches!(err, GambitError::Move(MoveError::NotYourTurn)));
    assert_eq!(ctl.engine().calls().len(), fetches);
}

#[tokio::test]
async fn test_play_move_on_own_turn_submits_for_viewer_side() {
    let engine = FakeEngine::accepting("access-1").with_turn(Color::Black);
    let ctl = controller(FakeIdentity::new(), engine);
    let mut session = logged_in("bob", "access-1", "refresh-1");
    let view = ctl.open_game(&mut session, GAME_ID).await.unwrap();

    ctl.play_move(&mut session, &view, "d7", "d5").await.unwrap();

    assert_eq!(
        ctl.engine().calls().last().map(String::as_str),
        Some("black game-1 d7-d5 [access-1]")
    );
}

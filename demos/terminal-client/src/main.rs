use std::time::Duration;

use clap::Parser;
use gambit::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Play chess against the hosted engine from a terminal.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Identity provider realm URL.
    #[arg(long, env = "GAMBIT_AUTH_URL")]
    auth_url: Option<String>,

    /// OAuth2 client id.
    #[arg(long, env = "GAMBIT_CLIENT_ID")]
    client_id: Option<String>,

    /// OAuth2 client secret.
    #[arg(long, env = "GAMBIT_CLIENT_SECRET")]
    client_secret: Option<String>,

    /// Chess engine base URL.
    #[arg(long, env = "GAMBIT_ENGINE_URL")]
    engine_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Args {
    fn config(&self) -> GambitConfig {
        let mut identity = IdentityConfig::default();
        if let Some(url) = &self.auth_url {
            identity = identity.auth_url(url);
        }
        if self.client_id.is_some() || self.client_secret.is_some() {
            let id = self
                .client_id
                .clone()
                .unwrap_or_else(|| identity.client_id.clone());
            let secret = self
                .client_secret
                .clone()
                .unwrap_or_else(|| identity.client_secret.clone());
            identity = identity.client(id, secret);
        }

        let mut engine = EngineConfig::default();
        if let Some(url) = &self.engine_url {
            engine = engine.base_url(url);
        }

        GambitConfig::default()
            .identity(identity)
            .engine(engine)
            .timeout(Duration::from_secs(self.timeout_secs))
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Login { username: String, password: String },
    Games,
    New { opponent: String, color: String },
    Open { game_id: String },
    Board,
    Move { from: String, to: String },
    Back,
    Logout,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["login", user, pass] => Ok(Command::Login {
            username: user.to_string(),
            password: pass.to_string(),
        }),
        ["games"] => Ok(Command::Games),
        ["new", opponent] => Ok(Command::New {
            opponent: opponent.to_string(),
            color: Color::White.as_str().to_string(),
        }),
        ["new", opponent, color] => Ok(Command::New {
            opponent: opponent.to_string(),
            color: color.to_string(),
        }),
        ["open", id] => Ok(Command::Open { game_id: id.to_string() }),
        ["board"] => Ok(Command::Board),
        ["move", from, to] => Ok(Command::Move {
            from: from.to_string(),
            to: to.to_string(),
        }),
        [mv] if mv.len() == 5 && mv.as_bytes()[2] == b'-' => Ok(Command::Move {
            from: mv[..2].to_string(),
            to: mv[3..].to_string(),
        }),
        ["back"] => Ok(Command::Back),
        ["logout"] => Ok(Command::Logout),
        ["help"] | [] => Ok(Command::Help),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        _ => Err(format!("unrecognised command: {line}")),
    }
}

const HELP: &str = "\
commands:
  login <user> <password>
  games                       list your games
  new <opponent> [white|black]
  open <game-id>
  board                       refresh the open game
  move <from> <to>            or e2-e4
  back                        return to the games list
  logout | quit";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn glyph(piece: &Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::King) => '♔',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::Black, PieceKind::King) => '♚',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Pawn) => '♟',
    }
}

/// Draws the board with rank 8 at the top and files a–h left to right.
fn render_board(view: &GameView) -> String {
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8u8 {
            let cell = view.piece_at(file, rank).map_or('·', glyph);
            out.push(cell);
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");
    out
}

fn describe(view: &GameView) -> String {
    let white = view.game.parties.white.preferred_username().unwrap_or("?");
    let black = view.game.parties.black.preferred_username().unwrap_or("?");
    let opponent = view
        .opponent()
        .and_then(Party::preferred_username)
        .unwrap_or("opponent");
    let status = match view.my_color {
        Some(_) if view.is_my_turn() => "your move".to_string(),
        Some(_) => format!("waiting for {opponent}"),
        None => format!("{} to move", view.turn),
    };
    format!(
        "game {} ({})\n{white} (white) vs {black} (black), {status}\n{}",
        view.game.id,
        view.game.state,
        render_board(view)
    )
}

// ---------------------------------------------------------------------------
// Client loop
// ---------------------------------------------------------------------------

struct Client {
    controller: GameController<HttpIdentityClient, HttpEngineClient>,
    session: Session,
    view: Option<GameView>,
}

impl Client {
    async fn handle(&mut self, command: Command) -> Result<(), GambitError> {
        match command {
            Command::Login { username, password } => {
                self.controller
                    .login(&mut self.session, &username, &password)
                    .await?;
                println!("logged in as {username}");
            }
            Command::Games => {
                let games = self.controller.list_games(&mut self.session).await?;
                if games.is_empty() {
                    println!("no games yet; start one with `new <opponent>`");
                }
                for game in games {
                    println!("  {}  {}", game.id, game.state);
                }
            }
            Command::New { opponent, color } => {
                let me = self.session.username().unwrap_or_default().to_string();
                let game = self
                    .controller
                    .create_game(&mut self.session, &me, &opponent, &color)
                    .await?;
                println!("created game {}", game.id);
                self.open(&game.id).await?;
            }
            Command::Open { game_id } => self.open(&game_id).await?,
            Command::Board => match self.session.active_game_id() {
                Some(id) => {
                    let id = id.to_string();
                    self.open(&id).await?;
                }
                None => println!("no game open"),
            },
            Command::Move { from, to } => {
                let Some(view) = self.view.take() else {
                    println!("open a game first");
                    return Ok(());
                };
                let result = self
                    .controller
                    .play_move(&mut self.session, &view, &from, &to)
                    .await;
                let game_id = view.game.id.clone();
                self.view = Some(view);
                result?;
                println!("moved {from}-{to}");
                self.open(&game_id).await?;
            }
            Command::Back => {
                self.controller.close_game(&mut self.session);
                self.view = None;
            }
            Command::Logout => {
                self.controller.logout(&mut self.session);
                self.view = None;
                println!("logged out");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        Ok(())
    }

    async fn open(&mut self, game_id: &str) -> Result<(), GambitError> {
        let view = self.controller.open_game(&mut self.session, game_id).await?;
        println!("{}", describe(&view));
        self.view = Some(view);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    gambit::telemetry::init_tracing("warn,gambit=info");
    let args = Args::parse();

    let mut client = Client {
        controller: GameController::connect(args.config())?,
        session: Session::new(),
        view: None,
    };

    tracing::info!(issuer = client.controller.issuer(), "identity provider configured");

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = client.handle(command).await {
            tracing::debug!(error = %e, "command failed");
            println!("{}", e.user_message());
            if e.requires_login() {
                client.view = None;
                println!("log in with `login <user> <password>`");
            }
        }
    }
    Ok(())
}

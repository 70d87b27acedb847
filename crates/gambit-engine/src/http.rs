//! [`EngineApi`] over HTTP via `reqwest`.

use gambit_notation::{Color, Move};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::rejection_message;
use crate::models::{CreateGame, GamePage, MoveCommand};
use crate::{
    EngineApi, EngineConfig, EngineError, GameDetail, GameSummary, Parties,
    Piece,
};

/// Path segments of the chess protocol on the engine.
const CHESS_PATH: [&str; 3] = ["npl", "chess", "Chess"];

/// HTTP client for the chess engine.
#[derive(Debug, Clone)]
pub struct HttpEngineClient {
    http: reqwest::Client,
    config: EngineConfig,
}

impl HttpEngineClient {
    /// Builds a client with its own connection pool.
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(config: EngineConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    /// Builds a client that shares an existing connection pool.
    pub fn with_client(http: reqwest::Client, config: EngineConfig) -> Self {
        Self { http, config }
    }

    /// The base URL followed by the chess path and `tail`. Each segment is
    /// percent-encoded, so `/`, `?` and `#` in a game id stay inside it.
    fn url(&self, tail: &[&str]) -> Result<Url, EngineError> {
        let invalid = || EngineError::InvalidUrl(self.config.base_url.clone());
        let mut url = Url::parse(&self.config.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(CHESS_PATH)
            .extend(tail);
        Ok(url)
    }

    fn collection_url(&self) -> Result<Url, EngineError> {
        self.url(&[""])
    }

    fn game_url(&self, game_id: &str, action: &str) -> Result<Url, EngineError> {
        if matches!(game_id, "" | "." | "..") {
            return Err(EngineError::InvalidGameId(game_id.to_string()));
        }
        self.url(&[game_id, action])
    }

    /// Sends a request and decodes a JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, EngineError> {
        let response = execute(request).await?;
        response
            .json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))
    }

    async fn make_move(
        &self,
        access_token: &str,
        game_id: &str,
        action: &str,
        mv: Move,
    ) -> Result<(), EngineError> {
        tracing::debug!(%game_id, action, %mv, "submitting move");
        let request = self
            .http
            .post(self.game_url(game_id, action)?)
            .bearer_auth(access_token)
            .json(&MoveCommand { mv });
        execute(request).await.map(drop)
    }
}

/// Sends a request and maps failure statuses onto [`EngineError`].
async fn execute(
    request: RequestBuilder,
) -> Result<reqwest::Response, EngineError> {
    let response = request.send().await.map_err(EngineError::Request)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(%status, %body, "engine rejected request");

    if status == StatusCode::UNAUTHORIZED {
        Err(EngineError::Unauthorized(rejection_message(&body)))
    } else {
        Err(EngineError::rejected(status.as_u16(), body))
    }
}

impl EngineApi for HttpEngineClient {
    async fn create_game(
        &self,
        access_token: &str,
        parties: &Parties,
    ) -> Result<GameDetail, EngineError> {
        let request = self
            .http
            .post(self.collection_url()?)
            .bearer_auth(access_token)
            .json(&CreateGame { parties });
        self.fetch(request).await
    }

    async fn list_games(
        &self,
        access_token: &str,
    ) -> Result<Vec<GameSummary>, EngineError> {
        let request =
            self.http.get(self.collection_url()?).bearer_auth(access_token);
        let page: GamePage = self.fetch(request).await?;
        Ok(page.items)
    }

    async fn get_game(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<GameDetail, EngineError> {
        let request = self
            .http
            .get(self.game_url(game_id, "")?)
            .bearer_auth(access_token);
        self.fetch(request).await
    }

    async fn get_board(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<Vec<Piece>, EngineError> {
        let request = self
            .http
            .post(self.game_url(game_id, "getBoard")?)
            .bearer_auth(access_token);
        self.fetch(request).await
    }

    async fn get_current_turn(
        &self,
        access_token: &str,
        game_id: &str,
    ) -> Result<Color, EngineError> {
        let request = self
            .http
            .post(self.game_url(game_id, "getCurrentTurn")?)
            .bearer_auth(access_token);
        self.fetch(request).await
    }

    async fn make_white_move(
        &self,
        access_token: &str,
        game_id: &str,
        mv: Move,
    ) -> Result<(), EngineError> {
        self.make_move(access_token, game_id, "makeWhiteMove", mv).await
    }

    async fn make_black_move(
        &self,
        access_token: &str,
        game_id: &str,
        mv: Move,
    ) -> Result<(), EngineError> {
        self.make_move(access_token, game_id, "makeBlackMove", mv).await
    }
}

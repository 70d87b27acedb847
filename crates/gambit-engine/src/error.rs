/// Errors that can occur when talking to the chess engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine refused the bearer token (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The engine answered with a non-success status. `message` is the
    /// engine's own explanation, e.g. "Invalid move" or "Not your turn";
    /// `body` is the full response body it was taken from.
    #[error("engine rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        body: String,
    },

    /// The game id cannot name a game (empty, `.` or `..`).
    #[error("invalid game id: {0:?}")]
    InvalidGameId(String),

    /// The configured engine base URL cannot be used to build request URLs.
    #[error("invalid engine URL: {0}")]
    InvalidUrl(String),

    /// The request never got an answer (connect, timeout, TLS).
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The engine answered, but the body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl EngineError {
    /// A rejection with the given status and response body.
    ///
    /// Structured bodies (`{"message": "..."}`) yield their message field
    /// as the explanation; anything else is used verbatim.
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Rejected {
            status,
            message: rejection_message(&body),
            body,
        }
    }

    /// `true` if the engine explicitly rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The engine's textual reason for a rejection, if there is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message) | Self::Rejected { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }

    /// The full response body of a rejection.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Extracts the engine's explanation from an error body.
pub(crate) fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

//! Engine endpoint configuration.

use std::time::Duration;

/// Where and how to reach the chess engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the engine; operation paths are appended to it.
    pub base_url: String,

    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://engine-platformdemo-chess.noumena.cloud"
                .to_string(),
            timeout: None,
        }
    }
}

impl EngineConfig {
    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

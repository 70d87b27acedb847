//! Top-level configuration.

use std::time::Duration;

use gambit_auth::IdentityConfig;
use gambit_engine::EngineConfig;

/// Everything [`GameController::connect`](crate::GameController::connect)
/// needs: where the identity provider and the engine live.
///
/// `Default` points at the public demo deployment; override just the
/// fields you care about.
#[derive(Debug, Clone, Default)]
pub struct GambitConfig {
    pub identity: IdentityConfig,
    pub engine: EngineConfig,
}

impl GambitConfig {
    /// Sets the identity provider configuration.
    pub fn identity(mut self, identity: IdentityConfig) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the engine configuration.
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Applies one request timeout to both the identity provider and the
    /// engine.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.identity.timeout = Some(timeout);
        self.engine.timeout = Some(timeout);
        self
    }
}

use std::sync::Arc;

use toastem_core::validation::ProfileRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything inside is behind `Arc` and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Validation profiles, built once at startup.
    pub profiles: Arc<ProfileRegistry>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            profiles: Arc::new(ProfileRegistry::new()),
        }
    }
}

use crate::config::ServerConfig;
use crate::store::UserStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new app state
    pub fn new(users: Arc<dyn UserStore>, config: ServerConfig) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}

use std::sync::Arc;

use crate::auth::PasswordHasher;
use crate::config::ServerConfig;
use crate::session::SessionRegistry;
use crate::storage::UserStore;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub sessions: Arc<SessionRegistry>,
    pub hasher: PasswordHasher,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            sessions: Arc::new(SessionRegistry::new(
                config.session_ttl(),
                config.anonymous_session_ttl(),
            )),
            hasher: PasswordHasher::new(config.password_iterations),
            config: Arc::new(config),
        }
    }
}

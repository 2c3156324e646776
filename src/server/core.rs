use log::{debug, error, info};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use super::routes::router;
use super::state::AppState;
use crate::config::ServerConfig;
use crate::error::StoreError;
use crate::storage::JsonFileStore;

/// Startup failures
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Failed to open user store: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

pub struct Server {
    state: AppState,
    listener: TcpListener,
}

impl Server {
    /// Opens the user store and binds the listener.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let store = JsonFileStore::open(config.users_file_path())?;
        info!("User store: {}", store.path().display());

        let addr = config.listen_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(source) => {
                error!("Failed to bind to {}: {}", addr, source);
                return Err(ServerError::Bind { addr, source });
            }
        };

        Ok(Self {
            state: AppState::new(config, Arc::new(store)),
            listener,
        })
    }

    /// Serves requests until Ctrl+C or SIGTERM.
    pub async fn start(self) -> Result<(), ServerError> {
        info!(
            "Starting gatehouse on {} (session ttl {}s)",
            self.state.config.listen_addr(),
            self.state.config.session_ttl_secs
        );

        let sweeper = spawn_session_sweeper(self.state.clone());
        let app = router(self.state);

        let result = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        info!("Server shutting down...");
        result.map_err(ServerError::from)
    }
}

/// Periodically drops expired sessions.
fn spawn_session_sweeper(state: AppState) -> tokio::task::JoinHandle<()> {
    let period = state.config.session_sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = state.sessions.purge_expired();
            debug!(
                "Session sweep removed {} ({} live)",
                removed,
                state.sessions.len()
            );
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

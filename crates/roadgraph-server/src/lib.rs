//! HTTP + WebSocket server for the road graph

pub mod error;
pub mod handlers;
pub mod router;
pub mod websocket;

use std::sync::Arc;
use std::time::Duration;

use roadgraph_core::{ChangeSink, GraphChange, GraphStore};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub use error::ApiError;
pub use router::create_router;

/// Capacity of the change feed; slower WebSocket clients skip ahead.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Network and query settings for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single path search.
    pub path_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            path_timeout: Duration::from_millis(2000),
        }
    }
}

/// Broadcasts applied mutations to WebSocket subscribers.
///
/// Installed as the store's [`ChangeSink`], so messages are sent under the
/// store's write lock and reach every subscriber in version order.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<String>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        ChangeFeed { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Send a raw message to all subscribers.
    ///
    /// Returns how many subscribers received it; zero when nobody listens.
    pub fn broadcast(&self, msg: String) -> usize {
        self.tx.send(msg).unwrap_or(0)
    }
}

impl ChangeSink for ChangeFeed {
    fn publish(&self, change: &GraphChange) {
        match websocket::change_message(change) {
            Ok(msg) => {
                let receivers = self.broadcast(msg);
                debug!(version = change.version(), receivers, "change published");
            }
            Err(e) => warn!("Failed to serialize graph change: {}", e),
        }
    }
}

/// State shared by every request handler.
pub struct ServerState {
    pub store: GraphStore,
    pub feed: Arc<ChangeFeed>,
    pub path_timeout: Duration,
}

impl ServerState {
    pub fn new(store: GraphStore) -> Self {
        Self::with_timeout(store, ServerConfig::default().path_timeout)
    }

    /// Wire `store` to a fresh change feed.
    pub fn with_timeout(store: GraphStore, path_timeout: Duration) -> Self {
        let feed = Arc::new(ChangeFeed::new(CHANGE_CHANNEL_CAPACITY));
        ServerState {
            store: store.with_sink(feed.clone()),
            feed,
            path_timeout,
        }
    }
}

/// The road graph server: owns the shared state and serves the router.
pub struct RoadgraphServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl RoadgraphServer {
    pub fn new(store: GraphStore, config: ServerConfig) -> Self {
        let state = Arc::new(ServerState::with_timeout(store, config.path_timeout));
        RoadgraphServer { state, config }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Bind and serve until Ctrl-C.
    pub async fn start(self) -> anyhow::Result<()> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        let app = create_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

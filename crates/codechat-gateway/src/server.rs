//! Server state and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use codechat_core::{ChatSession, Config};
use codechat_llm::any::AnyProvider;
use tokio::sync::{RwLock, watch};

use crate::router::build_router;

/// Slot holding the one live session. Empty until the first successful
/// initialize; replaced wholesale by each later one.
pub type SessionSlot = Arc<RwLock<Option<ChatSession<AnyProvider>>>>;

#[derive(Clone)]
pub struct AppState {
    pub provider: AnyProvider,
    pub config: Arc<Config>,
    pub session: SessionSlot,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(provider: AnyProvider, config: Config) -> Self {
        Self {
            provider,
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
            started_at: Instant::now(),
        }
    }
}

/// Axum server wrapper with watch-channel graceful shutdown.
pub struct GatewayServer {
    addr: SocketAddr,
    state: AppState,
    shutdown: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(addr: SocketAddr, state: AppState, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            addr,
            state,
            shutdown,
        }
    }

    /// Bind and serve until the shutdown channel fires.
    ///
    /// # Errors
    ///
    /// Returns an error when binding the listener or serving fails.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        let local = listener.local_addr()?;
        tracing::info!(addr = %local, "gateway listening");

        let router = build_router(self.state);
        let mut shutdown = self.shutdown;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
                tracing::info!("gateway shutting down");
            })
            .await
    }
}

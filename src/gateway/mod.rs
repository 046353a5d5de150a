//! Realtime gateway: HTTP commands and a WebSocket state stream
//!
//! ## Protocol Architecture
//!
//! - **`POST /action`**: Apply one velocity command, reply with the transition
//! - **`POST /reset`**: Start a new episode
//! - **`GET /ws`**: WebSocket; `hello` on connect, then a `state` push every tick
//! - **`GET /health`**: Liveness probe
//!
//! # Shared State
//!
//! ```text
//!  POST /action ─┐                       ┌─▶ subscriber 1 (own timer)
//!  POST /reset  ─┼─▶ Mutex<Simulator> ◀──┼─▶ subscriber 2 (own timer)
//!                │   (single writer)     └─▶ ...
//! ```
//!
//! Commands hold the lock for the whole move/scan/rollback sequence. A tick
//! holds it only while observing, so a subscriber never sees a half-applied
//! command. The lock is never held across an `.await`.

mod handlers;
pub mod messages;
mod stream;

pub use messages::{ActionCommand, ActionResponse, ResetResponse, StreamMessage};

use crate::config::{AppConfig, CommandConfig};
use crate::error::{Error, Result};
use crate::sim::{Observation, Simulator, Transition};
use axum::Router;
use axum::routing::{get, post};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// State shared by every route and subscriber
pub struct AppState {
    sim: Mutex<Simulator>,
    command: CommandConfig,
    tick_interval: Duration,
    subscribers: AtomicUsize,
}

impl AppState {
    pub fn new(sim: Simulator, command: CommandConfig, tick_interval: Duration) -> Self {
        Self {
            sim: Mutex::new(sim),
            command,
            tick_interval,
            subscribers: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.build_simulator(),
            config.command,
            config.network.tick_interval(),
        )
    }

    /// Apply a command under the simulator lock.
    pub fn apply(&self, cmd: ActionCommand) -> Transition {
        self.sim.lock().apply_action(cmd.linear, cmd.angular)
    }

    /// Reset the episode under the simulator lock.
    pub fn reset(&self) {
        self.sim.lock().reset();
    }

    /// Consistent snapshot of the current state with a fresh scan.
    pub fn observe(&self) -> Observation {
        self.sim.lock().observe()
    }

    #[inline]
    pub fn command_defaults(&self) -> &CommandConfig {
        &self.command
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Number of WebSocket subscribers currently streaming.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::Relaxed)
    }
}

/// Build the gateway router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/action", post(handlers::action))
        .route("/reset", post(handlers::reset))
        .route("/ws", get(stream::ws_handler))
        .route("/health", get(handlers::health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Server(e.to_string()))
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let bind_addr = &config.network.bind_address;
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", bind_addr, e)))?;

    info!("Gateway listening on http://{}", bind_addr);
    info!("State stream: ws://{}/ws", bind_addr);

    let state = Arc::new(AppState::from_config(config));
    serve_with_listener(listener, state, shutdown_signal()).await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

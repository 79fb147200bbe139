//! HTTP front end for the prefetch service.
//!
//! One route: `POST /api/prefetch`. The handler validates the request,
//! filters it through the dedup registry, and detaches the engine run from
//! the connection - the client gets its 202 immediately and the pipeline
//! finishes (or not) under its own deadline.

mod error;
mod handlers;
mod registry;

pub use error::ApiError;
pub use registry::DedupRegistry;

use axum::routing::post;
use axum::serve::ListenerExt as _;
use axum::Router;
use cw_engine::PrefetchEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// How long a detached prefetch run may take before its token is cancelled.
const PREFETCH_DEADLINE: Duration = Duration::from_secs(5 * 60);

/// Shared state behind every handler.
pub struct ServiceState {
    engine: PrefetchEngine,
    registry: DedupRegistry,
    prefetch_deadline: Duration,
}

impl ServiceState {
    /// Create state with the default 5-minute run deadline.
    pub fn new(engine: PrefetchEngine) -> Self {
        Self {
            engine,
            registry: DedupRegistry::new(),
            prefetch_deadline: PREFETCH_DEADLINE,
        }
    }

    /// Override the run deadline (tests).
    pub fn with_prefetch_deadline(mut self, deadline: Duration) -> Self {
        self.prefetch_deadline = deadline;
        self
    }
}

/// Build the application router.
pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/api/prefetch", post(handlers::prefetch_handler))
        .with_state(state)
}

/// Serve the API until the shutdown channel fires.
pub async fn serve(
    addr: SocketAddr,
    state: Arc<ServiceState>,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await?
        .tap_io(|tcp_stream| {
            let _ = tcp_stream.set_nodelay(true);
        });
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.recv().await.ok();
        })
        .await?;
    Ok(())
}

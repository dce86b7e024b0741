//! Streamable HTTP transport for the MCP server.

mod auth;
mod router;
mod state;


use std::net::IpAddr;

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::SqliteStore;

pub use router::SESSION_HEADER;
pub use state::AppState;

/// Server configuration
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared secret clients must present on the MCP routes
    pub api_key: String,
}

/// Transport-level failures.
#[derive(Error, Diagnostic, Debug)]
pub enum ServeError {
    #[error("Server I/O error: {0}")]
    #[diagnostic(code(tagreg::http::io))]
    Io(#[from] std::io::Error),
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagreg=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the server with the given configuration until interrupted.
pub async fn run(config: Config, store: SqliteStore) -> Result<(), ServeError> {
    init_tracing();

    let state = AppState::new(store, config.api_key);
    let app = router::create_router(state.clone()).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MCP server listening on http://{}/mcp", addr);

    // Closing every session ends the open SSE streams, which is what
    // lets the graceful shutdown drain and return.
    let drain = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("shutting down");
            drain.sessions().close_all();
        })
        .await?;

    state.store().close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
}

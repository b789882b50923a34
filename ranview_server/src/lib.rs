//! RanView Dashboard Server
//!
//! Thin JSON surface over one `SimulationController`. Rendering lives in
//! the front-end; this crate only wires routes to controller operations.
//!
//! ```text
//! Browser ──HTTP──► Router ──► handlers ──► SimulationController
//!                                                    │
//!                                                    ▼
//!                          ns-3 host ◄──HTTP── SimulatorGateway
//! ```

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, HealthResponse, MessageResponse, RefreshResponse};
pub use routes::create_router;
pub use state::AppState;

use ranview_env::{GatewayError, SimulatorGateway};
use std::net::SocketAddr;
use thiserror::Error;
use tracing::info;

/// Errors that stop the server from running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Gateway setup failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Serves the dashboard API until Ctrl-C.
pub async fn serve<G: SimulatorGateway>(
    listen_addr: SocketAddr,
    state: AppState<G>,
) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("Dashboard API listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    Ok(())
}

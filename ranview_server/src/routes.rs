//! Route configuration for the dashboard API.

use crate::handlers::*;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use ranview_env::SimulatorGateway;

/// Create the router with all dashboard routes.
pub fn create_router<G: SimulatorGateway>(state: AppState<G>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<G>))
        // Read side
        .route("/simulation", get(simulation_handler::<G>))
        .route("/scenarios", get(scenarios_handler::<G>))
        .route("/refresh-data", get(refresh_handler::<G>))
        // Lifecycle transitions
        .route("/start_simulation", post(start_handler::<G>))
        .route("/stop_simulation", post(stop_handler::<G>))
        .route("/reset_simulation", post(reset_handler::<G>))
        .with_state(state)
}

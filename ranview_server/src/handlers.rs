//! HTTP request handlers for the dashboard API.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use ranview_core::{Cell, ControllerError, EsState, Simulation, SimulationStatus, Ue};
use ranview_env::SimulatorGateway;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Liveness probe body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// Display payload returned by `GET /refresh-data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub ues: Vec<Ue>,
    pub cells: Vec<Cell>,
    pub max_x_max_y: (f64, f64),
    /// Scenario name, `"off"` when nothing is recorded
    pub sim_id: String,
    pub es_state: BTreeMap<u32, EsState>,
    pub sinr: BTreeMap<u32, f64>,
    pub retx: BTreeMap<u32, u64>,
    pub prb: BTreeMap<u32, f64>,
    pub starting_power: f64,
    pub current_power: f64,
    pub simulation_status: SimulationStatus,
}

impl From<Simulation> for RefreshResponse {
    fn from(sim: Simulation) -> Self {
        Self {
            max_x_max_y: sim.dimensions(),
            sim_id: sim.sim_id().unwrap_or("off").to_string(),
            es_state: sim.es_state_by_cell(),
            sinr: sim.sinr_by_ue(),
            retx: sim.retx_by_ue(),
            prb: sim.prb_by_cell(),
            starting_power: sim.starting_power(),
            current_power: sim.current_power(),
            simulation_status: sim.status(),
            ues: sim.ues().to_vec(),
            cells: sim.cells().to_vec(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler for `GET /health`.
pub async fn health_handler<G: SimulatorGateway>(
    State(state): State<AppState<G>>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Handler for `GET /simulation` - current snapshot, no remote call.
pub async fn simulation_handler<G: SimulatorGateway>(
    State(state): State<AppState<G>>,
) -> impl IntoResponse {
    Json(state.controller.get_simulation())
}

/// Handler for `GET /scenarios`.
pub async fn scenarios_handler<G: SimulatorGateway>(
    State(state): State<AppState<G>>,
) -> impl IntoResponse {
    Json(state.controller.scenarios().await)
}

/// Handler for `GET /refresh-data`.
pub async fn refresh_handler<G: SimulatorGateway>(
    State(state): State<AppState<G>>,
) -> impl IntoResponse {
    let simulation = state.controller.refresh_simulation().await;
    Json(RefreshResponse::from(simulation))
}

/// Handler for `POST /start_simulation` - body is the dashboard form.
pub async fn start_handler<G: SimulatorGateway>(
    State(state): State<AppState<G>>,
    Json(form): Json<Map<String, Value>>,
) -> impl IntoResponse {
    match state.controller.start_from_form(&form).await {
        Ok(transition) => (StatusCode::OK, Json(transition)).into_response(),
        Err(ControllerError::InvalidParameter(reason)) => {
            tracing::info!(%reason, "Rejected start request");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: reason })).into_response()
        }
    }
}

/// Handler for `POST /stop_simulation`.
pub async fn stop_handler<G: SimulatorGateway>(
    State(state): State<AppState<G>>,
) -> impl IntoResponse {
    Json(state.controller.stop_simulation().await)
}

/// Handler for `POST /reset_simulation`.
pub async fn reset_handler<G: SimulatorGateway>(
    State(state): State<AppState<G>>,
) -> impl IntoResponse {
    state.controller.reset_simulation().await;
    Json(MessageResponse {
        message: "Simulation reset".to_string(),
    })
}

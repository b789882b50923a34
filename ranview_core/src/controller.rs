//! Lifecycle Controller - owns the current simulation.
//!
//! # Locking
//!
//! Two locks with different jobs:
//! - `op_lock` (async) serializes start/stop/reset/refresh end to end,
//!   including their gateway calls. Waiting on it suspends the task, not
//!   the thread.
//! - `state` (sync) guards the aggregate and the active scenario. It is
//!   only taken to read, replace, or merge and is never held across an
//!   `.await`, so `get_simulation` is never stuck behind a slow simulator.
//!
//! # Remote failures
//!
//! The controller is optimistic: local state always reflects the last
//! attempted transition. What the simulator said is reported back through
//! `Transition::remote` instead of an error.

use crate::command::{build_control_command, form_text, scenario_name, StartOptions};
use crate::error::ControllerError;
use crate::simulation::Simulation;
use ranview_env::{Endpoint, GatewayError, ScenarioCatalog, SimulatorGateway};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// UE count used when a form omits `N_Ues`.
pub const DEFAULT_FORM_UES: i64 = 2;

/// LTE cell count used when a form omits `N_LteEnbNodes`.
pub const DEFAULT_FORM_LTE_CELLS: i64 = 1;

/// mmWave cell count used when a form omits `N_MmWaveEnbNodes`.
pub const DEFAULT_FORM_MMWAVE_CELLS: i64 = 4;

/// What the simulator made of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum RemoteAck {
    /// Simulator host accepted the command
    Confirmed,
    /// Recorded locally only; the command failed or was refused
    Unconfirmed(String),
    /// Nothing needed to be sent
    NotContacted,
}

impl RemoteAck {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, RemoteAck::Confirmed)
    }
}

impl From<Result<ranview_env::ControlReply, GatewayError>> for RemoteAck {
    fn from(result: Result<ranview_env::ControlReply, GatewayError>) -> Self {
        match result {
            Ok(_) => RemoteAck::Confirmed,
            Err(e) => RemoteAck::Unconfirmed(e.to_string()),
        }
    }
}

/// Outcome of a start or stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    /// Aggregate as recorded after the transition
    pub simulation: Simulation,
    /// Remote side of the transition
    pub remote: RemoteAck,
}

#[derive(Default)]
struct ControllerState {
    simulation: Option<Simulation>,
    scenario: Option<String>,
}

impl ControllerState {
    fn simulation_mut(&mut self) -> &mut Simulation {
        self.simulation.get_or_insert_with(Simulation::default)
    }
}

/// The single owner of "the current simulation".
///
/// Construct one per process and share it (`Arc`) with request handlers.
pub struct SimulationController<G: SimulatorGateway> {
    gateway: Arc<G>,
    launcher: String,
    op_lock: tokio::sync::Mutex<()>,
    state: Mutex<ControllerState>,
}

impl<G: SimulatorGateway> SimulationController<G> {
    /// Creates a controller talking to the simulator through `gateway`.
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            launcher: "./waf --run".to_string(),
            op_lock: tokio::sync::Mutex::new(()),
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Sets the launcher prefix of start commands.
    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = launcher.into();
        self
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current simulation, created idle on first access.
    pub fn get_simulation(&self) -> Simulation {
        self.state().simulation_mut().clone()
    }

    /// Scenario name of the recorded run, if any.
    pub fn active_scenario(&self) -> Option<String> {
        self.state().scenario.clone()
    }

    /// Drops the current simulation and scenario. Idempotent.
    pub async fn reset_simulation(&self) {
        let _op = self.op_lock.lock().await;
        self.clear();
        info!("Simulation reset");
    }

    fn clear(&self) {
        let mut state = self.state();
        state.simulation = None;
        state.scenario = None;
    }

    /// Starts `scenario_path` on the simulator, superseding any current run.
    ///
    /// Input is validated before anything happens; an `InvalidParameter`
    /// leaves the current simulation untouched. A failed send is logged
    /// and reported as `RemoteAck::Unconfirmed`, and the new run is still
    /// recorded as running.
    pub async fn start_simulation(
        &self,
        scenario_path: &str,
        ue_count: i64,
        cell_count: i64,
        options: &StartOptions,
    ) -> Result<Transition, ControllerError> {
        let scenario_path = scenario_path.trim();
        if scenario_path.is_empty() {
            return Err(ControllerError::invalid("scenario is required"));
        }

        let mut simulation = Simulation::new(ue_count, cell_count)?;
        let command = build_control_command(&self.launcher, scenario_path, options)?;
        let scenario = scenario_name(scenario_path);

        let _op = self.op_lock.lock().await;
        self.clear();

        info!(%scenario, %command, "Sending start command");
        let remote = RemoteAck::from(self.gateway.send_control(&command, Endpoint::Control).await);
        if let RemoteAck::Unconfirmed(reason) = &remote {
            warn!(%scenario, error = %reason, "Start command not confirmed, recording run anyway");
        }

        simulation.mark_running(&scenario);
        {
            let mut state = self.state();
            state.simulation = Some(simulation.clone());
            state.scenario = Some(scenario.clone());
        }

        info!(%scenario, ues = ue_count, cells = cell_count, "Simulation running");
        Ok(Transition { simulation, remote })
    }

    /// Starts a simulation from a dashboard form.
    ///
    /// `scenario` is the path; the UE count comes from `N_Ues` (default 2)
    /// and the cell count from `N_LteEnbNodes` (default 1) plus
    /// `N_MmWaveEnbNodes` (default 4). Everything else is passed through as
    /// start options.
    pub async fn start_from_form(
        &self,
        form: &Map<String, Value>,
    ) -> Result<Transition, ControllerError> {
        let scenario = match form.get("scenario") {
            Some(Value::String(path)) => path.clone(),
            _ => return Err(ControllerError::invalid("scenario is required")),
        };

        let ue_count = form_count(form, "N_Ues", DEFAULT_FORM_UES)?;
        let cell_count = form_count(form, "N_LteEnbNodes", DEFAULT_FORM_LTE_CELLS)?
            .checked_add(form_count(form, "N_MmWaveEnbNodes", DEFAULT_FORM_MMWAVE_CELLS)?)
            .ok_or_else(|| ControllerError::invalid("cell count overflow"))?;

        let options = StartOptions::from_form(form);
        self.start_simulation(&scenario, ue_count, cell_count, &options).await
    }

    /// Stops the recorded scenario.
    ///
    /// Without a recorded scenario nothing is sent and nothing changes.
    /// Otherwise the status becomes `stopped` whether or not the simulator
    /// confirmed.
    pub async fn stop_simulation(&self) -> Transition {
        let _op = self.op_lock.lock().await;

        let scenario = match self.active_scenario() {
            Some(scenario) => scenario,
            None => {
                debug!("Stop requested with no active scenario");
                return Transition {
                    simulation: self.get_simulation(),
                    remote: RemoteAck::NotContacted,
                };
            }
        };

        info!(%scenario, "Sending stop command");
        let remote = RemoteAck::from(self.gateway.send_control(&scenario, Endpoint::Stop).await);
        if let RemoteAck::Unconfirmed(reason) = &remote {
            warn!(%scenario, error = %reason, "Stop command not confirmed, marking stopped anyway");
        }

        let simulation = {
            let mut state = self.state();
            let simulation = state.simulation_mut();
            simulation.mark_stopped();
            simulation.clone()
        };

        Transition { simulation, remote }
    }

    /// Pulls live telemetry into the current simulation and returns it.
    ///
    /// A failed pull is logged and the simulation is returned unchanged.
    pub async fn refresh_simulation(&self) -> Simulation {
        let _op = self.op_lock.lock().await;

        match self.gateway.fetch_telemetry().await {
            Ok(update) => {
                let mut state = self.state();
                let simulation = state.simulation_mut();
                let touched = simulation.apply_metrics(&update);
                debug!(touched, "Merged telemetry");
                simulation.clone()
            }
            Err(e) => {
                warn!(error = %e, "Telemetry unavailable, serving last known values");
                self.get_simulation()
            }
        }
    }

    /// Scenario files offered by the simulator host.
    pub async fn scenarios(&self) -> ScenarioCatalog {
        self.gateway.scenario_catalog().await
    }
}

fn form_count(
    form: &Map<String, Value>,
    name: &str,
    default: i64,
) -> Result<i64, ControllerError> {
    let text = match form.get(name).and_then(form_text) {
        Some(text) => text,
        None => return Ok(default),
    };

    text.trim().parse::<i64>().map_err(|_| {
        ControllerError::invalid(format!("{} must be an integer, got {:?}", name, text))
    })
}

//! The Simulation aggregate - one versioned snapshot of a simulation run.
//!
//! The UE and Cell identifier sets are fixed when the aggregate is built.
//! Telemetry can only change metric values of existing entities; a new
//! topology means a new `Simulation` (with a new `run_id`).

use crate::entities::{Cell, Ue};
use crate::error::ModelError;
use ranview_env::{EsState, MetricsUpdate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Largest UE or cell count a simulation accepts.
///
/// Counts come straight from the dashboard form, so anything beyond what an
/// ns-3 scenario can realistically run is refused before allocating.
pub const MAX_ENTITIES: u32 = 10_000;

/// Lifecycle status of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl SimulationStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SimulationStatus::Idle => "idle",
            SimulationStatus::Running => "running",
            SimulationStatus::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Snapshot version, fresh for every constructed aggregate
    run_id: Uuid,

    /// Scenario name while a run is recorded
    sim_id: Option<String>,

    ues: Vec<Ue>,
    cells: Vec<Cell>,

    /// Chart dimensions (m)
    max_x: f64,
    max_y: f64,

    /// Total transmit power at scenario start and now
    starting_power: f64,
    current_power: f64,

    simulation_status: SimulationStatus,
}

impl Simulation {
    /// Builds an idle simulation with `ue_count` UEs and `cell_count` cells.
    ///
    /// Identifiers are sequential from 1. Fails without building anything
    /// if a count is negative or above [`MAX_ENTITIES`].
    pub fn new(ue_count: i64, cell_count: i64) -> Result<Self, ModelError> {
        let ue_count = checked_count("ue_count", ue_count)?;
        let cell_count = checked_count("cell_count", cell_count)?;

        Ok(Self {
            run_id: Uuid::new_v4(),
            sim_id: None,
            ues: (1..=ue_count).map(Ue::new).collect(),
            cells: (1..=cell_count).map(Cell::new).collect(),
            max_x: 0.0,
            max_y: 0.0,
            starting_power: 0.0,
            current_power: 0.0,
            simulation_status: SimulationStatus::Idle,
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn sim_id(&self) -> Option<&str> {
        self.sim_id.as_deref()
    }

    pub fn status(&self) -> SimulationStatus {
        self.simulation_status
    }

    pub fn ues(&self) -> &[Ue] {
        &self.ues
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn ue(&self, ue_id: u32) -> Option<&Ue> {
        self.ues.iter().find(|ue| ue.ue_id == ue_id)
    }

    pub fn cell(&self, cell_id: u32) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.cell_id == cell_id)
    }

    /// Chart dimensions as `(max_x, max_y)`.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.max_x, self.max_y)
    }

    pub fn starting_power(&self) -> f64 {
        self.starting_power
    }

    pub fn current_power(&self) -> f64 {
        self.current_power
    }

    /// SINR per UE id.
    pub fn sinr_by_ue(&self) -> BTreeMap<u32, f64> {
        self.ues.iter().map(|ue| (ue.ue_id, ue.L3servingSINR_dB)).collect()
    }

    /// DL retransmission errors per UE id.
    pub fn retx_by_ue(&self) -> BTreeMap<u32, u64> {
        self.ues.iter().map(|ue| (ue.ue_id, ue.ErrTotalNbrDl)).collect()
    }

    /// Energy-saving state per cell id.
    pub fn es_state_by_cell(&self) -> BTreeMap<u32, EsState> {
        self.cells.iter().map(|cell| (cell.cell_id, cell.es_state)).collect()
    }

    /// DL PRB usage per cell id.
    pub fn prb_by_cell(&self) -> BTreeMap<u32, f64> {
        self.cells
            .iter()
            .map(|cell| (cell.cell_id, cell.dlPrbUsage_percentage))
            .collect()
    }

    pub(crate) fn mark_running(&mut self, scenario: &str) {
        self.sim_id = Some(scenario.to_string());
        self.simulation_status = SimulationStatus::Running;
    }

    pub(crate) fn mark_stopped(&mut self) {
        self.simulation_status = SimulationStatus::Stopped;
    }

    /// Merges a telemetry pull into matching entities.
    ///
    /// Entities missing from the update keep their values; ids the
    /// aggregate does not know are ignored. Returns the number of entities
    /// touched.
    pub(crate) fn apply_metrics(&mut self, update: &MetricsUpdate) -> usize {
        let mut touched = 0;

        for ue in self.ues.iter_mut() {
            if let Some(metrics) = update.ues.get(&ue.ue_id) {
                ue.merge(metrics);
                touched += 1;
            }
        }

        for cell in self.cells.iter_mut() {
            if let Some(metrics) = update.cells.get(&cell.cell_id) {
                cell.merge(metrics);
                touched += 1;
            }
        }

        if let Some(max_x) = update.max_x {
            self.max_x = max_x;
        }
        if let Some(max_y) = update.max_y {
            self.max_y = max_y;
        }
        if let Some(power) = update.starting_power {
            self.starting_power = power;
        }
        if let Some(power) = update.current_power {
            self.current_power = power;
        }

        touched
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            sim_id: None,
            ues: Vec::new(),
            cells: Vec::new(),
            max_x: 0.0,
            max_y: 0.0,
            starting_power: 0.0,
            current_power: 0.0,
            simulation_status: SimulationStatus::Idle,
        }
    }
}

fn checked_count(name: &str, count: i64) -> Result<u32, ModelError> {
    u32::try_from(count)
        .ok()
        .filter(|count| *count <= MAX_ENTITIES)
        .ok_or_else(|| {
            ModelError::InvalidParameter(format!(
                "{} must be between 0 and {}, got {}",
                name, MAX_ENTITIES, count
            ))
        })
}

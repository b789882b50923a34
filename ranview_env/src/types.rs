//! Wire types exchanged with the remote simulator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Remote channels exposed by the simulator host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Start commands and scenario discovery
    Control,
    /// Stop commands, addressed by scenario name
    Stop,
    /// Live per-entity metrics
    Telemetry,
    /// Scenario file listing (served on the control port)
    Catalog,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Endpoint::Control => "control",
            Endpoint::Stop => "stop",
            Endpoint::Telemetry => "telemetry",
            Endpoint::Catalog => "catalog",
        };
        f.write_str(name)
    }
}

/// Reply to a control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlReply {
    /// HTTP status code
    pub status: u16,
    /// Raw response body (the simulator host echoes its launcher output)
    pub body: String,
}

/// Energy-saving state of a cell.
///
/// Carried as an integer on the wire: `0` inactive, `1` active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EsState {
    /// Cell is serving normally
    #[default]
    Inactive,
    /// Cell is in an energy-saving (sleep) mode
    Active,
}

impl TryFrom<u8> for EsState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EsState::Inactive),
            1 => Ok(EsState::Active),
            other => Err(format!("unknown es_state {}", other)),
        }
    }
}

impl From<EsState> for u8 {
    fn from(state: EsState) -> u8 {
        match state {
            EsState::Inactive => 0,
            EsState::Active => 1,
        }
    }
}

/// Partial metrics for one UE. Absent fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct UeMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub L3servingSINR_dB: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ErrTotalNbrDl: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Partial metrics for one cell. Absent fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct CellMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es_state: Option<EsState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlPrbUsage_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// One telemetry pull, keyed by entity identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsUpdate {
    #[serde(default)]
    pub ues: BTreeMap<u32, UeMetrics>,
    #[serde(default)]
    pub cells: BTreeMap<u32, CellMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_power: Option<f64>,
}

impl MetricsUpdate {
    /// True if the update carries nothing to merge.
    pub fn is_empty(&self) -> bool {
        self.ues.is_empty()
            && self.cells.is_empty()
            && self.max_x.is_none()
            && self.max_y.is_none()
            && self.starting_power.is_none()
            && self.current_power.is_none()
    }
}

/// Scenario files available on the simulator host, index -> path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCatalog(pub BTreeMap<String, String>);

impl ScenarioCatalog {
    /// Catalog used when the simulator host cannot list its scenarios.
    pub fn builtin() -> Self {
        let entries = [
            ("0", "scratch/scenario-zero-with_parallel_loging.cc"),
            ("1", "scratch/scenario-one.cc"),
            ("2", "scratch/scenario-zero.cc"),
        ];
        Self(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a scenario path by index.
    pub fn get(&self, index: &str) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_update_partial_decode() {
        let json = r#"{
            "ues": {"1": {"L3servingSINR_dB": 12.5}},
            "cells": {"3": {"es_state": 1}}
        }"#;
        let update: MetricsUpdate = serde_json::from_str(json).unwrap();

        let ue = &update.ues[&1];
        assert_eq!(ue.L3servingSINR_dB, Some(12.5));
        assert_eq!(ue.ErrTotalNbrDl, None);

        let cell = &update.cells[&3];
        assert_eq!(cell.es_state, Some(EsState::Active));
        assert_eq!(cell.dlPrbUsage_percentage, None);
        assert!(update.current_power.is_none());
    }

    #[test]
    fn test_es_state_rejects_unknown() {
        let result: Result<CellMetrics, _> = serde_json::from_str(r#"{"es_state": 7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_update() {
        let update: MetricsUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ScenarioCatalog::builtin();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("1"), Some("scratch/scenario-one.cc"));

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["2"], "scratch/scenario-zero.cc");
    }
}

//! Simulated radio entities: User Equipments and Cells.
//!
//! Field names are the display contract (`L3servingSINR_dB`,
//! `dlPrbUsage_percentage`, ...) and serialize verbatim.

use ranview_env::{CellMetrics, EsState, UeMetrics};
use serde::{Deserialize, Serialize};

/// A simulated User Equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Ue {
    /// Identifier, unique within one simulation
    pub ue_id: u32,

    /// Last-known serving-cell SINR (dB)
    pub L3servingSINR_dB: f64,

    /// Cumulative downlink retransmission errors
    pub ErrTotalNbrDl: u64,

    /// Position (m)
    pub x: f64,
    pub y: f64,
}

impl Ue {
    /// Creates a UE with zeroed metrics.
    pub fn new(ue_id: u32) -> Self {
        Self {
            ue_id,
            L3servingSINR_dB: 0.0,
            ErrTotalNbrDl: 0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub(crate) fn merge(&mut self, metrics: &UeMetrics) {
        if let Some(sinr) = metrics.L3servingSINR_dB {
            self.L3servingSINR_dB = sinr;
        }
        if let Some(errors) = metrics.ErrTotalNbrDl {
            self.ErrTotalNbrDl = errors;
        }
        if let Some(x) = metrics.x {
            self.x = x;
        }
        if let Some(y) = metrics.y {
            self.y = y;
        }
    }
}

/// A simulated base station cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Cell {
    /// Identifier, unique within one simulation
    pub cell_id: u32,

    /// Energy-saving state
    pub es_state: EsState,

    /// Downlink PRB usage [0, 100]
    pub dlPrbUsage_percentage: f64,

    /// Position (m)
    pub x: f64,
    pub y: f64,
}

impl Cell {
    /// Creates a cell with zeroed metrics.
    pub fn new(cell_id: u32) -> Self {
        Self {
            cell_id,
            es_state: EsState::Inactive,
            dlPrbUsage_percentage: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub(crate) fn merge(&mut self, metrics: &CellMetrics) {
        if let Some(state) = metrics.es_state {
            self.es_state = state;
        }
        if let Some(prb) = metrics.dlPrbUsage_percentage {
            self.dlPrbUsage_percentage = prb.clamp(0.0, 100.0);
        }
        if let Some(x) = metrics.x {
            self.x = x;
        }
        if let Some(y) = metrics.y {
            self.y = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ue_field_names_preserved() {
        let json = serde_json::to_value(Ue::new(4)).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["ue_id"], 4);
        assert!(obj.contains_key("L3servingSINR_dB"));
        assert!(obj.contains_key("ErrTotalNbrDl"));
    }

    #[test]
    fn test_cell_field_names_preserved() {
        let mut cell = Cell::new(2);
        cell.es_state = EsState::Active;
        let json = serde_json::to_value(&cell).unwrap();

        assert_eq!(json["cell_id"], 2);
        assert_eq!(json["es_state"], 1);
        assert_eq!(json["dlPrbUsage_percentage"], 0.0);
    }

    #[test]
    fn test_partial_merge() {
        let mut ue = Ue::new(1);
        ue.ErrTotalNbrDl = 9;
        ue.merge(&UeMetrics {
            L3servingSINR_dB: Some(-3.5),
            ..Default::default()
        });

        assert_eq!(ue.L3servingSINR_dB, -3.5);
        assert_eq!(ue.ErrTotalNbrDl, 9);
    }

    #[test]
    fn test_prb_clamped() {
        let mut cell = Cell::new(1);
        cell.merge(&CellMetrics {
            dlPrbUsage_percentage: Some(130.0),
            ..Default::default()
        });
        assert_eq!(cell.dlPrbUsage_percentage, 100.0);
    }
}

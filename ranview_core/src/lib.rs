//! RanView Core - simulation lifecycle for the ns-3 dashboard
//!
//! This library owns the dashboard's model of "the current simulation":
//! 1. **Entities**: simulated UEs and Cells with their radio metrics
//! 2. **Simulation**: a versioned snapshot replaced wholesale on start/reset
//! 3. **Controller**: serializes start/stop/reset/refresh against the
//!    remote simulator and reconciles telemetry into the snapshot
//!
//! # Usage
//!
//! ```ignore
//! use ranview_core::{SimulationController, StartOptions};
//! use ranview_env::{GatewayConfig, HttpGateway};
//!
//! let gateway = HttpGateway::shared(GatewayConfig::new("ns3-host"))?;
//! let controller = SimulationController::new(gateway);
//!
//! let options = StartOptions::new(true, false).with("simTime", "50");
//! controller.start_simulation("scratch/scenario-one.cc", 2, 5, &options).await?;
//! let snapshot = controller.refresh_simulation().await;
//! ```

pub mod command;
pub mod controller;
pub mod entities;
pub mod error;
pub mod simulation;

// Re-export key types for convenience
pub use command::{build_control_command, scenario_name, OptionRule, StartOptions, OPTION_RULES};
pub use controller::{RemoteAck, SimulationController, Transition};
pub use entities::{Cell, Ue};
pub use error::{ControllerError, ModelError};
pub use simulation::{Simulation, SimulationStatus, MAX_ENTITIES};
pub use ranview_env::EsState;

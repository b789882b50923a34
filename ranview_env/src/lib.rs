//! RanView Simulator Gateway
//!
//! This crate isolates every call RanView makes to the remote ns-3 host
//! behind one trait, so the lifecycle controller can run against the real
//! simulator (`HttpGateway`) or an in-memory stand-in (`MemoryGateway`).
//!
//! # Channels
//!
//! The simulator host exposes fixed, well-known ports:
//! - **Control** (`38866`): POST a launcher command, GET the scenario listing
//! - **Stop** (`38867`): POST a scenario name
//! - **Telemetry** (`38868`): GET live per-entity metrics
//!
//! # Example
//!
//! ```ignore
//! use ranview_env::{GatewayConfig, HttpGateway, SimulatorGateway, Endpoint};
//!
//! let gateway = HttpGateway::new(GatewayConfig::new("ns3-host"))?;
//! gateway.send_control("./waf --run \"scenario-one\"", Endpoint::Control).await?;
//! let update = gateway.fetch_telemetry().await?;
//! ```

mod config;
mod error;
mod gateway;
mod http_impl;
mod memory;
mod types;

pub use config::{GatewayConfig, CONTROL_PORT, HOST_ENV_VAR, STOP_PORT, TELEMETRY_PORT};
pub use error::GatewayError;
pub use gateway::SimulatorGateway;
pub use http_impl::HttpGateway;
pub use memory::{MemoryGateway, SENT_HISTORY_LIMIT};
pub use types::{
    CellMetrics, ControlReply, Endpoint, EsState, MetricsUpdate, ScenarioCatalog, UeMetrics,
};

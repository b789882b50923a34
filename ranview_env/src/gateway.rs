//! Remote simulator gateway abstraction.

use async_trait::async_trait;
use crate::error::GatewayError;
use crate::types::{ControlReply, Endpoint, MetricsUpdate, ScenarioCatalog};

/// Abstraction for request/response calls to the remote simulator.
///
/// # Implementations
///
/// - **Production**: `HttpGateway` - plain HTTP against the simulator host
/// - **Tests**: in-memory gateways recording commands and serving canned JSON
///
/// # Call Flow
///
/// ```text
/// Controller                 Gateway                   Simulator host
///   |                           |                          |
///   |-- send_control(cmd) ----->|-- POST cmd ------------->|
///   |<-- Ok(reply) / Err -------|<-- status + body --------|
///   |                           |                          |
///   |-- fetch_telemetry() ----->|-- GET ------------------>|
///   |<-- MetricsUpdate / Err ---|<-- JSON -----------------|
/// ```
///
/// No call retries. Callers decide what a failure means.
#[async_trait]
pub trait SimulatorGateway: Send + Sync + 'static {
    /// Issues one control command.
    ///
    /// # Returns
    /// * `Ok(reply)` - The simulator host accepted the command
    /// * `Err(GatewayError::Unreachable | Timeout)` - No answer
    /// * `Err(GatewayError::Rejected)` - Non-success status
    async fn send_control(
        &self,
        command: &str,
        endpoint: Endpoint,
    ) -> Result<ControlReply, GatewayError>;

    /// Fetches a JSON document from the given endpoint.
    async fn fetch_metrics(&self, endpoint: Endpoint) -> Result<serde_json::Value, GatewayError>;

    /// Fetches live telemetry and decodes it into a partial update.
    async fn fetch_telemetry(&self) -> Result<MetricsUpdate, GatewayError> {
        let value = self.fetch_metrics(Endpoint::Telemetry).await?;
        serde_json::from_value(value).map_err(GatewayError::decode)
    }

    /// Lists scenario files on the simulator host.
    ///
    /// Never fails: any error yields `ScenarioCatalog::builtin()`.
    async fn scenario_catalog(&self) -> ScenarioCatalog {
        let fetched = self
            .fetch_metrics(Endpoint::Catalog)
            .await
            .and_then(|value| serde_json::from_value(value).map_err(GatewayError::decode));

        match fetched {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "Scenario listing unavailable, using built-in catalog");
                ScenarioCatalog::builtin()
            }
        }
    }
}

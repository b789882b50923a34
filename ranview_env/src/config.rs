//! Addressing and transport settings for the remote simulator host.

use crate::error::GatewayError;
use crate::types::Endpoint;
use std::time::Duration;

/// Environment variable naming the simulator host (read by the CLI).
pub const HOST_ENV_VAR: &str = "NS3_HOST";

/// Port accepting start commands (and serving the scenario listing).
pub const CONTROL_PORT: u16 = 38866;

/// Port accepting stop commands.
pub const STOP_PORT: u16 = 38867;

/// Port serving live telemetry.
pub const TELEMETRY_PORT: u16 = 38868;

/// Configuration for a simulator gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Simulator host name or IP (no scheme, no port)
    pub host: String,

    /// Control channel port (default: 38866)
    pub control_port: u16,

    /// Stop channel port (default: 38867)
    pub stop_port: u16,

    /// Telemetry port (default: 38868)
    pub telemetry_port: u16,

    /// Per-request timeout (default: 5s)
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            control_port: CONTROL_PORT,
            stop_port: STOP_PORT,
            telemetry_port: TELEMETRY_PORT,
            timeout: Duration::from_secs(5),
        }
    }
}

impl GatewayConfig {
    /// Creates a config for the given host with default ports.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the telemetry port.
    pub fn with_telemetry_port(mut self, port: u16) -> Self {
        self.telemetry_port = port;
        self
    }

    /// Checks the host is usable.
    pub fn validated(self) -> Result<Self, GatewayError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(GatewayError::Config("simulator host is empty".to_string()));
        }
        if host.contains("://") || host.contains('/') {
            return Err(GatewayError::Config(format!(
                "simulator host must be a bare host name, got {:?}",
                host
            )));
        }
        Ok(self)
    }

    /// Port serving the given endpoint.
    pub fn port(&self, endpoint: Endpoint) -> u16 {
        match endpoint {
            Endpoint::Control | Endpoint::Catalog => self.control_port,
            Endpoint::Stop => self.stop_port,
            Endpoint::Telemetry => self.telemetry_port,
        }
    }

    /// Full URL of the given endpoint.
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("http://{}:{}", self.host.trim(), self.port(endpoint))
    }
}

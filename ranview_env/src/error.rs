//! Error types for the remote simulator gateway.

use thiserror::Error;

/// Errors that can occur talking to the remote simulator.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure (connection refused, DNS, reset, ...)
    #[error("Simulator unreachable: {0}")]
    Unreachable(String),

    /// Request exceeded the configured timeout
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Remote answered with a non-success HTTP status
    #[error("Simulator rejected request with status {status}")]
    Rejected { status: u16 },

    /// Response body was not the JSON shape we expected
    #[error("Decode error: {0}")]
    Decode(String),

    /// Gateway configuration is unusable (missing host, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Creates an unreachable error.
    pub fn unreachable(msg: impl std::fmt::Display) -> Self {
        Self::Unreachable(msg.to_string())
    }

    /// Creates a decode error.
    pub fn decode(msg: impl std::fmt::Display) -> Self {
        Self::Decode(msg.to_string())
    }

    /// True for transport-level failures (no answer from the simulator).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Timeout(_))
    }

    /// True when the simulator answered but refused the request.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

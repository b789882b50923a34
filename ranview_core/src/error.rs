//! Error types for the RanView core.

use thiserror::Error;

/// Errors constructing the simulation model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Entity counts outside the representable range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors rejected by the lifecycle controller before any side effect.
///
/// Remote failures never show up here: they are reported through
/// `RemoteAck` on the returned transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Missing or malformed request input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ControllerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

impl From<ModelError> for ControllerError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidParameter(msg) => Self::InvalidParameter(msg),
        }
    }
}

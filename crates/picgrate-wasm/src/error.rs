//! Error types for grating coupler construction.

use thiserror::Error;

/// Errors that can occur while building grating coupler geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GratingError {
    /// A construction parameter is out of range or an unknown tag was given.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A geometry operation has no valid output for the given inputs.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The option object passed across the wasm boundary could not be decoded.
    #[error("config error: {0}")]
    Config(String),
}

impl GratingError {
    /// Shorthand for [`GratingError::InvalidParameter`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

//! Error types for the simulation framework

use crate::SimTime;
use thiserror::Error;

/// Invalid model or topology parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Field '{field}' must be {constraint} (got {value})")]
    ConstraintViolation {
        field: &'static str,
        constraint: &'static str,
        value: f64,
    },
}

impl ParameterError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ParameterError::ConstraintViolation { field, .. } => field,
        }
    }
}

/// Top-level error type for simulation operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid parameter: {0}")]
    Parameter(#[from] ParameterError),

    #[error("Cannot advance to {target}: clock is already at {clock}")]
    TemporalOrder { target: SimTime, clock: SimTime },

    #[error("Cannot advance to non-finite target time {target}")]
    NonFiniteTarget { target: SimTime },

    #[error("Simulation has already been started")]
    AlreadyStarted,
}

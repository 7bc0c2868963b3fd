//! Engine configuration

use crate::history::{
    DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_INTERVAL, DEFAULT_WAIT_SAMPLE_CAPACITY,
};
use crate::validate::{validate_positive, ValidationResult};
use serde::{Deserialize, Serialize};

/// Knobs of a simulation run that are not part of the queueing model itself.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the model's random streams; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Minimum simulated time between history samples
    pub history_interval: f64,
    /// Number of history samples retained
    pub history_capacity: usize,
    /// Number of completed wait times retained
    pub wait_sample_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            history_interval: DEFAULT_HISTORY_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            wait_sample_capacity: DEFAULT_WAIT_SAMPLE_CAPACITY,
        }
    }
}

impl SimulationConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_positive("history_interval", self.history_interval)?;
        Ok(())
    }
}

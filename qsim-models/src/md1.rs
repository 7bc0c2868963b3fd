//! M/D/1: Poisson arrivals, one server with a fixed service duration

use crate::result::{AnalyticalResult, DISPLAY_STATES};
use crate::{exponential_variate, QueueModel};
use qsim_core::validate::{validate_positive, ValidationResult};
use qsim_core::{
    DeterministicVariate, SimError, Simulation, SimulationConfig, Topology, Variate,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MD1 {
    /// Arrival rate λ
    pub lambda: f64,
    /// Fixed service duration D
    pub service_time: f64,
}

/// Pollaczek-Khinchine metrics with zero service-time variance.
///
/// There is no simple closed form for the M/D/1 state distribution; the
/// listed one is a display approximation,
/// `P(n) ∝ (1-ρ)·ρⁿ·(1 + n(1-ρ)/2)` clamped to `[0, 1]` and renormalized
/// over `n = 0..=20`.
pub fn analytical_results(params: &MD1) -> ValidationResult<AnalyticalResult> {
    let lambda = validate_positive("lambda", params.lambda)?;
    let d = validate_positive("service_time", params.service_time)?;
    let rho = lambda * d;
    if rho >= 1.0 {
        return Ok(AnalyticalResult::unstable(rho));
    }

    let lq = rho * rho / (2.0 * (1.0 - rho));
    let wq = lq / lambda;
    let w = wq + d;
    let l = lambda * w;

    let p0 = 1.0 - rho;
    let raw: Vec<f64> = (0..=DISPLAY_STATES)
        .map(|n| {
            let p = if n == 0 {
                p0
            } else {
                p0 * rho.powi(n as i32) * (1.0 + n as f64 * (1.0 - rho) * 0.5)
            };
            p.clamp(0.0, 1.0)
        })
        .collect();
    let total: f64 = raw.iter().sum();

    Ok(AnalyticalResult::stable(rho, l, lq, w, wq)
        .with_probabilities(raw.into_iter().map(|p| p / total)))
}

pub fn create_simulation(params: &MD1, config: SimulationConfig) -> Result<Simulation, SimError> {
    params.create_simulation(config)
}

impl QueueModel for MD1 {
    fn name(&self) -> &'static str {
        "M/D/1"
    }

    fn topology(&self) -> ValidationResult<Topology> {
        Ok(Topology::single_server())
    }

    fn arrival_variate(&self, seed: Option<u64>) -> ValidationResult<Box<dyn Variate>> {
        exponential_variate(self.lambda, seed)
    }

    /// Deterministic service ignores the seed
    fn service_variate(&self, _seed: Option<u64>) -> ValidationResult<Box<dyn Variate>> {
        Ok(Box::new(DeterministicVariate::new(self.service_time)?))
    }

    fn analytical_results(&self) -> ValidationResult<AnalyticalResult> {
        analytical_results(self)
    }
}

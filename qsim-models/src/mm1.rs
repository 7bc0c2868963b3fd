//! M/M/1: Poisson arrivals, one exponential server, unbounded line

use crate::result::{AnalyticalResult, DISPLAY_STATES};
use crate::{exponential_variate, QueueModel};
use qsim_core::validate::{validate_positive, ValidationResult};
use qsim_core::{SimError, Simulation, SimulationConfig, Topology, Variate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MM1 {
    /// Arrival rate λ
    pub lambda: f64,
    /// Service rate μ
    pub mu: f64,
}

/// Steady-state metrics; `rho >= 1` yields an unstable result.
///
/// The distribution lists `P(n) = (1-ρ)ρⁿ` for `n = 0..=20` and is not
/// renormalized, so its mass is slightly below one.
pub fn analytical_results(params: &MM1) -> ValidationResult<AnalyticalResult> {
    let lambda = validate_positive("lambda", params.lambda)?;
    let mu = validate_positive("mu", params.mu)?;
    let rho = lambda / mu;
    if rho >= 1.0 {
        return Ok(AnalyticalResult::unstable(rho));
    }

    let l = rho / (1.0 - rho);
    let lq = rho * rho / (1.0 - rho);
    let w = 1.0 / (mu - lambda);
    let wq = rho / (mu - lambda);
    let probabilities = (0..=DISPLAY_STATES).map(|n| (1.0 - rho) * rho.powi(n as i32));

    Ok(AnalyticalResult::stable(rho, l, lq, w, wq).with_probabilities(probabilities))
}

pub fn create_simulation(params: &MM1, config: SimulationConfig) -> Result<Simulation, SimError> {
    params.create_simulation(config)
}

impl QueueModel for MM1 {
    fn name(&self) -> &'static str {
        "M/M/1"
    }

    fn topology(&self) -> ValidationResult<Topology> {
        Ok(Topology::single_server())
    }

    fn arrival_variate(&self, seed: Option<u64>) -> ValidationResult<Box<dyn Variate>> {
        exponential_variate(self.lambda, seed)
    }

    fn service_variate(&self, seed: Option<u64>) -> ValidationResult<Box<dyn Variate>> {
        exponential_variate(self.mu, seed)
    }

    fn analytical_results(&self) -> ValidationResult<AnalyticalResult> {
        analytical_results(self)
    }
}

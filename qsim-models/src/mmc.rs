//! M/M/c: Poisson arrivals, `c` identical exponential servers, unbounded line

use crate::result::{log_birth_death_weights, log_sum_exp, AnalyticalResult, DISPLAY_STATES};
use crate::{exponential_variate, QueueModel};
use qsim_core::validate::{validate_positive, validate_positive_count, ValidationResult};
use qsim_core::{Capacity, SimError, Simulation, SimulationConfig, Topology, Variate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MMC {
    /// Arrival rate λ
    pub lambda: f64,
    /// Service rate μ of each server
    pub mu: f64,
    /// Number of servers c
    pub servers: usize,
}

/// Erlang-C steady-state metrics; `λ/(cμ) >= 1` yields an unstable result.
///
/// `erlang_factor` carries the probability that an arrival has to wait.
/// The state weights `aⁿ/n!` and `aⁿ/(c!·c^(n-c))` are summed in log space,
/// so offered loads far beyond `e^709` stay finite.
pub fn analytical_results(params: &MMC) -> ValidationResult<AnalyticalResult> {
    let lambda = validate_positive("lambda", params.lambda)?;
    let mu = validate_positive("mu", params.mu)?;
    let c = validate_positive_count("servers", params.servers)?;
    let rho = lambda / (c as f64 * mu);
    if rho >= 1.0 {
        return Ok(AnalyticalResult::unstable(rho));
    }

    let a = lambda / mu;
    let weights = log_birth_death_weights(a, c, c.max(DISPLAY_STATES));
    // States n >= c form a geometric tail with ratio rho
    let ln_waiting = weights[c] - (1.0 - rho).ln();
    let mut ln_terms = weights[..c].to_vec();
    ln_terms.push(ln_waiting);
    let ln_p0 = -log_sum_exp(&ln_terms);
    let erlang_c = (ln_waiting + ln_p0).exp();

    let lq = erlang_c * rho / (1.0 - rho);
    let wq = lq / lambda;
    let w = wq + 1.0 / mu;
    let l = lambda * w;
    let probabilities = weights[..=DISPLAY_STATES].iter().map(|weight| (weight + ln_p0).exp());

    Ok(AnalyticalResult::stable(rho, l, lq, w, wq)
        .with_erlang_factor(erlang_c)
        .with_probabilities(probabilities))
}

pub fn create_simulation(params: &MMC, config: SimulationConfig) -> Result<Simulation, SimError> {
    params.create_simulation(config)
}

impl QueueModel for MMC {
    fn name(&self) -> &'static str {
        "M/M/c"
    }

    fn topology(&self) -> ValidationResult<Topology> {
        Topology::new(self.servers, Capacity::Unbounded)
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

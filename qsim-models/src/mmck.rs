//! M/M/c/K: `c` exponential servers, at most `K` entities in the system

use crate::result::{log_birth_death_weights, normalize_log_weights, validate_capacity, AnalyticalResult};
use crate::{exponential_variate, QueueModel};
use qsim_core::validate::{validate_positive, validate_positive_count, ValidationResult};
use qsim_core::{Capacity, SimError, Simulation, SimulationConfig, Topology, Variate};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MMCK {
    /// Arrival rate λ
    pub lambda: f64,
    /// Service rate μ of each server
    pub mu: f64,
    /// Number of servers c
    pub servers: usize,
    /// System capacity K (waiting plus in service)
    pub capacity: usize,
}

/// Finite birth-death chain over `0..=K`; always stable.
///
/// `L` is `Σ n·P(n)`, the expected number of busy servers is
/// `Σ min(n, c)·P(n)` and `Lq` is their difference. Blocking and the
/// effective arrival rate work as in M/M/1/K.
pub fn analytical_results(params: &MMCK) -> ValidationResult<AnalyticalResult> {
    let lambda = validate_positive("lambda", params.lambda)?;
    let mu = validate_positive("mu", params.mu)?;
    let c = validate_positive_count("servers", params.servers)?;
    let k = validate_capacity(params.capacity)?;
    let a = lambda / mu;
    let rho = lambda / (c as f64 * mu);

    let probabilities = normalize_log_weights(&log_birth_death_weights(a, c, k));
    let pk = probabilities[k];
    let lambda_eff = lambda * (1.0 - pk);

    let (l, busy) = probabilities
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(l, busy), (n, p)| {
            (l + n as f64 * p, busy + n.min(c) as f64 * p)
        });
    let lq = l - busy;
    let (w, wq) = if lambda_eff > 0.0 {
        (l / lambda_eff, lq / lambda_eff)
    } else {
        (0.0, 0.0)
    };
    trace!(rho, servers = c, k, pk, busy, "M/M/c/K solved");

    Ok(AnalyticalResult::stable(rho, l, lq.max(0.0), w, wq.max(0.0))
        .with_rejection_prob(pk)
        .with_probabilities(probabilities))
}

pub fn create_simulation(params: &MMCK, config: SimulationConfig) -> Result<Simulation, SimError> {
    params.create_simulation(config)
}

impl QueueModel for MMCK {
    fn name(&self) -> &'static str {
        "M/M/c/K"
    }

    fn topology(&self) -> ValidationResult<Topology> {
        Topology::new(self.servers, Capacity::finite(self.capacity)?)
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

//! M/M/1/K: one exponential server, at most `K` entities in the system

use crate::result::{validate_capacity, AnalyticalResult};
use crate::{exponential_variate, QueueModel};
use qsim_core::validate::{validate_positive, ValidationResult};
use qsim_core::{Capacity, SimError, Simulation, SimulationConfig, Topology, Variate};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Distance from `rho = 1` below which the uniform special case is used
const UNIT_LOAD_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MM1K {
    /// Arrival rate λ
    pub lambda: f64,
    /// Service rate μ
    pub mu: f64,
    /// System capacity K (waiting plus in service)
    pub capacity: usize,
}

/// Truncated geometric distribution over `0..=k` and the mean number in system.
///
/// For `rho > 1` both are evaluated through `r = 1/rho`, which is the same
/// algebra but keeps `rho^(k+1)` from overflowing.
fn distribution(rho: f64, k: usize) -> (Vec<f64>, f64) {
    let states = k + 1;
    if (rho - 1.0).abs() < UNIT_LOAD_TOLERANCE {
        let p = 1.0 / states as f64;
        return (vec![p; states], k as f64 / 2.0);
    }

    let kf = k as f64;
    if rho < 1.0 {
        let tail = rho.powf(kf + 1.0);
        let p0 = (1.0 - rho) / (1.0 - tail);
        let probabilities = (0..states).map(|n| p0 * rho.powf(n as f64)).collect();
        let l = rho / (1.0 - rho) - (kf + 1.0) * tail / (1.0 - tail);
        (probabilities, l)
    } else {
        let r = 1.0 / rho;
        let r_tail = r.powf(kf + 1.0);
        // P(n) = P(K) r^(K-n) with P(K) = (1-r)/(1-r^(K+1))
        let pk = (1.0 - r) / (1.0 - r_tail);
        let probabilities = (0..states).map(|n| pk * r.powf((k - n) as f64)).collect();
        let l = rho / (1.0 - rho) + (kf + 1.0) / (1.0 - r_tail);
        (probabilities, l)
    }
}

/// Finite-capacity metrics; always stable.
///
/// `rejection_prob` is `P(K)`. Times use the effective arrival rate
/// `λ(1 - P(K))` and are zero when nothing gets in.
pub fn analytical_results(params: &MM1K) -> ValidationResult<AnalyticalResult> {
    let lambda = validate_positive("lambda", params.lambda)?;
    let mu = validate_positive("mu", params.mu)?;
    let k = validate_capacity(params.capacity)?;
    let rho = lambda / mu;

    let (probabilities, l) = distribution(rho, k);
    let p0 = probabilities[0];
    let pk = probabilities[k];
    let lambda_eff = lambda * (1.0 - pk);
    let lq = l - (1.0 - p0);
    let (w, wq) = if lambda_eff > 0.0 {
        (l / lambda_eff, lq / lambda_eff)
    } else {
        (0.0, 0.0)
    };
    trace!(rho, k, pk, lambda_eff, "M/M/1/K solved");

    Ok(AnalyticalResult::stable(rho, l, lq.max(0.0), w, wq.max(0.0))
        .with_rejection_prob(pk)
        .with_probabilities(probabilities))
}

pub fn create_simulation(params: &MM1K, config: SimulationConfig) -> Result<Simulation, SimError> {
    params.create_simulation(config)
}

impl QueueModel for MM1K {
    fn name(&self) -> &'static str {
        "M/M/1/K"
    }

    fn topology(&self) -> ValidationResult<Topology> {
        Topology::new(1, Capacity::finite(self.capacity)?)
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

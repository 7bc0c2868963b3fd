//! Steady-state result record shared by every model

use qsim_core::validate::ValidationResult;
use qsim_core::ParameterError;
use serde::{Deserialize, Serialize};

/// Number of states listed for models without a capacity limit (`n = 0..=20`)
pub const DISPLAY_STATES: usize = 20;

/// Largest system capacity the finite-capacity models accept
pub const MAX_CAPACITY: usize = 1 << 20;

/// Warning attached to infinite-capacity results with `rho >= 1`
pub const UNSTABLE_WARNING: &str = "System is unstable (ρ ≥ 1). Queue will grow without bound.";

/// Long-run probability of finding exactly `n` entities in the system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityPoint {
    pub n: usize,
    pub probability: f64,
}

/// Closed-form steady-state metrics of one model.
///
/// Scalars are rounded to four decimals; probability entries are not.
/// Infinite metrics of an unstable system serialize as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticalResult {
    /// Utilization
    pub rho: f64,
    pub stable: bool,
    /// Mean number in system
    #[serde(rename = "L")]
    pub l: f64,
    /// Mean number waiting
    #[serde(rename = "Lq")]
    pub lq: f64,
    /// Mean time in system
    #[serde(rename = "W")]
    pub w: f64,
    /// Mean time waiting
    #[serde(rename = "Wq")]
    pub wq: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
    /// Blocking probability of finite-capacity models
    #[serde(
        rename = "rejectionProb",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub rejection_prob: Option<f64>,
    /// Erlang-C probability of waiting, multi-server models
    #[serde(
        rename = "erlangFactor",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub erlang_factor: Option<f64>,
    #[serde(default)]
    pub probabilities: Vec<ProbabilityPoint>,
}

impl AnalyticalResult {
    /// Result for a queue that grows without bound: infinite metrics, a
    /// warning and no distribution.
    pub fn unstable(rho: f64) -> Self {
        Self {
            rho: round4(rho),
            stable: false,
            l: f64::INFINITY,
            lq: f64::INFINITY,
            w: f64::INFINITY,
            wq: f64::INFINITY,
            warning: Some(UNSTABLE_WARNING.to_string()),
            rejection_prob: None,
            erlang_factor: None,
            probabilities: Vec::new(),
        }
    }

    /// Stable result from raw (unrounded) metrics
    pub(crate) fn stable(rho: f64, l: f64, lq: f64, w: f64, wq: f64) -> Self {
        Self {
            rho: round4(rho),
            stable: true,
            l: round4(l),
            lq: round4(lq),
            w: round4(w),
            wq: round4(wq),
            warning: None,
            rejection_prob: None,
            erlang_factor: None,
            probabilities: Vec::new(),
        }
    }

    pub(crate) fn with_probabilities(mut self, probabilities: impl IntoIterator<Item = f64>) -> Self {
        self.probabilities = probabilities
            .into_iter()
            .enumerate()
            .map(|(n, probability)| ProbabilityPoint { n, probability })
            .collect();
        self
    }

    pub(crate) fn with_rejection_prob(mut self, p: f64) -> Self {
        self.rejection_prob = Some(round4(p));
        self
    }

    pub(crate) fn with_erlang_factor(mut self, c: f64) -> Self {
        self.erlang_factor = Some(round4(c));
        self
    }

    /// Sum of the listed state probabilities
    pub fn probability_mass(&self) -> f64 {
        self.probabilities.iter().map(|p| p.probability).sum()
    }

    /// Probability of state `n`, if listed
    pub fn probability(&self, n: usize) -> Option<f64> {
        self.probabilities.get(n).map(|p| p.probability)
    }
}

/// Round to four decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Birth-death state weights for `servers` parallel servers at offered
/// load `a = lambda/mu`, states `0..=last`, kept in log space.
///
/// `w(0) = 0` and `w(n) = w(n-1) + ln a - ln min(n, servers)`, which is
/// `ln(a^n / n!)` below `servers` and `ln(a^n / (c! c^(n-c)))` from there on.
pub(crate) fn log_birth_death_weights(a: f64, servers: usize, last: usize) -> Vec<f64> {
    let ln_a = a.ln();
    let mut weights = Vec::with_capacity(last + 1);
    let mut w = 0.0;
    weights.push(w);
    for n in 1..=last {
        w += ln_a - (n.min(servers) as f64).ln();
        weights.push(w);
    }
    weights
}

/// `ln Σ exp(w)` without overflowing on large weights
pub(crate) fn log_sum_exp(weights: &[f64]) -> f64 {
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max + weights.iter().map(|w| (w - max).exp()).sum::<f64>().ln()
}

/// Turn log weights into a distribution summing to one
pub(crate) fn normalize_log_weights(weights: &[f64]) -> Vec<f64> {
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scaled: Vec<f64> = weights.iter().map(|w| (w - max).exp()).collect();
    let total: f64 = scaled.iter().sum();
    scaled.into_iter().map(|p| p / total).collect()
}

/// Capacity check for the finite models: the distribution lists `K + 1` states
pub(crate) fn validate_capacity(capacity: usize) -> ValidationResult<usize> {
    if capacity > MAX_CAPACITY {
        Err(ParameterError::ConstraintViolation {
            field: "capacity",
            constraint: "at most 1048576",
            value: capacity as f64,
        })
    } else {
        Ok(capacity)
    }
}

//! Random variate sources for interarrival and service times
//!
//! The engine consumes durations through the [`Variate`] capability: a single
//! no-argument operation returning a real. Any `FnMut() -> f64` closure is a
//! `Variate`, so callers can inject arbitrary generators; the exponential and
//! deterministic sources used by the classical models are provided here.

use crate::validate::{validate_positive, ValidationResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Smallest duration the engine will schedule.
///
/// Degenerate non-positive samples are clamped up to this value.
pub const MIN_SAMPLE: f64 = 1e-9;

/// Trait for sampling durations (interarrival gaps or service times)
pub trait Variate: Send {
    /// Draw the next duration. Well-behaved sources return a finite positive value.
    fn sample(&mut self) -> f64;
}

impl<F> Variate for F
where
    F: FnMut() -> f64 + Send,
{
    fn sample(&mut self) -> f64 {
        self()
    }
}

/// Exponential variate with rate `rate` by inverse-CDF sampling: `-ln(1 - U) / rate`.
///
/// `U` is uniform on `[0, 1)`, so `1 - U` is never zero and the result is
/// finite for the generators used here. A uniform source that can return
/// exactly 1 would yield `+inf`; the engine guards against that (see
/// [`sanitize_sample`]).
pub fn exponential<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> f64 {
    let u: f64 = rng.gen();
    -(1.0 - u).ln() / rate
}

/// Deterministic "random" variate, always `value`
pub fn deterministic(value: f64) -> f64 {
    value
}

/// Exponentially distributed durations (Poisson process gaps)
#[derive(Debug, Clone)]
pub struct ExponentialVariate {
    /// Rate parameter - average events per unit time
    rate: f64,
    rng: ChaCha8Rng,
}

impl ExponentialVariate {
    /// Create an exponential source seeded from OS entropy
    pub fn new(rate: f64) -> ValidationResult<Self> {
        let rate = validate_positive("rate", rate)?;
        Ok(Self {
            rate,
            rng: ChaCha8Rng::from_entropy(),
        })
    }

    /// Create a reproducible exponential source
    pub fn with_seed(rate: f64, seed: u64) -> ValidationResult<Self> {
        let rate = validate_positive("rate", rate)?;
        Ok(Self {
            rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mean duration (1/rate)
    pub fn mean(&self) -> f64 {
        1.0 / self.rate
    }
}

impl Variate for ExponentialVariate {
    fn sample(&mut self) -> f64 {
        exponential(self.rate, &mut self.rng)
    }
}

/// Fixed-duration source, used for M/D/1-style service
#[derive(Debug, Clone, Copy)]
pub struct DeterministicVariate {
    value: f64,
}

impl DeterministicVariate {
    pub fn new(value: f64) -> ValidationResult<Self> {
        let value = validate_positive("value", value)?;
        Ok(Self { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Variate for DeterministicVariate {
    fn sample(&mut self) -> f64 {
        deterministic(self.value)
    }
}

/// What the engine does with a raw generator sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Finite and positive, used unchanged
    Valid(f64),
    /// NaN, zero, negative or `-inf`; replaced by [`MIN_SAMPLE`]
    Clamped(f64),
    /// `+inf`; the event would never fire and is not scheduled
    Rejected,
}

impl SampleOutcome {
    /// Whether the raw sample was degenerate
    pub fn is_degenerate(&self) -> bool {
        !matches!(self, SampleOutcome::Valid(_))
    }

    /// Duration to schedule, if any
    pub fn duration(&self) -> Option<f64> {
        match *self {
            SampleOutcome::Valid(d) | SampleOutcome::Clamped(d) => Some(d),
            SampleOutcome::Rejected => None,
        }
    }
}

/// Classify a raw sample according to the degeneracy policy
pub fn sanitize_sample(raw: f64) -> SampleOutcome {
    if raw == f64::INFINITY {
        SampleOutcome::Rejected
    } else if raw.is_finite() && raw > 0.0 {
        SampleOutcome::Valid(raw)
    } else {
        SampleOutcome::Clamped(MIN_SAMPLE)
    }
}

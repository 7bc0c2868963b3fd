//! Analytical reference models for queueing stations.
//!
//! Each module covers one classical model with a parameter struct, a pure
//! `analytical_results` function computing closed-form steady-state metrics,
//! and a `create_simulation` function building a matching
//! [`qsim_core::Simulation`]. The [`QueueModel`] trait ties the two views of
//! a model together so a driver can run the simulation and compare it
//! against the formulas.
//!
//! | Model | Servers | Capacity | Service |
//! |-------|---------|----------|---------|
//! | [`MM1`] | 1 | unbounded | exponential |
//! | [`MMC`] | c | unbounded | exponential |
//! | [`MD1`] | 1 | unbounded | deterministic |
//! | [`MM1K`] | 1 | K | exponential |
//! | [`MMCK`] | c | K | exponential |
//!
//! ```rust
//! use qsim_models::{mm1, MM1};
//!
//! let result = mm1::analytical_results(&MM1 { lambda: 2.0, mu: 3.0 }).unwrap();
//! assert!(result.stable);
//! assert_eq!(result.l, 2.0);
//! ```

use qsim_core::ids::{derive_stream_seed, STREAM_DOMAIN_ARRIVAL, STREAM_DOMAIN_SERVICE};
use qsim_core::validate::ValidationResult;
use qsim_core::{
    ExponentialVariate, SimError, Simulation, SimulationConfig, Topology, Variate,
};
use tracing::debug;

pub mod md1;
pub mod mm1;
pub mod mm1k;
pub mod mmc;
pub mod mmck;
pub mod result;

pub use md1::MD1;
pub use mm1::MM1;
pub use mm1k::MM1K;
pub use mmc::MMC;
pub use mmck::MMCK;
pub use result::{round4, AnalyticalResult, ProbabilityPoint, MAX_CAPACITY, UNSTABLE_WARNING};

/// A queueing model with both a closed-form and a simulated view
pub trait QueueModel {
    /// Kendall notation, e.g. `"M/M/1"`
    fn name(&self) -> &'static str;

    /// Station layout the simulation runs on
    fn topology(&self) -> ValidationResult<Topology>;

    /// Interarrival sampler; `seed` makes it reproducible
    fn arrival_variate(&self, seed: Option<u64>) -> ValidationResult<Box<dyn Variate>>;

    /// Service-time sampler; `seed` makes it reproducible
    fn service_variate(&self, seed: Option<u64>) -> ValidationResult<Box<dyn Variate>>;

    fn analytical_results(&self) -> ValidationResult<AnalyticalResult>;

    /// Build an idle simulation of this model.
    ///
    /// With `config.seed` set, the arrival and service streams get distinct
    /// seeds derived from it, so the whole run is reproducible.
    fn create_simulation(&self, config: SimulationConfig) -> Result<Simulation, SimError> {
        let arrival_seed = config
            .seed
            .map(|seed| derive_stream_seed(seed, STREAM_DOMAIN_ARRIVAL));
        let service_seed = config
            .seed
            .map(|seed| derive_stream_seed(seed, STREAM_DOMAIN_SERVICE));
        debug!(model = self.name(), seed = ?config.seed, "Creating simulation");
        Simulation::from_boxed(
            self.topology()?,
            self.arrival_variate(arrival_seed)?,
            self.service_variate(service_seed)?,
            config,
        )
    }
}

/// Exponential sampler, seeded or from entropy
pub(crate) fn exponential_variate(
    rate: f64,
    seed: Option<u64>,
) -> ValidationResult<Box<dyn Variate>> {
    let variate = match seed {
        Some(seed) => ExponentialVariate::with_seed(rate, seed)?,
        None => ExponentialVariate::new(rate)?,
    };
    Ok(Box::new(variate))
}

//! Core discrete-event engine for queueing stations.
//!
//! This crate provides the building blocks of a queueing simulation:
//! simulation time, random variate sources, a time-ordered event queue and
//! the [`Simulation`] engine that moves entities through a multi-server FIFO
//! station with optional finite capacity.
//!
//! # Basic Usage
//!
//! ```rust
//! use qsim_core::{Simulation, SimulationConfig, Topology, ExponentialVariate};
//!
//! let arrivals = ExponentialVariate::with_seed(2.0, 1).unwrap();
//! let service = ExponentialVariate::with_seed(3.0, 2).unwrap();
//! let mut sim = Simulation::new(
//!     Topology::single_server(),
//!     arrivals,
//!     service,
//!     SimulationConfig::default(),
//! )
//! .unwrap();
//!
//! sim.start().unwrap();
//! sim.advance_to(100.0).unwrap();
//! let snapshot = sim.snapshot();
//! assert!(snapshot.served + snapshot.rejected <= snapshot.total_arrivals);
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], a continuous simulation clock with no
//! relation to wall-clock time. The driver decides how fast simulated time
//! passes by choosing the targets it hands to [`Simulation::advance_to`].
//!
//! # Concurrency
//!
//! A `Simulation` is a single-writer object: `advance_to` takes `&mut self`
//! and runs synchronously to completion.

pub mod config;
pub mod dists;
pub mod engine;
pub mod error;
pub mod history;
pub mod ids;
pub mod logging;
pub mod metrics;
pub mod scheduler;
pub mod time;
pub mod topology;
pub mod types;
pub mod validate;

pub use config::SimulationConfig;
pub use dists::{
    deterministic, exponential, sanitize_sample, DeterministicVariate, ExponentialVariate,
    SampleOutcome, Variate, MIN_SAMPLE,
};
pub use engine::{Counters, Entity, EntityState, Server, ServingEntity, Simulation, Snapshot};
pub use error::{ParameterError, SimError};
pub use history::{BoundedSeries, HistorySample};
pub use logging::{init_simulation_logging, init_simulation_logging_with_level, simulation_span};
pub use scheduler::{Event, EventKind, EventQueue};
pub use time::SimTime;
pub use topology::{Capacity, Topology};
pub use types::{EntityId, ServerId};

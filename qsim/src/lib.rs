//! # qsim - Queueing Simulation and Analytical Models
//!
//! qsim runs discrete-event simulations of multi-server FIFO queueing
//! stations and computes the closed-form steady-state metrics of the same
//! models, so the two can be compared side by side.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! qsim = "0.1"
//! ```
//!
//! ```rust
//! use qsim::prelude::*;
//!
//! let model = MM1 { lambda: 2.0, mu: 3.0 };
//! let reference = model.analytical_results().unwrap();
//!
//! let mut sim = model.create_simulation(SimulationConfig::seeded(42)).unwrap();
//! sim.start().unwrap();
//! sim.advance_to(1_000.0).unwrap();
//!
//! let snapshot = sim.snapshot();
//! assert!(snapshot.served > 0);
//! assert_eq!(reference.l, 2.0);
//! ```
//!
//! ## Crates
//!
//! - [`core`]: simulation time, random variates, event queue and engine
//! - [`models`]: M/M/1, M/M/c, M/D/1, M/M/1/K and M/M/c/K formulas

pub use qsim_core as core;

pub use qsim_models as models;

// Convenience re-exports of commonly used items
pub mod prelude {
    //! Commonly used types and traits

    pub use qsim_core::{
        Capacity, DeterministicVariate, ExponentialVariate, HistorySample, SimError, SimTime,
        Simulation, SimulationConfig, Snapshot, Topology, Variate,
    };

    pub use qsim_models::{AnalyticalResult, QueueModel, MD1, MM1, MM1K, MMC, MMCK};
}

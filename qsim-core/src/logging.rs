//! Structured logging for queueing simulations
//!
//! The engine logs through `tracing`:
//! - **TRACE**: every processed event
//! - **DEBUG**: start of a run, rejected arrivals
//! - **WARN**: degenerate generator samples
//!
//! Set `RUST_LOG` to override the default filter, e.g.
//! `RUST_LOG=qsim_core::engine=trace`.

use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation with sensible defaults
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
///
/// Calling this more than once is harmless; only the first call installs
/// a subscriber.
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{level},qsim_core={level},qsim_models={level}").into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Create a span for tracking one simulation run
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}

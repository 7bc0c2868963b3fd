//! Simulated versus analytical steady state for every built-in model
//!
//! Each model is driven the way an animation loop would drive it: a fixed
//! frame step, scaled by a speed factor, is added to the target time and
//! the engine is asked to catch up. After the run the final snapshot is
//! printed next to the closed-form reference.
//!
//! Run with: cargo run --package qsim --example compare_models
//!
//! Use `RUST_LOG=qsim_core=debug` to see rejected arrivals.

use qsim::core::init_simulation_logging;
use qsim::prelude::*;
use serde_json::json;
use tracing::info;

/// Real seconds per frame of the imagined animation loop
const FRAME_SECONDS: f64 = 1.0 / 60.0;

/// Simulated seconds per real second
const SPEED: f64 = 50.0;

/// Number of frames to run each model for
const FRAMES: usize = 6_000;

fn run(model: &dyn QueueModel, seed: u64) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let reference = model.analytical_results()?;
    let mut sim = model.create_simulation(SimulationConfig::seeded(seed))?;
    sim.start()?;

    let mut target = 0.0;
    for _ in 0..FRAMES {
        target += FRAME_SECONDS * SPEED;
        sim.advance_to(target)?;
    }

    let snapshot = sim.snapshot();
    info!(
        model = model.name(),
        clock = %snapshot.clock,
        served = snapshot.served,
        rejected = snapshot.rejected,
        avg_system_time = snapshot.avg_system_time,
        reference_w = reference.w,
        "Run finished"
    );

    Ok(json!({
        "model": model.name(),
        "analytical": reference,
        "simulated": {
            "clock": snapshot.clock,
            "served": snapshot.served,
            "rejected": snapshot.rejected,
            "totalArrivals": snapshot.total_arrivals,
            "avgWait": snapshot.avg_wait,
            "avgSystemTime": snapshot.avg_system_time,
            "avgQueueLength": snapshot.avg_queue_length,
            "avgSystemLength": snapshot.avg_system_length,
            "degenerateSamples": snapshot.degenerate_samples,
        },
    }))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_simulation_logging();

    let models: Vec<Box<dyn QueueModel>> = vec![
        Box::new(MM1 { lambda: 2.0, mu: 3.0 }),
        Box::new(MMC { lambda: 5.0, mu: 2.0, servers: 3 }),
        Box::new(MD1 { lambda: 0.8, service_time: 1.0 }),
        Box::new(MM1K { lambda: 3.0, mu: 2.0, capacity: 5 }),
        Box::new(MMCK { lambda: 6.0, mu: 2.0, servers: 2, capacity: 6 }),
    ];

    let mut results = Vec::with_capacity(models.len());
    for (i, model) in models.iter().enumerate() {
        results.push(run(model.as_ref(), 1_000 + i as u64)?);
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

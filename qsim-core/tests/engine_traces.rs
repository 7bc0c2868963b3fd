//! End-to-end traces of the engine with deterministic and seeded generators.

use qsim_core::{
    Capacity, EntityId, ExponentialVariate, SimTime, Simulation, SimulationConfig, Snapshot,
    Topology, Variate,
};

fn constant(value: f64) -> impl Variate {
    move || value
}

fn busy(snapshot: &Snapshot) -> usize {
    snapshot.servers.iter().filter(|s| s.busy).count()
}

#[test]
fn single_server_deterministic_trace() {
    let mut sim = Simulation::new(
        Topology::single_server(),
        constant(1.0),
        constant(0.5),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();

    sim.advance_to(1.0).unwrap();
    let snap = sim.snapshot();
    assert_eq!(snap.total_arrivals, 1);
    assert_eq!(snap.system_length, 1);
    assert_eq!(snap.queue_length, 0);
    assert!(snap.servers[0].busy);

    sim.advance_to(1.5).unwrap();
    let snap = sim.snapshot();
    assert_eq!(snap.served, 1);
    assert_eq!(snap.system_length, 0);

    sim.advance_to(2.0).unwrap();
    assert!(sim.snapshot().servers[0].busy);
    sim.advance_to(2.5).unwrap();
    assert_eq!(sim.snapshot().served, 2);

    sim.advance_to(3.0).unwrap();
    let snap = sim.snapshot();
    assert_eq!(snap.clock, SimTime::from_secs(3.0));
    assert_eq!(snap.served, 2);
    assert_eq!(snap.rejected, 0);
    // The arrival at t=3 is processed too
    assert_eq!(snap.total_arrivals, 3);
    assert_eq!(snap.avg_wait, 0.0);
    assert_eq!(snap.avg_system_time, 0.5);
}

#[test]
fn single_server_trace_in_one_call() {
    let mut sim = Simulation::new(
        Topology::single_server(),
        constant(1.0),
        constant(0.5),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();
    sim.advance_to(3.0).unwrap();

    let snap = sim.snapshot();
    assert_eq!(snap.served, 2);
    assert_eq!(snap.rejected, 0);
    assert_eq!(sim.wait_times().to_vec(), vec![0.0, 0.0]);
}

#[test]
fn full_station_rejects_arrival() {
    let topology = Topology::new(1, Capacity::Finite(1)).unwrap();
    let mut sim = Simulation::new(topology, constant(1.0), constant(2.0), SimulationConfig::default()).unwrap();
    sim.start().unwrap();

    sim.advance_to(2.0).unwrap();
    let snap = sim.snapshot();
    assert_eq!(snap.rejected, 1);
    assert_eq!(snap.total_arrivals, 2);
    assert_eq!(snap.system_length, 1);
    assert_eq!(sim.entities_in_system(), 1);
    // Rejected arrival never became an entity
    assert!(sim.entity(EntityId(1)).is_none());
    // Arrival stream keeps renewing despite the rejection
    assert_eq!(sim.next_event_time(), Some(SimTime::from_secs(3.0)));
}

#[test]
fn idle_time_advances_clock() {
    let mut sim = Simulation::new(
        Topology::single_server(),
        constant(10.0),
        constant(1.0),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();
    sim.advance_to(4.25).unwrap();
    assert_eq!(sim.clock(), SimTime::from_secs(4.25));
    assert_eq!(sim.snapshot().total_arrivals, 0);

    // Advancing to the current clock is a no-op
    sim.advance_to(4.25).unwrap();
    assert_eq!(sim.clock(), SimTime::from_secs(4.25));
}

#[test]
fn fifo_service_order() {
    let mut sim = Simulation::new(
        Topology::single_server(),
        constant(1.0),
        constant(3.0),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();

    sim.advance_to(3.5).unwrap();
    assert_eq!(sim.servers()[0].current_entity, Some(EntityId(0)));
    assert_eq!(sim.snapshot().queue_entities, vec![EntityId(1), EntityId(2)]);

    // Entity 0 leaves at 4 and the head of the line (entity 1, arrived at 2) takes over
    sim.advance_to(5.0).unwrap();
    assert_eq!(sim.servers()[0].current_entity, Some(EntityId(1)));
    assert_eq!(
        sim.snapshot().queue_entities,
        vec![EntityId(2), EntityId(3), EntityId(4)]
    );
    assert_eq!(sim.wait_times().to_vec(), vec![0.0, 2.0]);

    sim.advance_to(7.0).unwrap();
    assert_eq!(sim.servers()[0].current_entity, Some(EntityId(2)));
    assert_eq!(sim.wait_times().to_vec(), vec![0.0, 2.0, 4.0]);
}

#[test]
fn equal_timestamps_are_processed_in_scheduling_order() {
    // Arrivals every 1.0 and service of exactly 1.0: each departure coincides
    // with the next arrival. The arrival was scheduled first, so it is seen
    // first and finds the only slot taken.
    let topology = Topology::new(1, Capacity::Finite(1)).unwrap();
    let mut sim = Simulation::new(topology, constant(1.0), constant(1.0), SimulationConfig::default()).unwrap();
    sim.start().unwrap();
    sim.advance_to(5.0).unwrap();

    let snap = sim.snapshot();
    assert_eq!(snap.total_arrivals, 5);
    // Arrivals at 1, 3, 5 admitted; 2 and 4 rejected
    assert_eq!(snap.rejected, 2);
    assert_eq!(snap.served, 2);

    let replay = {
        let topology = Topology::new(1, Capacity::Finite(1)).unwrap();
        let mut sim = Simulation::new(topology, constant(1.0), constant(1.0), SimulationConfig::default()).unwrap();
        sim.start().unwrap();
        sim.advance_to(5.0).unwrap();
        sim.snapshot()
    };
    assert_eq!(snap, replay);
}

#[test]
fn events_are_processed_in_time_order() {
    let mut sim = Simulation::new(
        Topology::new(2, Capacity::Finite(6)).unwrap(),
        ExponentialVariate::with_seed(3.0, 11).unwrap(),
        ExponentialVariate::with_seed(2.0, 12).unwrap(),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();

    let mut last_clock = SimTime::zero();
    for step in 1..=200 {
        sim.advance_to(step as f64 * 0.25).unwrap();
        assert!(sim.clock() >= last_clock);
        last_clock = sim.clock();

        // Out-of-order processing would start service before arrival
        assert!(sim.wait_times().iter().all(|w| *w >= 0.0));

        let snap = sim.snapshot();
        let arrivals: Vec<SimTime> = snap
            .queue_entities
            .iter()
            .map(|id| sim.entity(*id).unwrap().arrival_time)
            .collect();
        assert!(arrivals.windows(2).all(|pair| pair[0] <= pair[1]));
        for server in &snap.servers {
            if let Some(id) = server.current_entity {
                let entity = sim.entity(id).unwrap();
                assert!(entity.service_start_time.unwrap() >= entity.arrival_time);
                assert!(entity.service_start_time.unwrap() <= sim.clock());
            }
        }
    }

    let times: Vec<SimTime> = sim.history().iter().map(|s| s.time).collect();
    assert!(!times.is_empty());
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn capacity_and_conservation_invariants_hold() {
    for (servers, capacity) in [(1, 1), (1, 3), (2, 2), (3, 5), (4, 20)] {
        let topology = Topology::new(servers, Capacity::Finite(capacity)).unwrap();
        let mut sim = Simulation::new(
            topology,
            ExponentialVariate::with_seed(5.0, 1).unwrap(),
            ExponentialVariate::with_seed(1.5, 2).unwrap(),
            SimulationConfig::default(),
        )
        .unwrap();
        sim.start().unwrap();

        for step in 1..=400 {
            sim.advance_to(step as f64 * 0.05).unwrap();
            let snap = sim.snapshot();
            assert!(snap.queue_length + busy(&snap) <= capacity);
            assert_eq!(snap.system_length, snap.queue_length + busy(&snap));
            assert!(snap.served + snap.rejected <= snap.total_arrivals);
            assert_eq!(
                snap.served + snap.rejected + snap.system_length as u64,
                snap.total_arrivals
            );
            // Work conserving: no idle server while someone waits
            if snap.queue_length > 0 {
                assert_eq!(busy(&snap), servers);
            }
        }
    }
}

#[test]
fn conservation_reaches_equality_when_drained() {
    // Arrivals stop after the third one; everything admitted eventually leaves.
    let mut gaps = vec![0.5, 0.5, 0.5].into_iter();
    let mut sim = Simulation::new(
        Topology::new(1, Capacity::Finite(2)).unwrap(),
        move || gaps.next().unwrap_or(f64::INFINITY),
        constant(2.0),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();
    sim.advance_to(50.0).unwrap();

    let snap = sim.snapshot();
    assert_eq!(snap.system_length, 0);
    assert_eq!(snap.total_arrivals, 3);
    assert_eq!(snap.served + snap.rejected, snap.total_arrivals);
    assert_eq!(snap.rejected, 1);
    assert_eq!(snap.degenerate_samples, 1);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut sim = Simulation::new(
            Topology::new(2, Capacity::Unbounded).unwrap(),
            ExponentialVariate::with_seed(3.0, 21).unwrap(),
            ExponentialVariate::with_seed(2.0, 22).unwrap(),
            SimulationConfig::default(),
        )
        .unwrap();
        sim.start().unwrap();
        sim.advance_to(200.0).unwrap();
        (sim.snapshot(), sim.wait_times().to_vec())
    };
    assert_eq!(run(), run());
}

#[test]
fn bounded_buffers_keep_most_recent() {
    let mut sim = Simulation::new(
        Topology::single_server(),
        constant(0.2),
        constant(0.1),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();
    sim.advance_to(300.0).unwrap();

    let snap = sim.snapshot();
    assert!(snap.served > 1000);
    assert_eq!(sim.wait_times().len(), 500);
    assert_eq!(sim.history().len(), 1000);
    let last = sim.history().latest().unwrap();
    assert!(last.time.as_secs() > 299.0);
}

#[test]
fn snapshot_serializes_to_json() {
    let mut sim = Simulation::new(
        Topology::single_server(),
        constant(1.0),
        constant(0.5),
        SimulationConfig::default(),
    )
    .unwrap();
    sim.start().unwrap();
    sim.advance_to(1.2).unwrap();

    let value = serde_json::to_value(sim.snapshot()).unwrap();
    assert_eq!(value["clock"], 1.2);
    assert_eq!(value["totalArrivals"], 1);
    assert_eq!(value["servers"][0]["busy"], true);
    assert_eq!(value["servers"][0]["currentEntity"], 0);
}

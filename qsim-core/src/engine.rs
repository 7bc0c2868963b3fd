//! Discrete-event engine for a multi-server FIFO queueing station.
//!
//! A [`Simulation`] owns the clock, the pending [`EventQueue`], the servers,
//! the waiting line and a single table of in-system entities. Servers and
//! the waiting line refer to entities by [`EntityId`] only, so an entity has
//! exactly one owner for its whole lifetime:
//!
//! ```text
//! arrival (admitted) -> Waiting -> Serving -> Done (removed from the table)
//! arrival (station full) -> rejected, no entity is created
//! ```
//!
//! Arrivals form an exogenous renewal process: every processed arrival
//! schedules the next one whether or not it was admitted.
//!
//! The engine never looks at wall-clock time. A driver calls
//! [`Simulation::advance_to`] with non-decreasing targets and reads
//! [`Simulation::snapshot`] in between; each call runs to completion.

use crate::config::SimulationConfig;
use crate::dists::{sanitize_sample, Variate};
use crate::error::SimError;
use crate::history::{BoundedSeries, HistorySample};
use crate::metrics;
use crate::scheduler::{Event, EventKind, EventQueue};
use crate::topology::Topology;
use crate::types::{EntityId, ServerId};
use crate::SimTime;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::{debug, instrument, trace, warn};

/// Lifecycle stage of an admitted entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityState {
    Waiting,
    Serving,
    Done,
}

/// One customer/job inside the station
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub arrival_time: SimTime,
    pub service_start_time: Option<SimTime>,
    pub state: EntityState,
    pub assigned_server: Option<ServerId>,
}

impl Entity {
    fn new(id: EntityId, arrival_time: SimTime) -> Self {
        Self {
            id,
            arrival_time,
            service_start_time: None,
            state: EntityState::Waiting,
            assigned_server: None,
        }
    }
}

/// A server slot. `current_entity` is a back-reference into the entity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: ServerId,
    pub busy: bool,
    pub current_entity: Option<EntityId>,
}

/// An entity in service and the server holding it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServingEntity {
    pub entity: EntityId,
    pub server: ServerId,
}

/// Cumulative counters of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub arrivals: u64,
    pub served: u64,
    pub rejected: u64,
    pub total_wait: f64,
    pub total_system_time: f64,
    pub degenerate_samples: u64,
}

/// Point-in-time view of the station for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub clock: SimTime,
    pub queue_length: usize,
    pub system_length: usize,
    /// Fraction of servers currently busy
    pub server_utilization: f64,
    pub servers: Vec<Server>,
    pub served: u64,
    pub rejected: u64,
    pub total_arrivals: u64,
    /// `total_wait / served`, 0 if nothing has been served
    pub avg_wait: f64,
    pub avg_system_time: f64,
    /// Mean over the sampled history buffer, not a time-weighted average
    pub avg_queue_length: f64,
    pub avg_system_length: f64,
    /// Waiting entities, head of the line first
    pub queue_entities: Vec<EntityId>,
    /// Entities in service, by server index
    pub serving_entities: Vec<ServingEntity>,
    pub degenerate_samples: u64,
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Arrival,
    Service,
}

impl Stream {
    fn label(self) -> &'static str {
        match self {
            Stream::Arrival => "arrival",
            Stream::Service => "service",
        }
    }
}

/// Discrete-event simulation of one queueing station.
///
/// Constructing a new instance is the only way to reset a run.
pub struct Simulation {
    topology: Topology,
    config: SimulationConfig,
    arrival_variate: Box<dyn Variate>,
    service_variate: Box<dyn Variate>,

    clock: SimTime,
    events: EventQueue,
    entities: HashMap<EntityId, Entity>,
    servers: Vec<Server>,
    waiting_line: VecDeque<EntityId>,
    next_entity_id: u64,
    started: bool,

    counters: Counters,
    history: BoundedSeries<HistorySample>,
    wait_times: BoundedSeries<f64>,
    last_history_time: SimTime,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("topology", &self.topology)
            .field("clock", &self.clock)
            .field("pending_events", &self.events.len())
            .field("queue_length", &self.waiting_line.len())
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Build an idle station. Nothing happens until [`Simulation::start`].
    pub fn new(
        topology: Topology,
        arrival_variate: impl Variate + 'static,
        service_variate: impl Variate + 'static,
        config: SimulationConfig,
    ) -> Result<Self, SimError> {
        Self::from_boxed(
            topology,
            Box::new(arrival_variate),
            Box::new(service_variate),
            config,
        )
    }

    /// Like [`Simulation::new`], for samplers that are already type-erased
    pub fn from_boxed(
        topology: Topology,
        arrival_variate: Box<dyn Variate>,
        service_variate: Box<dyn Variate>,
        config: SimulationConfig,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let topology = Topology::new(topology.servers(), topology.capacity())?;
        let servers = (0..topology.servers())
            .map(|i| Server {
                id: ServerId(i),
                busy: false,
                current_entity: None,
            })
            .collect();

        Ok(Self {
            topology,
            arrival_variate,
            service_variate,
            clock: SimTime::zero(),
            events: EventQueue::new(),
            entities: HashMap::new(),
            servers,
            waiting_line: VecDeque::new(),
            next_entity_id: 0,
            started: false,
            counters: Counters::default(),
            history: BoundedSeries::new(config.history_capacity),
            wait_times: BoundedSeries::new(config.wait_sample_capacity),
            last_history_time: SimTime::zero(),
            config,
        })
    }

    /// Schedule the first arrival, starting the self-renewing arrival process.
    pub fn start(&mut self) -> Result<(), SimError> {
        if self.started {
            return Err(SimError::AlreadyStarted);
        }
        self.started = true;
        debug!(
            servers = self.topology.servers(),
            capacity = %self.topology.capacity(),
            clock = %self.clock,
            "Starting simulation"
        );
        self.schedule_next_arrival();
        Ok(())
    }

    /// Process every event with time `<= target`, then set the clock to `target`.
    ///
    /// Idle stretches without events still move the clock. Fails without
    /// touching any state if `target` lies before the clock or is not finite.
    pub fn advance_to(&mut self, target: impl Into<SimTime>) -> Result<(), SimError> {
        self.advance(target.into())
    }

    #[instrument(level = "trace", skip(self), fields(clock = %self.clock))]
    fn advance(&mut self, target: SimTime) -> Result<(), SimError> {
        if !target.is_finite() {
            return Err(SimError::NonFiniteTarget { target });
        }
        if target < self.clock {
            return Err(SimError::TemporalOrder {
                target,
                clock: self.clock,
            });
        }

        while self.events.peek_min_time().is_some_and(|time| time <= target) {
            let Some(event) = self.events.extract_min() else {
                break;
            };
            self.clock = event.time;
            trace!(time = %event.time, kind = ?event.kind, entity = %event.entity, "Processing event");

            match event.kind {
                EventKind::Arrival => self.handle_arrival(event.entity),
                EventKind::Departure => self.handle_departure(event.entity),
            }

            if self.clock - self.last_history_time >= self.config.history_interval {
                self.record_history();
                self.last_history_time = self.clock;
            }
        }

        self.clock = target;
        Ok(())
    }

    fn handle_arrival(&mut self, id: EntityId) {
        self.counters.arrivals += 1;
        metrics::record_arrival();
        self.schedule_next_arrival();

        let system_size = self.system_length();
        if !self.topology.capacity().admits(system_size) {
            self.counters.rejected += 1;
            metrics::record_rejection();
            debug!(entity = %id, system_size, clock = %self.clock, "Station full, arrival rejected");
            return;
        }

        self.entities.insert(id, Entity::new(id, self.clock));
        match self.servers.iter().position(|server| !server.busy) {
            Some(server) => self.start_service(id, server),
            None => self.waiting_line.push_back(id),
        }
    }

    fn start_service(&mut self, id: EntityId, server: usize) {
        let clock = self.clock;
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.state = EntityState::Serving;
            entity.service_start_time = Some(clock);
            entity.assigned_server = Some(ServerId(server));
        }
        let slot = &mut self.servers[server];
        slot.busy = true;
        slot.current_entity = Some(id);

        if let Some(duration) = self.draw(Stream::Service) {
            self.events.insert(Event::departure(clock.after(duration), id));
        }
    }

    fn handle_departure(&mut self, id: EntityId) {
        let Some(mut entity) = self.entities.remove(&id) else {
            debug!(entity = %id, "Departure for an entity no longer in the system, ignoring");
            return;
        };
        let (Some(server), Some(service_start)) = (entity.assigned_server, entity.service_start_time)
        else {
            debug!(entity = %id, "Departure for an entity not in service, ignoring");
            self.entities.insert(id, entity);
            return;
        };

        let slot = &mut self.servers[server.0];
        slot.busy = false;
        slot.current_entity = None;

        let wait = service_start - entity.arrival_time;
        let system_time = self.clock - entity.arrival_time;
        self.counters.total_wait += wait;
        self.counters.total_system_time += system_time;
        self.counters.served += 1;
        self.wait_times.push(wait);
        metrics::record_departure(wait, system_time);

        entity.state = EntityState::Done;
        trace!(entity = %entity.id, state = ?entity.state, wait, system_time, "Entity departed");

        if let Some(next) = self.waiting_line.pop_front() {
            self.start_service(next, server.0);
        }
    }

    fn schedule_next_arrival(&mut self) {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        if let Some(gap) = self.draw(Stream::Arrival) {
            self.events.insert(Event::arrival(self.clock.after(gap), id));
        }
    }

    /// Draw from a generator, applying the degeneracy policy.
    fn draw(&mut self, stream: Stream) -> Option<f64> {
        let raw = match stream {
            Stream::Arrival => self.arrival_variate.sample(),
            Stream::Service => self.service_variate.sample(),
        };
        let outcome = sanitize_sample(raw);
        if outcome.is_degenerate() {
            self.counters.degenerate_samples += 1;
            metrics::record_degenerate_sample(stream.label());
            warn!(
                stream = stream.label(),
                raw,
                outcome = ?outcome,
                clock = %self.clock,
                "Generator returned a degenerate sample"
            );
        }
        outcome.duration()
    }

    fn record_history(&mut self) {
        let queue_length = self.waiting_line.len();
        let system_length = self.system_length();
        self.history.push(HistorySample {
            time: self.clock,
            queue_length,
            system_length,
            server_utilization: self.server_utilization(),
        });
        metrics::record_lengths(queue_length, system_length);
    }

    fn busy_servers(&self) -> usize {
        self.servers.iter().filter(|server| server.busy).count()
    }

    fn server_utilization(&self) -> f64 {
        self.busy_servers() as f64 / self.servers.len() as f64
    }

    /// Entities waiting plus entities in service
    pub fn system_length(&self) -> usize {
        self.waiting_line.len() + self.busy_servers()
    }

    pub fn queue_length(&self) -> usize {
        self.waiting_line.len()
    }

    /// Side-effect-free view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let served = self.counters.served;
        let per_served = |total: f64| if served > 0 { total / served as f64 } else { 0.0 };

        Snapshot {
            clock: self.clock,
            queue_length: self.queue_length(),
            system_length: self.system_length(),
            server_utilization: self.server_utilization(),
            servers: self.servers.clone(),
            served,
            rejected: self.counters.rejected,
            total_arrivals: self.counters.arrivals,
            avg_wait: per_served(self.counters.total_wait),
            avg_system_time: per_served(self.counters.total_system_time),
            avg_queue_length: self.history.mean_by(|s| s.queue_length as f64),
            avg_system_length: self.history.mean_by(|s| s.system_length as f64),
            queue_entities: self.waiting_line.iter().copied().collect(),
            serving_entities: self
                .servers
                .iter()
                .filter_map(|server| {
                    server.current_entity.map(|entity| ServingEntity {
                        entity,
                        server: server.id,
                    })
                })
                .collect(),
            degenerate_samples: self.counters.degenerate_samples,
        }
    }

    pub fn clock(&self) -> SimTime {
        self.clock
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Sampled `(time, queue, system, utilization)` series, oldest first
    pub fn history(&self) -> &BoundedSeries<HistorySample> {
        &self.history
    }

    /// Most recent completed wait times, oldest first
    pub fn wait_times(&self) -> &BoundedSeries<f64> {
        &self.wait_times
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Look up an entity currently in the system
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Number of entities in the entity table
    pub fn entities_in_system(&self) -> usize {
        self.entities.len()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Time of the next pending event, if any
    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek_min_time()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

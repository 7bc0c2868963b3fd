//! Time-ordered pending event storage.
//!
//! [`EventQueue`] is a binary min-heap keyed by event time. Every inserted
//! event also receives a monotonically increasing sequence number which is
//! used as a secondary key, so events sharing a timestamp come out in the
//! order they were scheduled. Continuous-time generators practically never
//! produce exact ties, but deterministic ones do, and the sequence number
//! keeps such runs reproducible.

use crate::types::EntityId;
use crate::SimTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The two things that can happen at a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Arrival,
    Departure,
}

/// A pending arrival or departure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: SimTime,
    pub kind: EventKind,
    pub entity: EntityId,
}

impl Event {
    pub fn arrival(time: SimTime, entity: EntityId) -> Self {
        Self {
            time,
            kind: EventKind::Arrival,
            entity,
        }
    }

    pub fn departure(time: SimTime, entity: EntityId) -> Self {
        Self {
            time,
            kind: EventKind::Departure,
            entity,
        }
    }
}

#[derive(Debug, Clone)]
struct EventEntry {
    seq: u64,
    event: Event,
}

impl EventEntry {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.event
            .time
            .cmp(&other.event.time)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Binary min-heap of pending events.
///
/// `insert` appends and sifts up, `extract_min` moves the last element to the
/// root and sifts down; both are O(log n).
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: Vec<EventEntry>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event
    pub fn insert(&mut self, event: Event) {
        let entry = EventEntry {
            seq: self.next_seq,
            event,
        };
        self.next_seq += 1;
        self.heap.push(entry);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the earliest event or `None` if none are left.
    pub fn extract_min(&mut self) -> Option<Event> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let min = self.heap.pop().map(|entry| entry.event);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        min
    }

    /// Time of the earliest pending event
    pub fn peek_min_time(&self) -> Option<SimTime> {
        self.heap.first().map(|entry| entry.event.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[parent].key_cmp(&self.heap[i]) != Ordering::Greater {
                break;
            }
            self.heap.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < n && self.heap[left].key_cmp(&self.heap[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < n && self.heap[right].key_cmp(&self.heap[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(smallest, i);
            i = smallest;
        }
    }
}

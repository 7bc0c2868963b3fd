//! Bounded sample buffers for charting simulation behavior over time

use crate::SimTime;
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Default number of history samples retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Default number of completed wait times retained
pub const DEFAULT_WAIT_SAMPLE_CAPACITY: usize = 500;

/// Default simulated time between history samples
pub const DEFAULT_HISTORY_INTERVAL: f64 = 0.1;

/// One sampled observation of the station.
///
/// Samples are taken after event processing at a fixed minimum spacing, so
/// averaging them approximates, but is not, a time-weighted average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySample {
    pub time: SimTime,
    pub queue_length: usize,
    pub system_length: usize,
    pub server_utilization: f64,
}

/// Ring buffer keeping only the most recent `capacity` items
#[derive(Debug, Clone)]
pub struct BoundedSeries<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedSeries<T> {
    /// Create an empty series. A zero capacity retains nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Append an item, evicting the oldest when full
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        while self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Copy out the retained items, oldest first
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }

    /// Mean of a projection over the retained items, 0 when empty
    pub fn mean_by(&self, f: impl Fn(&T) -> f64) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            self.items.iter().map(f).sum::<f64>() / self.items.len() as f64
        }
    }
}

impl<T: Serialize> Serialize for BoundedSeries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

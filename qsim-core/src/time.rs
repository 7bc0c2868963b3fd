//! Simulation time management

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// Simulation time in continuous time units
///
/// SimTime represents a point on the simulation timeline, measured in the
/// same abstract unit as the rates of the model (a rate `λ` means `λ`
/// arrivals per unit). It is totally ordered so it can key the event queue;
/// the engine only ever stores finite values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(f64);

impl SimTime {
    /// Create a new SimTime at the simulation start (time zero)
    pub const fn zero() -> Self {
        SimTime(0.0)
    }

    /// Create a SimTime from a number of time units. `-0.0` becomes `0.0`.
    pub fn from_secs(secs: f64) -> Self {
        SimTime(secs + 0.0)
    }

    /// Get the raw time value
    pub const fn as_secs(&self) -> f64 {
        self.0
    }

    /// Whether this time is a finite point on the timeline
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// The time `duration` after this one, strictly later for any finite
    /// non-negative clock.
    ///
    /// Far along the timeline a tiny duration is absorbed by rounding
    /// (`t + d == t`); the result then moves to the next representable time.
    pub fn after(self, duration: f64) -> SimTime {
        let next = self.0 + duration;
        if next > self.0 || !self.0.is_finite() || self.0 < 0.0 {
            SimTime(next)
        } else {
            SimTime(f64::from_bits(self.0.to_bits() + 1))
        }
    }

    /// Calculate the elapsed time since another SimTime, never negative
    pub fn duration_since(&self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: f64) -> Self::Output {
        SimTime(self.0 + rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = f64;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        SimTime::from_secs(secs)
    }
}

impl From<SimTime> for f64 {
    fn from(time: SimTime) -> Self {
        time.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.4}", self.0)
    }
}

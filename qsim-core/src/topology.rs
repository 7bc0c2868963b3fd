//! Server count and system capacity of a queueing station

use crate::error::ParameterError;
use crate::validate::{validate_positive_count, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of entities in the system (waiting plus in service)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    Finite(usize),
    Unbounded,
}

impl Capacity {
    /// Create a finite capacity, which must admit at least one entity
    pub fn finite(limit: usize) -> ValidationResult<Self> {
        validate_positive_count("capacity", limit).map(Capacity::Finite)
    }

    /// Whether one more entity fits next to `system_size` present ones
    pub fn admits(&self, system_size: usize) -> bool {
        match self {
            Capacity::Finite(limit) => system_size < *limit,
            Capacity::Unbounded => true,
        }
    }

    /// The finite limit, or `None` if unbounded
    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Finite(limit) => Some(*limit),
            Capacity::Unbounded => None,
        }
    }
}

impl From<Option<usize>> for Capacity {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(Capacity::Unbounded, Capacity::Finite)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Finite(limit) => write!(f, "{limit}"),
            Capacity::Unbounded => write!(f, "∞"),
        }
    }
}

/// Station layout: `servers` identical parallel servers sharing one FIFO line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopologyFields")]
pub struct Topology {
    servers: usize,
    capacity: Capacity,
}

/// Unchecked wire form, validated through [`Topology::new`]
#[derive(Deserialize)]
struct TopologyFields {
    servers: usize,
    capacity: Capacity,
}

impl TryFrom<TopologyFields> for Topology {
    type Error = ParameterError;

    fn try_from(fields: TopologyFields) -> Result<Self, Self::Error> {
        Topology::new(fields.servers, fields.capacity)
    }
}

impl Topology {
    /// Validated topology. A `Finite(0)` capacity is rejected.
    pub fn new(servers: usize, capacity: Capacity) -> ValidationResult<Self> {
        validate_positive_count("servers", servers)?;
        if let Capacity::Finite(limit) = capacity {
            validate_positive_count("capacity", limit)?;
        }
        Ok(Self { servers, capacity })
    }

    /// One server, unbounded line
    pub fn single_server() -> Self {
        Self {
            servers: 1,
            capacity: Capacity::Unbounded,
        }
    }

    /// Same servers, different capacity
    pub fn with_capacity(self, capacity: Capacity) -> ValidationResult<Self> {
        Self::new(self.servers, capacity)
    }

    pub fn servers(&self) -> usize {
        self.servers
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }
}

//! Core data structures for the road graph

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// Stable identifier for a city, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct CityId(pub u64);

/// Stable identifier for a road, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct RoadId(pub u64);

/// A named location in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

/// A weighted connection between two cities, stored in the orientation it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Road {
    pub id: RoadId,
    pub source: String,
    pub target: String,
    pub weight: Weight,
}

/// Road weight. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Weight(u32);

impl Weight {
    pub fn new(raw: i64) -> GraphResult<Self> {
        match u32::try_from(raw) {
            Ok(w) if w >= 1 => Ok(Weight(w)),
            _ => Err(GraphError::InvalidWeight(raw)),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Weight {
    type Error = GraphError;

    fn try_from(raw: i64) -> GraphResult<Self> {
        Weight::new(raw)
    }
}

impl From<Weight> for u32 {
    fn from(w: Weight) -> u32 {
        w.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How stored roads are traversed. Chosen once per graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoadPolicy {
    /// `A→B` is only traversable from A to B; `(B, A)` is a different road.
    Directed,
    /// Every road is two-way; `(B, A)` names the same road as `(A, B)`.
    #[default]
    Symmetric,
}

impl RoadPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RoadPolicy::Directed => "directed",
            RoadPolicy::Symmetric => "symmetric",
        }
    }
}

impl fmt::Display for RoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoadPolicy {
    type Err = GraphError;

    fn from_str(s: &str) -> GraphResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directed" => Ok(RoadPolicy::Directed),
            "symmetric" | "undirected" => Ok(RoadPolicy::Symmetric),
            other => Err(GraphError::InvalidInput(format!("unknown road policy '{other}'"))),
        }
    }
}

/// Check that `name` is usable as a city identifier.
///
/// Names must be non-empty and carry no leading or trailing whitespace.
/// Comparison is case-sensitive, so no normalisation happens here.
pub fn validate_name(name: &str) -> GraphResult<()> {
    if name.trim().is_empty() {
        return Err(GraphError::InvalidInput("city name must not be empty".to_string()));
    }
    if name.trim() != name {
        return Err(GraphError::InvalidInput(format!(
            "city name '{name}' has surrounding whitespace"
        )));
    }
    Ok(())
}

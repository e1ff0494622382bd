//! Change events emitted by successful mutations

use crate::model::Road;
use serde::{Deserialize, Serialize};

/// One applied mutation, broadcast to clients so they can refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphChange {
    CityAdded {
        version: u64,
        name: String,
    },
    /// A city and the roads removed with it.
    CityRemoved {
        version: u64,
        name: String,
        removed_roads: Vec<Road>,
    },
    RoadAdded {
        version: u64,
        road: Road,
    },
    RoadRemoved {
        version: u64,
        road: Road,
    },
}

impl GraphChange {
    /// Graph version right after this change was applied.
    pub fn version(&self) -> u64 {
        match self {
            GraphChange::CityAdded { version, .. }
            | GraphChange::CityRemoved { version, .. }
            | GraphChange::RoadAdded { version, .. }
            | GraphChange::RoadRemoved { version, .. } => *version,
        }
    }

    /// Human-readable summary, used as the success message of the HTTP API.
    pub fn describe(&self) -> String {
        match self {
            GraphChange::CityAdded { name, .. } => format!("City {name} added successfully!"),
            GraphChange::CityRemoved {
                name,
                removed_roads,
                ..
            } => match removed_roads.len() {
                0 => format!("City {name} deleted successfully!"),
                n => format!("City {name} deleted successfully along with {n} road(s)!"),
            },
            GraphChange::RoadAdded { road, .. } => format!(
                "Road added between {} and {} (weight {})",
                road.source, road.target, road.weight
            ),
            GraphChange::RoadRemoved { road, .. } => {
                format!("Road deleted between {} and {}", road.source, road.target)
            }
        }
    }
}

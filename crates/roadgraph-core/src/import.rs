//! Build a graph from an adjacency document

use std::collections::HashSet;

use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::export::Adjacency;
use crate::graph::Graph;
use crate::model::{RoadId, RoadPolicy};

impl Graph {
    /// Build a graph from `{ city: [[neighbor, weight], ...] }`.
    ///
    /// Listed cities are created in document order, then any neighbor that is
    /// only mentioned inside a list. Under [`RoadPolicy::Symmetric`] the
    /// mirrored entry of a road already imported is skipped when its weight
    /// matches, which makes the output of [`Graph::to_adjacency`] loadable.
    /// Any other invalid entry aborts the import.
    pub fn from_adjacency(policy: RoadPolicy, doc: &Adjacency) -> GraphResult<Graph> {
        let mut graph = Graph::new(policy);

        for (city, _) in &doc.0 {
            graph.add_city(city)?;
        }
        for (_, neighbors) in &doc.0 {
            for (neighbor, _) in neighbors {
                if !graph.contains_city(neighbor) {
                    graph.add_city(neighbor)?;
                }
            }
        }

        // roads whose mirrored entry has already been matched
        let mut mirrored: HashSet<RoadId> = HashSet::new();
        for (city, neighbors) in &doc.0 {
            for (neighbor, weight) in neighbors {
                if policy == RoadPolicy::Symmetric {
                    if let Some(existing) = graph.road(city, neighbor) {
                        if existing.weight.get() == *weight
                            && existing.source == *neighbor
                            && mirrored.insert(existing.id)
                        {
                            continue;
                        }
                        return Err(GraphError::DuplicateEdge {
                            from: city.clone(),
                            to: neighbor.clone(),
                        });
                    }
                }
                graph.add_road(city, neighbor, i64::from(*weight))?;
            }
        }

        debug!(
            cities = graph.city_count(),
            roads = graph.road_count(),
            mirrored = mirrored.len(),
            "adjacency document imported"
        );
        Ok(graph)
    }
}

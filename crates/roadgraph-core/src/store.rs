//! Thread-safe owner of the canonical graph

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::change::GraphChange;
use crate::error::GraphResult;
use crate::graph::Graph;
use crate::model::{CityId, RoadPolicy};

/// Receives every applied mutation while the store's write lock is held.
///
/// Calls arrive in version order. Implementations must not block and must not
/// call back into the store.
pub trait ChangeSink: Send + Sync + fmt::Debug {
    fn publish(&self, change: &GraphChange);
}

/// The single authority over the road graph.
///
/// Mutations hold the write lock for their whole validate-and-apply step, so
/// readers never see a half-applied cascade. Readers only hold the read lock
/// long enough to clone an `Arc`: the graph is copy-on-write, so a snapshot
/// taken before a mutation keeps its contents after the mutation lands.
#[derive(Debug)]
pub struct GraphStore {
    graph: RwLock<Arc<Graph>>,
    sink: Option<Arc<dyn ChangeSink>>,
}

impl GraphStore {
    pub fn new(policy: RoadPolicy) -> Self {
        Self::from_graph(Graph::new(policy))
    }

    /// Take ownership of an already populated graph, e.g. one built by
    /// [`Graph::from_adjacency`].
    pub fn from_graph(graph: Graph) -> Self {
        GraphStore {
            graph: RwLock::new(Arc::new(graph)),
            sink: None,
        }
    }

    /// Attach the sink that hears about every later mutation.
    pub fn with_sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Point-in-time view of the graph, unaffected by later mutations.
    pub fn snapshot(&self) -> Arc<Graph> {
        Arc::clone(&*self.graph.read())
    }

    pub fn all_city_names(&self) -> Vec<String> {
        self.snapshot().city_names()
    }

    pub fn policy(&self) -> RoadPolicy {
        self.graph.read().policy()
    }

    pub fn version(&self) -> u64 {
        self.graph.read().version()
    }

    pub fn add_city(&self, name: &str) -> GraphResult<GraphChange> {
        let mut guard = self.graph.write();
        guard.check_add_city(name)?;

        let graph = Arc::make_mut(&mut *guard);
        let id: CityId = graph.add_city(name)?;
        info!(city = name, id = id.0, "city added");
        let change = GraphChange::CityAdded {
            version: graph.version(),
            name: name.to_string(),
        };
        Ok(self.emit(change))
    }

    pub fn delete_city(&self, name: &str) -> GraphResult<GraphChange> {
        let mut guard = self.graph.write();
        guard.check_remove_city(name)?;

        let graph = Arc::make_mut(&mut *guard);
        let removed_roads = graph.remove_city(name)?;
        info!(city = name, cascaded = removed_roads.len(), "city deleted");
        let change = GraphChange::CityRemoved {
            version: graph.version(),
            name: name.to_string(),
            removed_roads,
        };
        Ok(self.emit(change))
    }

    pub fn add_road(&self, from: &str, to: &str, weight: i64) -> GraphResult<GraphChange> {
        let mut guard = self.graph.write();
        guard.check_add_road(from, to, weight)?;

        let graph = Arc::make_mut(&mut *guard);
        let road = graph.add_road(from, to, weight)?;
        info!(from, to, weight = road.weight.get(), "road added");
        let change = GraphChange::RoadAdded {
            version: graph.version(),
            road,
        };
        Ok(self.emit(change))
    }

    pub fn delete_road(&self, from: &str, to: &str) -> GraphResult<GraphChange> {
        let mut guard = self.graph.write();
        guard.check_remove_road(from, to)?;

        let graph = Arc::make_mut(&mut *guard);
        let road = graph.remove_road(from, to)?;
        info!(from, to, road = road.id.0, "road deleted");
        let change = GraphChange::RoadRemoved {
            version: graph.version(),
            road,
        };
        Ok(self.emit(change))
    }

    // Callers still hold the write guard here.
    fn emit(&self, change: GraphChange) -> GraphChange {
        if let Some(sink) = &self.sink {
            sink.publish(&change);
        }
        change
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(RoadPolicy::default())
    }
}

//! Road graph wrapper using petgraph::StableDiGraph with a name index

use crate::error::{GraphError, GraphResult};
use crate::model::*;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// The road graph: named cities joined by weighted roads.
///
/// Roads are stored once, in the orientation they were added. Whether they
/// can also be walked backwards is decided by the graph's [`RoadPolicy`].
/// Every successful mutation bumps [`Graph::version`]; a rejected mutation
/// leaves the graph untouched.
#[derive(Clone)]
pub struct Graph {
    inner: StableDiGraph<City, Road>,
    index: HashMap<String, NodeIndex>,
    policy: RoadPolicy,
    next_city: u64,
    next_road: u64,
    version: u64,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("policy", &self.policy)
            .field("city_count", &self.inner.node_count())
            .field("road_count", &self.inner.edge_count())
            .field("version", &self.version)
            .finish()
    }
}

impl Graph {
    pub fn new(policy: RoadPolicy) -> Self {
        Graph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
            policy,
            next_city: 0,
            next_road: 0,
            version: 0,
        }
    }

    pub fn policy(&self) -> RoadPolicy {
        self.policy
    }

    /// Number of successful mutations applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn city_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn road_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains_city(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.index
            .get(name)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    /// All cities in insertion order.
    pub fn cities(&self) -> Vec<&City> {
        let mut cities: Vec<&City> = self
            .inner
            .node_indices()
            .filter_map(|idx| self.inner.node_weight(idx))
            .collect();
        cities.sort_by_key(|c| c.id);
        cities
    }

    /// All city names in insertion order.
    pub fn city_names(&self) -> Vec<String> {
        self.cities().into_iter().map(|c| c.name.clone()).collect()
    }

    /// All roads in insertion order, each listed once.
    pub fn roads(&self) -> Vec<&Road> {
        let mut roads: Vec<&Road> = self
            .inner
            .edge_indices()
            .filter_map(|idx| self.inner.edge_weight(idx))
            .collect();
        roads.sort_by_key(|r| r.id);
        roads
    }

    /// Look up the road joining `from` and `to` under this graph's policy.
    pub fn road(&self, from: &str, to: &str) -> Option<&Road> {
        self.find_road(from, to)
            .and_then(|idx| self.inner.edge_weight(idx))
    }

    /// Cities reachable from `name` in one step, with the connecting weight.
    pub fn neighbors(&self, name: &str) -> GraphResult<Vec<(&str, Weight)>> {
        let idx = self
            .node_index(name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;
        Ok(self
            .adjacent(idx)
            .into_iter()
            .map(|(n, w)| (self.name_of(n), w))
            .collect())
    }

    // ── Mutations ───────────────────────────────────────────

    pub fn check_add_city(&self, name: &str) -> GraphResult<()> {
        validate_name(name)?;
        if self.contains_city(name) {
            return Err(GraphError::DuplicateNode(name.to_string()));
        }
        Ok(())
    }

    /// Insert a new city. Fails if the name is invalid or already taken.
    pub fn add_city(&mut self, name: &str) -> GraphResult<CityId> {
        self.check_add_city(name)?;

        let id = CityId(self.next_city);
        self.next_city += 1;
        let idx = self.inner.add_node(City {
            id,
            name: name.to_string(),
        });
        self.index.insert(name.to_string(), idx);
        self.version += 1;
        Ok(id)
    }

    pub fn check_remove_city(&self, name: &str) -> GraphResult<()> {
        validate_name(name)?;
        if !self.contains_city(name) {
            return Err(GraphError::NodeNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Remove a city together with every road touching it.
    ///
    /// Returns the removed roads in insertion order.
    pub fn remove_city(&mut self, name: &str) -> GraphResult<Vec<Road>> {
        self.check_remove_city(name)?;
        let idx = self.index[name];

        let mut removed: Vec<Road> = self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.inner.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().clone())
            .collect();
        removed.sort_by_key(|r| r.id);

        // petgraph drops incident edges together with the node
        self.inner.remove_node(idx);
        self.index.remove(name);
        self.version += 1;
        Ok(removed)
    }

    pub fn check_add_road(&self, from: &str, to: &str, weight: i64) -> GraphResult<Weight> {
        validate_name(from)?;
        validate_name(to)?;
        let weight = Weight::new(weight)?;
        if from == to {
            return Err(GraphError::SelfLoop(from.to_string()));
        }
        for name in [from, to] {
            if !self.contains_city(name) {
                return Err(GraphError::NodeNotFound(name.to_string()));
            }
        }
        if self.find_road(from, to).is_some() {
            return Err(GraphError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(weight)
    }

    /// Insert a road between two existing cities.
    pub fn add_road(&mut self, from: &str, to: &str, weight: i64) -> GraphResult<Road> {
        let weight = self.check_add_road(from, to, weight)?;

        let road = Road {
            id: RoadId(self.next_road),
            source: from.to_string(),
            target: to.to_string(),
            weight,
        };
        self.next_road += 1;
        self.inner
            .add_edge(self.index[from], self.index[to], road.clone());
        self.version += 1;
        Ok(road)
    }

    pub fn check_remove_road(&self, from: &str, to: &str) -> GraphResult<()> {
        validate_name(from)?;
        validate_name(to)?;
        if self.find_road(from, to).is_none() {
            return Err(GraphError::EdgeNotFound {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// Remove the road joining `from` and `to`.
    pub fn remove_road(&mut self, from: &str, to: &str) -> GraphResult<Road> {
        self.check_remove_road(from, to)?;
        let idx = self
            .find_road(from, to)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        let road = self
            .inner
            .remove_edge(idx)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        self.version += 1;
        Ok(road)
    }

    // ── Traversal primitives ────────────────────────────────

    pub(crate) fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub(crate) fn name_of(&self, idx: NodeIndex) -> &str {
        self.inner
            .node_weight(idx)
            .map_or("", |c| c.name.as_str())
    }

    /// Neighbors of `idx` in road insertion order.
    ///
    /// Under [`RoadPolicy::Symmetric`] incoming roads count as well.
    pub(crate) fn adjacent(&self, idx: NodeIndex) -> Vec<(NodeIndex, Weight)> {
        let mut out: Vec<(RoadId, NodeIndex, Weight)> = self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.weight().id, e.target(), e.weight().weight))
            .collect();
        if self.policy == RoadPolicy::Symmetric {
            out.extend(
                self.inner
                    .edges_directed(idx, Direction::Incoming)
                    .map(|e| (e.weight().id, e.source(), e.weight().weight)),
            );
        }
        out.sort_by_key(|(id, _, _)| *id);
        out.into_iter().map(|(_, n, w)| (n, w)).collect()
    }

    fn find_road(&self, from: &str, to: &str) -> Option<EdgeIndex> {
        let a = self.node_index(from)?;
        let b = self.node_index(to)?;
        match self.policy {
            RoadPolicy::Directed => self.inner.find_edge(a, b),
            RoadPolicy::Symmetric => self
                .inner
                .find_edge(a, b)
                .or_else(|| self.inner.find_edge(b, a)),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(RoadPolicy::default())
    }
}

//! Shortest-path queries over graph snapshots.
//!
//! Every algorithm is a stateless [`PathFinder`] selected through the closed
//! [`Algorithm`] enum. Searches only read the graph they are given, so any
//! number of them can run against the same snapshot at once.
//!
//! # Example
//!
//! ```
//! use roadgraph_core::{find_path, Algorithm, Graph, RoadPolicy};
//!
//! let mut graph = Graph::new(RoadPolicy::Directed);
//! for city in ["A", "B", "C"] {
//!     graph.add_city(city).unwrap();
//! }
//! graph.add_road("A", "B", 5).unwrap();
//! graph.add_road("B", "C", 2).unwrap();
//! graph.add_road("A", "C", 10).unwrap();
//!
//! let route = find_path(&graph, "A", "C", Algorithm::Dijkstra).unwrap();
//! assert_eq!(route.path, vec!["A", "B", "C"]);
//! assert_eq!(route.distance, Some(7));
//! ```

pub mod bfs;
pub mod dfs;
pub mod dijkstra;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::model::validate_name;

pub use bfs::BreadthFirst;
pub use dfs::DepthFirst;
pub use dijkstra::Dijkstra;

/// What the `distance` of a [`Route`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostModel {
    /// Sum of road weights along the path.
    Weighted,
    /// Number of roads along the path; weights are ignored.
    Hops,
}

/// Available path algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Weighted shortest path.
    #[default]
    Dijkstra,
    /// Fewest roads; distance is the hop count.
    Bfs,
    /// First path found depth-first; distance is the summed weight.
    Dfs,
}

static DIJKSTRA: Dijkstra = Dijkstra;
static BFS: BreadthFirst = BreadthFirst;
static DFS: DepthFirst = DepthFirst;

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Dijkstra, Algorithm::Bfs, Algorithm::Dfs];

    /// Dispatch table from variant to implementation.
    pub fn finder(self) -> &'static dyn PathFinder {
        match self {
            Algorithm::Dijkstra => &DIJKSTRA,
            Algorithm::Bfs => &BFS,
            Algorithm::Dfs => &DFS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
        }
    }

    pub fn cost_model(self) -> CostModel {
        self.finder().cost_model()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = GraphError;

    /// Case-insensitive; accepts a few spellings per algorithm.
    fn from_str(s: &str) -> GraphResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "bfs" | "breadth-first" | "breadth_first" | "unweighted" => Ok(Algorithm::Bfs),
            "dfs" | "depth-first" | "depth_first" => Ok(Algorithm::Dfs),
            _ => Err(GraphError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Result of a path query.
///
/// An empty `path` with `distance: None` means the cities exist but are not
/// connected. That is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<String>,
    pub distance: Option<u64>,
}

impl Route {
    pub fn no_route() -> Self {
        Route {
            path: Vec::new(),
            distance: None,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Raw search output in node indices of the searched snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub nodes: Vec<NodeIndex>,
    pub cost: u64,
}

/// Shared flag a caller can set to stop a running search.
///
/// Searches check it once per frontier step and bail out with
/// [`GraphError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> GraphResult<()> {
        if self.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        Ok(())
    }
}

/// A path search strategy.
///
/// Implementations must be deterministic: the same graph and endpoints always
/// give the same answer. `start` and `goal` are distinct, existing nodes.
pub trait PathFinder: Send + Sync {
    fn cost_model(&self) -> CostModel;

    fn search(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        cancel: &CancelToken,
    ) -> GraphResult<Option<Found>>;
}

/// Find a route from `start` to `end` with the given algorithm.
pub fn find_path(graph: &Graph, start: &str, end: &str, algorithm: Algorithm) -> GraphResult<Route> {
    find_path_with_cancel(graph, start, end, algorithm, &CancelToken::new())
}

/// Like [`find_path`], but gives up once `cancel` is set.
pub fn find_path_with_cancel(
    graph: &Graph,
    start: &str,
    end: &str,
    algorithm: Algorithm,
    cancel: &CancelToken,
) -> GraphResult<Route> {
    validate_name(start)?;
    validate_name(end)?;
    let from = graph
        .node_index(start)
        .ok_or_else(|| GraphError::NodeNotFound(start.to_string()))?;
    let to = graph
        .node_index(end)
        .ok_or_else(|| GraphError::NodeNotFound(end.to_string()))?;

    if from == to {
        return Ok(Route {
            path: vec![start.to_string()],
            distance: Some(0),
        });
    }

    let route = match algorithm.finder().search(graph, from, to, cancel)? {
        Some(found) => Route {
            path: found
                .nodes
                .iter()
                .map(|&idx| graph.name_of(idx).to_string())
                .collect(),
            distance: Some(found.cost),
        },
        None => Route::no_route(),
    };

    debug!(
        start,
        end,
        %algorithm,
        hops = route.path.len().saturating_sub(1),
        distance = ?route.distance,
        "path query answered"
    );
    Ok(route)
}

/// Walk predecessor links back from `goal` and return the path start-first.
pub(crate) fn reconstruct(
    prev: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    goal: NodeIndex,
) -> Vec<NodeIndex> {
    let mut nodes = vec![goal];
    let mut current = goal;
    while current != start {
        match prev.get(&current) {
            Some(&p) => {
                nodes.push(p);
                current = p;
            }
            None => break,
        }
    }
    nodes.reverse();
    nodes
}

//! Breadth-first search for paths with the fewest roads

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::stable_graph::NodeIndex;

use super::{reconstruct, CancelToken, CostModel, Found, PathFinder};
use crate::error::GraphResult;
use crate::graph::Graph;

/// Unweighted shortest path. The reported distance is the number of roads
/// on the path, whatever their weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

impl PathFinder for BreadthFirst {
    fn cost_model(&self) -> CostModel {
        CostModel::Hops
    }

    fn search(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        cancel: &CancelToken,
    ) -> GraphResult<Option<Found>> {
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut prev: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            cancel.check()?;

            for (next, _) in graph.adjacent(node) {
                if !visited.insert(next) {
                    continue;
                }
                prev.insert(next, node);
                if next == goal {
                    let nodes = reconstruct(&prev, start, goal);
                    let cost = (nodes.len() - 1) as u64;
                    return Ok(Some(Found { nodes, cost }));
                }
                queue.push_back(next);
            }
        }

        Ok(None)
    }
}

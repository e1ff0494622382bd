//! Depth-first search: the first path found, not necessarily the shortest

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::NodeIndex;

use super::{reconstruct, CancelToken, CostModel, Found, PathFinder};
use crate::error::GraphResult;
use crate::graph::Graph;

/// Iterative depth-first search. Neighbors are explored in road insertion
/// order; the reported distance is the summed weight of the returned path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirst;

impl PathFinder for DepthFirst {
    fn cost_model(&self) -> CostModel {
        CostModel::Weighted
    }

    fn search(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        cancel: &CancelToken,
    ) -> GraphResult<Option<Found>> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut prev: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        // (node, parent, cost of reaching node through parent)
        let mut stack: Vec<(NodeIndex, Option<NodeIndex>, u64)> = vec![(start, None, 0)];

        while let Some((node, parent, cost)) = stack.pop() {
            cancel.check()?;

            if !visited.insert(node) {
                continue;
            }
            if let Some(p) = parent {
                prev.insert(node, p);
            }

            if node == goal {
                return Ok(Some(Found {
                    nodes: reconstruct(&prev, start, goal),
                    cost,
                }));
            }

            // reversed so the earliest road is popped first
            for (next, weight) in graph.adjacent(node).into_iter().rev() {
                if !visited.contains(&next) {
                    stack.push((next, Some(node), cost + u64::from(weight.get())));
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;
    use crate::model::RoadPolicy;
    use crate::path::{find_path, Algorithm};

    #[test]
    fn test_follows_first_road_deep() {
        let mut g = Graph::new(RoadPolicy::Directed);
        for c in ["A", "B", "C"] {
            g.add_city(c).unwrap();
        }
        g.add_road("A", "B", 5).unwrap();
        g.add_road("B", "C", 2).unwrap();
        g.add_road("A", "C", 1).unwrap();

        let route = find_path(&g, "A", "C", Algorithm::Dfs).unwrap();
        assert_eq!(route.path, vec!["A", "B", "C"]);
        assert_eq!(route.distance, Some(7));
    }

    #[test]
    fn test_dead_end_backtracks() {
        let mut g = Graph::new(RoadPolicy::Directed);
        for c in ["A", "X", "B"] {
            g.add_city(c).unwrap();
        }
        g.add_road("A", "X", 1).unwrap();
        g.add_road("A", "B", 4).unwrap();

        let route = find_path(&g, "A", "B", Algorithm::Dfs).unwrap();
        assert_eq!(route.path, vec!["A", "B"]);
        assert_eq!(route.distance, Some(4));
    }
}

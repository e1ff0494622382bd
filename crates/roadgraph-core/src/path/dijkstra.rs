//! Dijkstra's algorithm for weighted shortest paths.
//!
//! Road weights are always at least 1, so the non-negative weight
//! requirement holds by construction. The frontier is a binary heap keyed by
//! `(tentative distance, discovery sequence)`: among equally distant entries
//! the one discovered first is settled first, and a node's predecessor only
//! changes on a strictly shorter distance. Together with neighbors being
//! expanded in road insertion order this makes the chosen path among equal
//! cost alternatives deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::stable_graph::NodeIndex;

use super::{reconstruct, CancelToken, CostModel, Found, PathFinder};
use crate::error::GraphResult;
use crate::graph::Graph;

/// Weighted shortest path search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

/// Entry in the priority queue. Ordered so `BinaryHeap` pops the smallest
/// distance first, then the earliest discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    distance: u64,
    seq: u64,
    node: NodeIndex,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PathFinder for Dijkstra {
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
        let mut dist: HashMap<NodeIndex, u64> = HashMap::new();
        let mut prev: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut settled: HashSet<NodeIndex> = HashSet::new();
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;

        dist.insert(start, 0);
        heap.push(FrontierEntry {
            distance: 0,
            seq,
            node: start,
        });

        while let Some(FrontierEntry { distance, node, .. }) = heap.pop() {
            cancel.check()?;

            if !settled.insert(node) {
                continue;
            }
            if node == goal {
                return Ok(Some(Found {
                    nodes: reconstruct(&prev, start, goal),
                    cost: distance,
                }));
            }

            for (next, weight) in graph.adjacent(node) {
                if settled.contains(&next) {
                    continue;
                }
                let alt = distance + u64::from(weight.get());
                if dist.get(&next).is_none_or(|&cur| alt < cur) {
                    dist.insert(next, alt);
                    prev.insert(next, node);
                    seq += 1;
                    heap.push(FrontierEntry {
                        distance: alt,
                        seq,
                        node: next,
                    });
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoadPolicy;
    use crate::path::{find_path, Algorithm};

    fn graph(policy: RoadPolicy, cities: &[&str], roads: &[(&str, &str, i64)]) -> Graph {
        let mut g = Graph::new(policy);
        for c in cities {
            g.add_city(c).unwrap();
        }
        for (a, b, w) in roads {
            g.add_road(a, b, *w).unwrap();
        }
        g
    }

    #[test]
    fn test_prefers_lighter_detour() {
        let g = graph(
            RoadPolicy::Directed,
            &["A", "B", "C"],
            &[("A", "B", 5), ("B", "C", 2), ("A", "C", 10)],
        );
        let route = find_path(&g, "A", "C", Algorithm::Dijkstra).unwrap();
        assert_eq!(route.path, vec!["A", "B", "C"]);
        assert_eq!(route.distance, Some(7));
    }

    #[test]
    fn test_directed_roads_are_one_way() {
        let g = graph(RoadPolicy::Directed, &["A", "B"], &[("A", "B", 3)]);
        let route = find_path(&g, "B", "A", Algorithm::Dijkstra).unwrap();
        assert!(!route.is_found());
        assert_eq!(route.distance, None);
    }

    #[test]
    fn test_symmetric_roads_walk_backwards() {
        let g = graph(
            RoadPolicy::Symmetric,
            &["A", "B", "C"],
            &[("A", "B", 4), ("C", "B", 1)],
        );
        let route = find_path(&g, "A", "C", Algorithm::Dijkstra).unwrap();
        assert_eq!(route.path, vec!["A", "B", "C"]);
        assert_eq!(route.distance, Some(5));
    }

    #[test]
    fn test_equal_cost_tie_is_stable() {
        // A→B→D and A→C→D both cost 2; B's road was added first.
        let g = graph(
            RoadPolicy::Directed,
            &["A", "B", "C", "D"],
            &[("A", "B", 1), ("A", "C", 1), ("B", "D", 1), ("C", "D", 1)],
        );
        let first = find_path(&g, "A", "D", Algorithm::Dijkstra).unwrap();
        assert_eq!(first.path, vec!["A", "B", "D"]);
        for _ in 0..10 {
            assert_eq!(find_path(&g, "A", "D", Algorithm::Dijkstra).unwrap(), first);
        }
    }

    #[test]
    fn test_cancelled_search_stops() {
        let g = graph(RoadPolicy::Directed, &["A", "B"], &[("A", "B", 1)]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let start = g.node_index("A").unwrap();
        let goal = g.node_index("B").unwrap();
        let err = Dijkstra.search(&g, start, goal, &cancel).unwrap_err();
        assert_eq!(err, crate::error::GraphError::Cancelled);
    }
}

//! Wire shapes of a graph snapshot for rendering clients

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::graph::Graph;
use crate::model::RoadPolicy;

/// Node list plus one `(source, target, weight)` triple per road.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeList {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// `{ city: [[neighbor, weight], ...] }`, cities in insertion order.
///
/// Serialized as a JSON object whose key order follows the vector order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Adjacency(pub Vec<(String, Vec<(String, u32)>)>);

impl Adjacency {
    pub fn get(&self, city: &str) -> Option<&[(String, u32)]> {
        self.0
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, neighbors)| neighbors.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Adjacency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (city, neighbors) in &self.0 {
            map.serialize_entry(city, neighbors)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Adjacency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AdjacencyVisitor;

        impl<'de> Visitor<'de> for AdjacencyVisitor {
            type Value = Adjacency;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of city name to [[neighbor, weight], ...]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Adjacency, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((city, neighbors)) =
                    access.next_entry::<String, Vec<(String, i64)>>()?
                {
                    let neighbors = neighbors
                        .into_iter()
                        .map(|(n, w)| {
                            u32::try_from(w)
                                .map(|w| (n, w))
                                .map_err(|_| serde::de::Error::custom(format!("invalid weight {w}")))
                        })
                        .collect::<Result<Vec<_>, A::Error>>()?;
                    entries.push((city, neighbors));
                }
                Ok(Adjacency(entries))
            }
        }

        deserializer.deserialize_map(AdjacencyVisitor)
    }
}

impl Graph {
    /// Edge-list export: every road exactly once, in its stored orientation.
    pub fn to_edge_list(&self) -> EdgeList {
        EdgeList {
            nodes: self.city_names(),
            edges: self
                .roads()
                .into_iter()
                .map(|r| EdgeEntry {
                    source: r.source.clone(),
                    target: r.target.clone(),
                    weight: r.weight.get(),
                })
                .collect(),
        }
    }

    /// Adjacency export.
    ///
    /// Under [`RoadPolicy::Symmetric`] a road is listed under both of its
    /// cities; under [`RoadPolicy::Directed`] only under its source.
    pub fn to_adjacency(&self) -> Adjacency {
        let mut entries: Vec<(String, Vec<(String, u32)>)> = self
            .city_names()
            .into_iter()
            .map(|name| (name, Vec::new()))
            .collect();
        let position: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();

        let mut links = Vec::new();
        for road in self.roads() {
            links.push((road.source.clone(), road.target.clone(), road.weight.get()));
            if self.policy() == RoadPolicy::Symmetric {
                links.push((road.target.clone(), road.source.clone(), road.weight.get()));
            }
        }
        for (from, to, weight) in links {
            if let Some(&i) = position.get(&from) {
                entries[i].1.push((to, weight));
            }
        }
        Adjacency(entries)
    }
}

//! Roadgraph core: graph store, pathfinding engine and export formats

pub mod change;
pub mod error;
pub mod export;
pub mod graph;
pub mod import;
pub mod model;
pub mod path;
pub mod store;


pub use change::GraphChange;
pub use error::{GraphError, GraphResult};
pub use export::{Adjacency, EdgeEntry, EdgeList};
pub use graph::Graph;
pub use model::{City, CityId, Road, RoadId, RoadPolicy, Weight, validate_name};
pub use path::{find_path, find_path_with_cancel, Algorithm, CancelToken, CostModel, PathFinder, Route};
pub use store::{ChangeSink, GraphStore};

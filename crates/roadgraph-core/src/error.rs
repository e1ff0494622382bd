//! Error taxonomy for graph mutations and path queries

use thiserror::Error;

/// Every way a store operation or path query can be rejected.
///
/// All variants are recoverable validation failures. A rejected operation
/// never modifies the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("city '{0}' already exists")]
    DuplicateNode(String),

    #[error("city '{0}' not found")]
    NodeNotFound(String),

    #[error("road from '{from}' to '{to}' already exists")]
    DuplicateEdge { from: String, to: String },

    #[error("no road from '{from}' to '{to}'")]
    EdgeNotFound { from: String, to: String },

    #[error("invalid road weight {0}: must be a positive integer")]
    InvalidWeight(i64),

    #[error("road from '{0}' to itself is not allowed")]
    SelfLoop(String),

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller abandoned a path search before it finished.
    #[error("path search cancelled")]
    Cancelled,
}

pub type GraphResult<T> = Result<T, GraphError>;

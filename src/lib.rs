//! Graphmatch
//!
//! Subgraph pattern matching over property graphs. A pattern is evaluated as
//! a tree of plan nodes that turn stored elements into embeddings and join
//! partial matches, enforcing isomorphism or homomorphism semantics as they
//! go.
//!
//! # Architecture
//!
//! - `graph`: identifiers, property values, stored vertices and edges, and
//!   the scan interface of a graph store
//! - `query::embedding`: positional match records and their column metadata
//! - `query::plan`: the plan-node algebra (scans, filter, project, joins)
//! - `query::dataflow`: lazy dataflow descriptions and an in-process engine
//! - `config`: engine configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use graphmatch::graph::GraphStore;
//! use graphmatch::query::{
//!     ExecutionEnvironment, LocalEnvironment, MatchStrategy, PlanNode, ValueJoinNode, VertexScanNode,
//! };
//! use std::sync::Arc;
//!
//! let mut store = GraphStore::new();
//! let alice = store.create_vertex("Person");
//! let bob = store.create_vertex("Person");
//! store.get_vertex_mut(alice).unwrap().set_property("age", 30i64);
//! store.get_vertex_mut(bob).unwrap().set_property("age", 30i64);
//! let store = Arc::new(store);
//!
//! let a = VertexScanNode::new(store.clone(), "a", Some("Person".to_string()), vec!["age".to_string()]).unwrap();
//! let b = VertexScanNode::new(store, "b", Some("Person".to_string()), vec!["age".to_string()]).unwrap();
//! let same_age = ValueJoinNode::new(
//!     Box::new(a),
//!     Box::new(b),
//!     vec![("a".to_string(), "age".to_string())],
//!     vec![("b".to_string(), "age".to_string())],
//!     MatchStrategy::Isomorphism,
//!     MatchStrategy::Isomorphism,
//! )
//! .unwrap();
//!
//! let rows = LocalEnvironment::default().collect(&same_age.execute()).unwrap();
//! // (alice, bob) and (bob, alice); a vertex is never paired with itself
//! assert_eq!(rows.len(), 2);
//! ```

pub mod codec;
pub mod config;
pub mod graph;
pub mod query;

pub use codec::{CodecError, CodecResult};
pub use config::{ConfigError, ConfigResult, EngineConfig};
pub use graph::{
    Edge, EntryType, GraphElement, GraphError, GraphResult, GraphSource, GraphStore, Identifier,
    IdentifierSet, PropertyMap, PropertyValue, Vertex,
};
pub use query::{
    DataSet, Embedding, EmbeddingMetaData, EngineError, EngineResult, ExecutionEnvironment,
    LocalEnvironment, MatchStrategy, PlanError, PlanNode, PlanResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}

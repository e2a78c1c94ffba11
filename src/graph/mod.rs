//! Graph data model consumed by the matching engine
//!
//! This module contains:
//! - Globally unique identifiers and identifier sets
//! - Typed property values with per-kind equality and ordering
//! - Stored vertices and edges with logical-graph membership
//! - The graph-store scan interface plus an in-memory store

pub mod edge;
pub mod element;
pub mod id_set;
pub mod property;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::Edge;
pub use element::GraphElement;
pub use id_set::IdentifierSet;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphSource, GraphStore};
pub use types::{EntryType, Identifier};
pub use vertex::Vertex;

//! Graph storage collaborator
//!
//! Leaf plan nodes read stored elements through the [`GraphSource`] trait.
//! [`GraphStore`] is the in-memory implementation used by tests, benchmarks
//! and embedded callers; persistent stores implement the same trait.

use super::edge::Edge;
use super::element::GraphElement;
use super::property::PropertyMap;
use super::types::Identifier;
use super::vertex::Vertex;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Vertex {0} not found")]
    VertexNotFound(Identifier),

    #[error("Edge {0} not found")]
    EdgeNotFound(Identifier),

    #[error("Invalid edge: source vertex {0} does not exist")]
    InvalidEdgeSource(Identifier),

    #[error("Invalid edge: target vertex {0} does not exist")]
    InvalidEdgeTarget(Identifier),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Scan interface offered by a graph store to leaf plan nodes.
///
/// Scans reflect the store's current state and must be repeatable: calling
/// a scan twice without an intervening mutation yields the same elements.
pub trait GraphSource: Send + Sync {
    /// All vertices, optionally restricted to one label
    fn vertices(&self, label: Option<&str>) -> Vec<Vertex>;

    /// All edges, optionally restricted to one label
    fn edges(&self, label: Option<&str>) -> Vec<Edge>;
}

/// In-memory graph storage
///
/// Elements are kept in insertion order so scans are deterministic.
#[derive(Debug, Default)]
pub struct GraphStore {
    vertices: IndexMap<Identifier, Vertex>,
    edges: IndexMap<Identifier, Edge>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vertex with a fresh identifier
    pub fn create_vertex(&mut self, label: impl Into<String>) -> Identifier {
        self.create_vertex_with_properties(label, PropertyMap::new())
    }

    pub fn create_vertex_with_properties(
        &mut self,
        label: impl Into<String>,
        properties: PropertyMap,
    ) -> Identifier {
        let id = Identifier::get();
        self.insert_vertex(Vertex::new_with_properties(id, label, properties));
        id
    }

    /// Insert a fully built vertex, replacing any vertex with the same id
    pub fn insert_vertex(&mut self, vertex: Vertex) {
        debug!("Stored vertex {} with label {}", vertex.id, vertex.label);
        self.vertices.insert(vertex.id, vertex);
    }

    /// Create an edge between two existing vertices
    pub fn create_edge(
        &mut self,
        source: Identifier,
        target: Identifier,
        label: impl Into<String>,
    ) -> GraphResult<Identifier> {
        let id = Identifier::get();
        self.insert_edge(Edge::new(id, source, target, label))?;
        Ok(id)
    }

    /// Insert a fully built edge; both endpoints must exist
    pub fn insert_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if !self.vertices.contains_key(&edge.source) {
            return Err(GraphError::InvalidEdgeSource(edge.source));
        }
        if !self.vertices.contains_key(&edge.target) {
            return Err(GraphError::InvalidEdgeTarget(edge.target));
        }
        debug!("Stored edge {} ({} -> {})", edge.id, edge.source, edge.target);
        self.edges.insert(edge.id, edge);
        Ok(())
    }

    pub fn get_vertex(&self, id: Identifier) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn get_vertex_mut(&mut self, id: Identifier) -> Option<&mut Vertex> {
        self.vertices.get_mut(&id)
    }

    pub fn get_edge(&self, id: Identifier) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn get_edge_mut(&mut self, id: Identifier) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// Add a vertex to a logical graph
    pub fn add_vertex_to_graph(&mut self, vertex: Identifier, graph: Identifier) -> GraphResult<()> {
        self.vertices
            .get_mut(&vertex)
            .ok_or(GraphError::VertexNotFound(vertex))?
            .add_to_graph(graph);
        Ok(())
    }

    /// Add an edge to a logical graph
    pub fn add_edge_to_graph(&mut self, edge: Identifier, graph: Identifier) -> GraphResult<()> {
        self.edges
            .get_mut(&edge)
            .ok_or(GraphError::EdgeNotFound(edge))?
            .add_to_graph(graph);
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphSource for GraphStore {
    fn vertices(&self, label: Option<&str>) -> Vec<Vertex> {
        self.vertices
            .values()
            .filter(|v| label.map_or(true, |l| v.has_label(l)))
            .cloned()
            .collect()
    }

    fn edges(&self, label: Option<&str>) -> Vec<Edge> {
        self.edges
            .values()
            .filter(|e| label.map_or(true, |l| e.has_label(l)))
            .cloned()
            .collect()
    }
}

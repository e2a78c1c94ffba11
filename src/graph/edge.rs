//! Stored directed edge

use super::element::GraphElement;
use super::id_set::IdentifierSet;
use super::property::{PropertyMap, PropertyValue};
use super::types::Identifier;
use serde::{Deserialize, Serialize};

/// A directed edge of the stored graph
///
/// Edges have:
/// - A globally unique identifier
/// - A source vertex (the edge goes FROM this vertex)
/// - A target vertex
/// - A label (relationship type)
/// - Properties (key-value pairs)
/// - The set of logical graphs they belong to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: Identifier,

    /// Source vertex
    pub source: Identifier,

    /// Target vertex
    pub target: Identifier,

    /// Type of relationship (e.g., "KNOWS", "WORKS_AT")
    pub label: String,

    /// Properties associated with this edge
    pub properties: PropertyMap,

    pub graphs: IdentifierSet,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        id: Identifier,
        source: Identifier,
        target: Identifier,
        label: impl Into<String>,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            label: label.into(),
            properties: PropertyMap::new(),
            graphs: IdentifierSet::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }

    /// True if source and target are the same vertex
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

impl GraphElement for Edge {
    fn id(&self) -> Identifier {
        self.id
    }

    fn graph_ids(&self) -> &IdentifierSet {
        &self.graphs
    }

    fn graph_ids_mut(&mut self) -> &mut IdentifierSet {
        &mut self.graphs
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

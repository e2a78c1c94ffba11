//! Stored vertex

use super::element::GraphElement;
use super::id_set::IdentifierSet;
use super::property::{PropertyMap, PropertyValue};
use super::types::Identifier;
use serde::{Deserialize, Serialize};

/// A vertex of the stored graph
///
/// Vertices have:
/// - A globally unique identifier
/// - A label
/// - Properties (key-value pairs)
/// - The set of logical graphs they belong to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier for this vertex
    pub id: Identifier,

    pub label: String,

    /// Properties associated with this vertex
    pub properties: PropertyMap,

    /// Logical graphs containing this vertex
    pub graphs: IdentifierSet,
}

impl Vertex {
    pub fn new(id: Identifier, label: impl Into<String>) -> Self {
        Vertex {
            id,
            label: label.into(),
            properties: PropertyMap::new(),
            graphs: IdentifierSet::new(),
        }
    }

    pub fn new_with_properties(
        id: Identifier,
        label: impl Into<String>,
        properties: PropertyMap,
    ) -> Self {
        Vertex {
            id,
            label: label.into(),
            properties,
            graphs: IdentifierSet::new(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }
}

impl GraphElement for Vertex {
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

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

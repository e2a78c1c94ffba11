//! Graph membership capability shared by stored vertices and edges

use super::id_set::IdentifierSet;
use super::types::Identifier;

/// A graph element is part of zero or more logical graphs.
///
/// Implementors own their membership set; mutation stays local to the
/// element. Only [`GraphElement::graph_ids`] and
/// [`GraphElement::graph_ids_mut`] need to be provided.
pub trait GraphElement {
    /// Identifier of the element itself
    fn id(&self) -> Identifier;

    fn graph_ids(&self) -> &IdentifierSet;

    fn graph_ids_mut(&mut self) -> &mut IdentifierSet;

    /// All graphs this element belongs to, in no particular order
    fn graphs(&self) -> Vec<Identifier> {
        self.graph_ids().to_vec()
    }

    /// Add the element to a graph. Adding twice is a no-op.
    fn add_to_graph(&mut self, graph: Identifier) {
        self.graph_ids_mut().add(graph);
    }

    fn graph_count(&self) -> usize {
        self.graph_ids().len()
    }

    fn in_graph(&self, graph: &Identifier) -> bool {
        self.graph_ids().contains(graph)
    }
}

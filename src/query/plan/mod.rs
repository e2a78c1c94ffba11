//! Plan-node algebra
//!
//! A plan is an immutable tree of [`PlanNode`]s. Every node derives its
//! [`EmbeddingMetaData`] once, at construction, from its parameters and its
//! children's metadata; all resolution errors surface there. `execute`
//! returns a lazy [`DataSet`] whose rows conform to that metadata.
//!
//! Node kinds:
//! - leaves: [`VertexScanNode`], [`EdgeScanNode`], [`EmbeddingsNode`]
//! - unary: [`FilterEmbeddingsNode`], [`ProjectEmbeddingsNode`]
//! - binary: [`ValueJoinNode`], [`JoinEmbeddingsNode`]

pub mod distinct;
pub mod filter;
pub mod join_embeddings;
pub mod leaf;
pub mod project;
pub mod value_join;

pub use distinct::{has_distinct_entries, DistinctColumns};
pub use filter::{Comparator, FilterEmbeddingsNode, Operand, Predicate};
pub use join_embeddings::JoinEmbeddingsNode;
pub use leaf::{EdgeScanNode, EmbeddingsNode, VertexScanNode};
pub use project::ProjectEmbeddingsNode;
pub use value_join::ValueJoinNode;

use crate::graph::PropertyValue;
use crate::query::dataflow::{DataSet, JoinKey, KeyFn};
use crate::query::embedding::{Embedding, EmbeddingMetaData};
use std::fmt::{self, Write};
use std::sync::Arc;

/// A node of a plan tree
pub trait PlanNode: fmt::Display + Send + Sync {
    /// Schema of every embedding this node produces
    fn meta_data(&self) -> &EmbeddingMetaData;

    /// Lazy description of this node's output. Can be evaluated any number
    /// of times; every evaluation yields the same multiset for the same store
    /// state.
    fn execute(&self) -> DataSet;

    /// Direct inputs, left to right
    fn children(&self) -> Vec<&dyn PlanNode> {
        Vec::new()
    }
}

/// Type alias for boxed plan nodes
pub type PlanNodeBox = Box<dyn PlanNode>;

/// Render a plan tree, one node per line, children indented
pub fn explain(node: &dyn PlanNode) -> String {
    let mut out = String::new();
    explain_into(node, 0, &mut out);
    out
}

fn explain_into(node: &dyn PlanNode, depth: usize, out: &mut String) {
    // Writing to a String never fails
    let _ = writeln!(out, "{:indent$}{}", "", node, indent = depth * 2);
    for child in node.children() {
        explain_into(child, depth + 1, out);
    }
}

/// Key extractor over property columns
pub(crate) fn property_key(columns: Vec<usize>) -> KeyFn {
    Arc::new(move |embedding: &Embedding| {
        JoinKey::Values(
            columns
                .iter()
                .map(|&c| embedding.property(c).cloned().unwrap_or(PropertyValue::Null))
                .collect(),
        )
    })
}

/// Key extractor over entry columns
pub(crate) fn entry_key(columns: Vec<usize>) -> KeyFn {
    Arc::new(move |embedding: &Embedding| {
        JoinKey::Ids(columns.iter().filter_map(|&c| embedding.id(c)).collect())
    })
}

pub(crate) fn fmt_pairs(f: &mut fmt::Formatter<'_>, pairs: &[(String, String)]) -> fmt::Result {
    write!(f, "[")?;
    for (i, (variable, key)) in pairs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}.{}", variable, key)?;
    }
    write!(f, "]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EntryType, Identifier};
    use crate::query::MatchStrategy;

    fn rows_node(variable: &str, key: &str, rows: Vec<(u64, i64)>) -> EmbeddingsNode {
        let mut meta = EmbeddingMetaData::new();
        meta.set_entry_column(variable, EntryType::Vertex, 0).unwrap();
        meta.set_property_column(variable, key, 0).unwrap();
        let rows = rows
            .into_iter()
            .map(|(id, v)| Embedding::from_parts(vec![Identifier::from_long(id)], vec![v.into()]))
            .collect();
        EmbeddingsNode::new("rows", meta, rows)
    }

    #[test]
    fn test_explain_indents_children() {
        let join = ValueJoinNode::new(
            Box::new(rows_node("a", "age", vec![])),
            Box::new(rows_node("b", "age", vec![])),
            vec![("a".to_string(), "age".to_string())],
            vec![("b".to_string(), "age".to_string())],
            MatchStrategy::Isomorphism,
            MatchStrategy::Homomorphism,
        )
        .unwrap();

        let rendered = explain(&join);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ValueJoin"));
        assert!(lines[1].starts_with("  Embeddings(rows"));
        assert!(lines[2].starts_with("  Embeddings(rows"));
    }

    #[test]
    fn test_key_extractors() {
        let row = Embedding::from_parts(
            vec![Identifier::from_long(1), Identifier::from_long(2)],
            vec![PropertyValue::Integer(5)],
        );
        assert_eq!(
            property_key(vec![0, 3])(&row),
            JoinKey::Values(vec![PropertyValue::Integer(5), PropertyValue::Null])
        );
        assert_eq!(
            entry_key(vec![1])(&row),
            JoinKey::Ids(vec![Identifier::from_long(2)])
        );
    }
}

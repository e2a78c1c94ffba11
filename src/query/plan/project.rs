//! Projection node

use super::{fmt_pairs, PlanNode, PlanNodeBox};
use crate::query::dataflow::DataSet;
use crate::query::embedding::EmbeddingMetaData;
use crate::query::PlanResult;
use std::fmt;
use tracing::debug;

/// Keeps only the listed property columns, in the listed order.
/// Entry columns pass through unchanged.
pub struct ProjectEmbeddingsNode {
    child: PlanNodeBox,
    keep: Vec<(String, String)>,
    columns: Vec<usize>,
    meta_data: EmbeddingMetaData,
}

impl ProjectEmbeddingsNode {
    pub fn new(child: PlanNodeBox, keep: Vec<(String, String)>) -> PlanResult<Self> {
        let child_meta = child.meta_data();
        let mut meta_data = EmbeddingMetaData::new();
        for (variable, column, entry_type) in child_meta.entries() {
            meta_data.set_entry_column(variable, entry_type, column)?;
        }

        let mut columns = Vec::with_capacity(keep.len());
        for (variable, key) in &keep {
            columns.push(child_meta.property_column(variable, key)?);
            meta_data.push_property_column(variable.as_str(), key.as_str())?;
        }
        debug!("Project {:?} -> {}", columns, meta_data);

        Ok(Self {
            child,
            keep,
            columns,
            meta_data,
        })
    }

    /// Child property columns kept, in output order
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }
}

impl PlanNode for ProjectEmbeddingsNode {
    fn meta_data(&self) -> &EmbeddingMetaData {
        &self.meta_data
    }

    fn execute(&self) -> DataSet {
        let columns = self.columns.clone();
        self.child
            .execute()
            .map(self.to_string(), move |embedding| embedding.project_properties(&columns))
    }

    fn children(&self) -> Vec<&dyn PlanNode> {
        vec![self.child.as_ref()]
    }
}

impl fmt::Display for ProjectEmbeddingsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectEmbeddings(")?;
        fmt_pairs(f, &self.keep)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EntryType, Identifier, PropertyValue};
    use crate::query::dataflow::{ExecutionEnvironment, LocalEnvironment};
    use crate::query::embedding::Embedding;
    use crate::query::plan::EmbeddingsNode;
    use crate::query::PlanError;

    fn child() -> PlanNodeBox {
        let mut meta = EmbeddingMetaData::new();
        meta.push_entry_column("a", EntryType::Vertex).unwrap();
        meta.push_entry_column("e", EntryType::Edge).unwrap();
        meta.push_property_column("a", "name").unwrap();
        meta.push_property_column("a", "age").unwrap();
        meta.push_property_column("e", "since").unwrap();
        let row = Embedding::from_parts(
            vec![Identifier::from_long(1), Identifier::from_long(2)],
            vec!["alice".into(), 42i64.into(), 2001i64.into()],
        );
        Box::new(EmbeddingsNode::new("rows", meta, vec![row]))
    }

    fn pair(variable: &str, key: &str) -> (String, String) {
        (variable.to_string(), key.to_string())
    }

    #[test]
    fn test_keeps_listed_properties_in_order() {
        let node = ProjectEmbeddingsNode::new(child(), vec![pair("e", "since"), pair("a", "name")]).unwrap();
        assert_eq!(node.columns(), &[2, 0]);
        assert_eq!(node.meta_data().entry_count(), 2);
        assert_eq!(node.meta_data().property_column("e", "since").unwrap(), 0);
        assert_eq!(node.meta_data().property_column("a", "name").unwrap(), 1);
        assert!(!node.meta_data().contains_property_column("a", "age"));

        let rows = LocalEnvironment::default().collect(&node.execute()).unwrap();
        assert_eq!(
            rows[0].properties(),
            &[PropertyValue::Integer(2001), PropertyValue::String("alice".to_string())]
        );
        assert_eq!(rows[0].entry_count(), 2);
    }

    #[test]
    fn test_unknown_property() {
        let result = ProjectEmbeddingsNode::new(child(), vec![pair("a", "salary")]);
        assert!(matches!(result, Err(PlanError::UnknownProperty { .. })));
    }

    #[test]
    fn test_display() {
        let node = ProjectEmbeddingsNode::new(child(), vec![pair("a", "age")]).unwrap();
        assert_eq!(node.to_string(), "ProjectEmbeddings([a.age])");
    }
}

//! Value join: equi-join of two subplans on property values
//!
//! Given `[(v1, age)]` on the left and `[(v3, age)]` on the right, a left
//! embedding and a right embedding are paired when `v1.age` and `v3.age`
//! hold equal values (same kind, same value). Empty predicate lists produce
//! the cross product. The output is the concatenation of both sides; no
//! column is dropped, not even a join key.
//!
//! Each side carries its own [`MatchStrategy`]. An isomorphism side adds its
//! vertex and edge columns to the cross-side distinctness check, and pairs
//! that would bind one graph element to two same-typed columns are dropped.

use super::distinct::DistinctColumns;
use super::{fmt_pairs, property_key, PlanNode, PlanNodeBox};
use crate::config::EngineConfig;
use crate::query::dataflow::{CombineFn, DataSet};
use crate::query::embedding::{Embedding, EmbeddingMetaData};
use crate::query::{MatchStrategy, PlanError, PlanResult};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub struct ValueJoinNode {
    left: PlanNodeBox,
    right: PlanNodeBox,
    left_properties: Vec<(String, String)>,
    right_properties: Vec<(String, String)>,
    left_strategy: MatchStrategy,
    right_strategy: MatchStrategy,
    join_key_columns_left: Vec<usize>,
    join_key_columns_right: Vec<usize>,
    distinct_left: DistinctColumns,
    distinct_right: DistinctColumns,
    meta_data: EmbeddingMetaData,
}

fn resolve_keys(meta: &EmbeddingMetaData, pairs: &[(String, String)]) -> PlanResult<Vec<usize>> {
    pairs
        .iter()
        .map(|(variable, property)| meta.property_column(variable, property))
        .collect()
}

impl ValueJoinNode {
    /// Build a value join.
    ///
    /// `left_properties[i]` is compared with `right_properties[i]`. Fails if
    /// the lists differ in length, if a pair does not resolve in its side's
    /// metadata, or if both sides bind the same variable.
    pub fn new(
        left: PlanNodeBox,
        right: PlanNodeBox,
        left_properties: Vec<(String, String)>,
        right_properties: Vec<(String, String)>,
        left_strategy: MatchStrategy,
        right_strategy: MatchStrategy,
    ) -> PlanResult<Self> {
        if left_properties.len() != right_properties.len() {
            return Err(PlanError::ArityMismatch {
                left: left_properties.len(),
                right: right_properties.len(),
            });
        }
        let join_key_columns_left = resolve_keys(left.meta_data(), &left_properties)?;
        let join_key_columns_right = resolve_keys(right.meta_data(), &right_properties)?;
        let meta_data = EmbeddingMetaData::concat(left.meta_data(), right.meta_data())?;

        let distinct_left = DistinctColumns::for_side(left.meta_data(), left_strategy, &[]);
        let distinct_right = DistinctColumns::for_side(right.meta_data(), right_strategy, &[]);

        debug!(
            "ValueJoin keys left={:?} right={:?}, distinct left={:?} right={:?}",
            join_key_columns_left, join_key_columns_right, distinct_left, distinct_right
        );

        Ok(Self {
            left,
            right,
            left_properties,
            right_properties,
            left_strategy,
            right_strategy,
            join_key_columns_left,
            join_key_columns_right,
            distinct_left,
            distinct_right,
            meta_data,
        })
    }

    /// Value join with `config.strategy` on both sides
    pub fn with_config(
        left: PlanNodeBox,
        right: PlanNodeBox,
        left_properties: Vec<(String, String)>,
        right_properties: Vec<(String, String)>,
        config: &EngineConfig,
    ) -> PlanResult<Self> {
        Self::new(left, right, left_properties, right_properties, config.strategy, config.strategy)
    }

    /// Left property columns compared by the join, in predicate order
    pub fn join_key_columns_left(&self) -> &[usize] {
        &self.join_key_columns_left
    }

    pub fn join_key_columns_right(&self) -> &[usize] {
        &self.join_key_columns_right
    }

    /// Left vertex columns checked across sides; empty under homomorphism
    pub fn distinct_vertex_columns_left(&self) -> &[usize] {
        self.distinct_left.vertex_columns()
    }

    pub fn distinct_vertex_columns_right(&self) -> &[usize] {
        self.distinct_right.vertex_columns()
    }

    pub fn distinct_edge_columns_left(&self) -> &[usize] {
        self.distinct_left.edge_columns()
    }

    pub fn distinct_edge_columns_right(&self) -> &[usize] {
        self.distinct_right.edge_columns()
    }

    pub fn left_strategy(&self) -> MatchStrategy {
        self.left_strategy
    }

    pub fn right_strategy(&self) -> MatchStrategy {
        self.right_strategy
    }
}

impl PlanNode for ValueJoinNode {
    fn meta_data(&self) -> &EmbeddingMetaData {
        &self.meta_data
    }

    fn execute(&self) -> DataSet {
        let left = self.left.execute();
        let right = self.right.execute();

        let distinct_left = self.distinct_left.clone();
        let distinct_right = self.distinct_right.clone();
        let combine: CombineFn = Arc::new(move |l: &Embedding, r: &Embedding| {
            if DistinctColumns::disjoint(l, &distinct_left, r, &distinct_right) {
                Some(l.concat(r))
            } else {
                None
            }
        });

        if self.join_key_columns_left.is_empty() {
            left.cross(&right, self.to_string(), combine)
        } else {
            left.join(
                &right,
                self.to_string(),
                property_key(self.join_key_columns_left.clone()),
                property_key(self.join_key_columns_right.clone()),
                combine,
            )
        }
    }

    fn children(&self) -> Vec<&dyn PlanNode> {
        vec![self.left.as_ref(), self.right.as_ref()]
    }
}

impl fmt::Display for ValueJoinNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueJoin(")?;
        fmt_pairs(f, &self.left_properties)?;
        write!(f, " = ")?;
        fmt_pairs(f, &self.right_properties)?;
        write!(f, ", {}/{})", self.left_strategy, self.right_strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EntryType, Identifier, PropertyValue};
    use crate::query::dataflow::{ExecutionEnvironment, LocalEnvironment};
    use crate::query::plan::EmbeddingsNode;

    fn pair(variable: &str, key: &str) -> (String, String) {
        (variable.to_string(), key.to_string())
    }

    fn vertices(variable: &str, rows: &[(u64, i64)]) -> PlanNodeBox {
        let mut meta = EmbeddingMetaData::new();
        meta.push_entry_column(variable, EntryType::Vertex).unwrap();
        meta.push_property_column(variable, "age").unwrap();
        let rows = rows
            .iter()
            .map(|&(id, age)| Embedding::from_parts(vec![Identifier::from_long(id)], vec![age.into()]))
            .collect();
        Box::new(EmbeddingsNode::new(variable, meta, rows))
    }

    fn ids(rows: &[Embedding]) -> Vec<Vec<u128>> {
        let mut ids: Vec<Vec<u128>> = rows
            .iter()
            .map(|r| r.all_ids().iter().map(|i| i.as_u128()).collect())
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_strategy_from_config() {
        let config = EngineConfig {
            strategy: MatchStrategy::Homomorphism,
            ..EngineConfig::sequential()
        };
        let join = ValueJoinNode::with_config(
            vertices("a", &[(1, 30), (2, 30)]),
            vertices("b", &[(1, 30), (2, 30)]),
            vec![pair("a", "age")],
            vec![pair("b", "age")],
            &config,
        )
        .unwrap();
        assert_eq!(join.left_strategy(), MatchStrategy::Homomorphism);
        assert_eq!(join.right_strategy(), MatchStrategy::Homomorphism);
        assert_eq!(LocalEnvironment::new(config).collect(&join.execute()).unwrap().len(), 4);

        let join = ValueJoinNode::with_config(
            vertices("a", &[(1, 30), (2, 30)]),
            vertices("b", &[(1, 30), (2, 30)]),
            vec![pair("a", "age")],
            vec![pair("b", "age")],
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(join.distinct_vertex_columns_left(), &[0]);
        assert_eq!(LocalEnvironment::default().collect(&join.execute()).unwrap().len(), 2);
    }

    #[test]
    fn test_arity_mismatch_is_checked_first() {
        let result = ValueJoinNode::new(
            vertices("a", &[]),
            vertices("b", &[]),
            vec![pair("a", "age"), pair("a", "missing")],
            vec![pair("b", "age")],
            MatchStrategy::Isomorphism,
            MatchStrategy::Isomorphism,
        );
        assert!(matches!(result, Err(PlanError::ArityMismatch { left: 2, right: 1 })));
    }

    #[test]
    fn test_keys_resolve_per_side() {
        let result = ValueJoinNode::new(
            vertices("a", &[]),
            vertices("b", &[]),
            vec![pair("a", "age")],
            vec![pair("a", "age")],
            MatchStrategy::Isomorphism,
            MatchStrategy::Isomorphism,
        );
        assert_eq!(result.err(), Some(PlanError::UnknownVariable("a".to_string())));
    }

    #[test]
    fn test_shared_variable_is_rejected() {
        let result = ValueJoinNode::new(
            vertices("a", &[]),
            vertices("a", &[]),
            vec![],
            vec![],
            MatchStrategy::Isomorphism,
            MatchStrategy::Isomorphism,
        );
        assert_eq!(result.err(), Some(PlanError::DuplicateVariable("a".to_string())));
    }

    #[test]
    fn test_join_matches_values_with_multiplicity() {
        let node = ValueJoinNode::new(
            vertices("a", &[(1, 30), (2, 40)]),
            vertices("b", &[(3, 30), (4, 30), (5, 50)]),
            vec![pair("a", "age")],
            vec![pair("b", "age")],
            MatchStrategy::Isomorphism,
            MatchStrategy::Isomorphism,
        )
        .unwrap();

        let rows = LocalEnvironment::default().collect(&node.execute()).unwrap();
        assert_eq!(ids(&rows), vec![vec![1, 3], vec![1, 4]]);
        assert!(rows
            .iter()
            .all(|r| r.properties() == [PropertyValue::Integer(30), PropertyValue::Integer(30)]));
    }

    #[test]
    fn test_same_vertex_on_both_sides() {
        let build = |left: MatchStrategy, right: MatchStrategy| {
            ValueJoinNode::new(
                vertices("a", &[(1, 30), (2, 30)]),
                vertices("b", &[(1, 30)]),
                vec![pair("a", "age")],
                vec![pair("b", "age")],
                left,
                right,
            )
            .unwrap()
        };
        let env = LocalEnvironment::default();

        let iso = build(MatchStrategy::Isomorphism, MatchStrategy::Isomorphism);
        assert_eq!(ids(&env.collect(&iso.execute()).unwrap()), vec![vec![2, 1]]);

        let mixed = build(MatchStrategy::Isomorphism, MatchStrategy::Homomorphism);
        assert_eq!(ids(&env.collect(&mixed.execute()).unwrap()), vec![vec![1, 1], vec![2, 1]]);
    }

    #[test]
    fn test_cross_join_without_keys() {
        let node = ValueJoinNode::new(
            vertices("a", &[(1, 1), (2, 2)]),
            vertices("b", &[(2, 3), (3, 4)]),
            vec![],
            vec![],
            MatchStrategy::Isomorphism,
            MatchStrategy::Isomorphism,
        )
        .unwrap();
        assert!(node.join_key_columns_left().is_empty());

        let rows = LocalEnvironment::default().collect(&node.execute()).unwrap();
        assert_eq!(ids(&rows), vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn test_cross_kind_values_never_match() {
        let mut meta = EmbeddingMetaData::new();
        meta.push_entry_column("b", EntryType::Vertex).unwrap();
        meta.push_property_column("b", "age").unwrap();
        let floats = EmbeddingsNode::new(
            "b",
            meta,
            vec![Embedding::from_parts(vec![Identifier::from_long(9)], vec![PropertyValue::Float(30.0)])],
        );

        let node = ValueJoinNode::new(
            vertices("a", &[(1, 30)]),
            Box::new(floats),
            vec![pair("a", "age")],
            vec![pair("b", "age")],
            MatchStrategy::Homomorphism,
            MatchStrategy::Homomorphism,
        )
        .unwrap();
        assert!(LocalEnvironment::default().collect(&node.execute()).unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        let node = ValueJoinNode::new(
            vertices("a", &[]),
            vertices("b", &[]),
            vec![pair("a", "age")],
            vec![pair("b", "age")],
            MatchStrategy::Isomorphism,
            MatchStrategy::Homomorphism,
        )
        .unwrap();
        assert_eq!(node.to_string(), "ValueJoin([a.age] = [b.age], ISOMORPHISM/HOMOMORPHISM)");
    }
}

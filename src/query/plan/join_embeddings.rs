//! Join on shared pattern variables
//!
//! Two partial matches that bind a variable to the same graph element are
//! merged into one. Unlike [`ValueJoinNode`](super::ValueJoinNode), the
//! join variables appear only once in the output: the right side's copy of
//! each join column is dropped, as is any right property column the left side
//! already carries.

use super::distinct::DistinctColumns;
use super::{entry_key, PlanNode, PlanNodeBox};
use crate::config::EngineConfig;
use crate::query::dataflow::{CombineFn, DataSet};
use crate::query::embedding::{Embedding, EmbeddingMetaData};
use crate::query::{MatchStrategy, PlanError, PlanResult};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub struct JoinEmbeddingsNode {
    left: PlanNodeBox,
    right: PlanNodeBox,
    join_variables: Vec<String>,
    left_strategy: MatchStrategy,
    right_strategy: MatchStrategy,
    join_columns_left: Vec<usize>,
    join_columns_right: Vec<usize>,
    /// Right property columns already present on the left
    dropped_properties_right: Vec<usize>,
    distinct_left: DistinctColumns,
    distinct_right: DistinctColumns,
    meta_data: EmbeddingMetaData,
}

impl JoinEmbeddingsNode {
    /// Build a join on `join_variables`.
    ///
    /// Every join variable must be bound on both sides with the same entry
    /// type. Any other variable bound on both sides is rejected.
    pub fn new(
        left: PlanNodeBox,
        right: PlanNodeBox,
        join_variables: Vec<String>,
        left_strategy: MatchStrategy,
        right_strategy: MatchStrategy,
    ) -> PlanResult<Self> {
        let left_meta = left.meta_data();
        let right_meta = right.meta_data();

        let mut join_columns_left = Vec::with_capacity(join_variables.len());
        let mut join_columns_right = Vec::with_capacity(join_variables.len());
        for (i, variable) in join_variables.iter().enumerate() {
            if join_variables[..i].contains(variable) {
                return Err(PlanError::DuplicateVariable(variable.clone()));
            }
            let existing = left_meta.entry_type(variable)?;
            let requested = right_meta.entry_type(variable)?;
            if existing != requested {
                return Err(PlanError::EntryTypeConflict {
                    variable: variable.clone(),
                    existing,
                    requested,
                });
            }
            join_columns_left.push(left_meta.entry_column(variable)?);
            join_columns_right.push(right_meta.entry_column(variable)?);
        }

        let mut meta_data = EmbeddingMetaData::new();
        for (variable, _, entry_type) in left_meta.entries() {
            meta_data.push_entry_column(variable, entry_type)?;
        }
        for (variable, _, entry_type) in right_meta.entries() {
            if join_variables.iter().any(|v| v == variable) {
                continue;
            }
            if meta_data.contains_entry_column(variable) {
                return Err(PlanError::DuplicateVariable(variable.to_string()));
            }
            meta_data.push_entry_column(variable, entry_type)?;
        }

        for (variable, property, _) in left_meta.properties() {
            meta_data.push_property_column(variable, property)?;
        }
        let mut dropped_properties_right = Vec::new();
        for (variable, property, column) in right_meta.properties() {
            if meta_data.contains_property_column(variable, property) {
                dropped_properties_right.push(column);
            } else {
                meta_data.push_property_column(variable, property)?;
            }
        }

        let distinct_left = DistinctColumns::for_side(left_meta, left_strategy, &[]);
        let distinct_right = DistinctColumns::for_side(right_meta, right_strategy, &join_columns_right);

        debug!(
            "JoinEmbeddings on {:?}: left={:?} right={:?} -> {}",
            join_variables, join_columns_left, join_columns_right, meta_data
        );

        Ok(Self {
            left,
            right,
            join_variables,
            left_strategy,
            right_strategy,
            join_columns_left,
            join_columns_right,
            dropped_properties_right,
            distinct_left,
            distinct_right,
            meta_data,
        })
    }

    /// Join on `join_variables` with `config.strategy` on both sides
    pub fn with_config(
        left: PlanNodeBox,
        right: PlanNodeBox,
        join_variables: Vec<String>,
        config: &EngineConfig,
    ) -> PlanResult<Self> {
        Self::new(left, right, join_variables, config.strategy, config.strategy)
    }

    pub fn join_columns_left(&self) -> &[usize] {
        &self.join_columns_left
    }

    pub fn join_columns_right(&self) -> &[usize] {
        &self.join_columns_right
    }

    pub fn distinct_columns_left(&self) -> &DistinctColumns {
        &self.distinct_left
    }

    /// Right distinct columns, join columns excluded
    pub fn distinct_columns_right(&self) -> &DistinctColumns {
        &self.distinct_right
    }
}

impl PlanNode for JoinEmbeddingsNode {
    fn meta_data(&self) -> &EmbeddingMetaData {
        &self.meta_data
    }

    fn execute(&self) -> DataSet {
        let left = self.left.execute();
        let right = self.right.execute();

        let distinct_left = self.distinct_left.clone();
        let distinct_right = self.distinct_right.clone();
        let drop_entries = self.join_columns_right.clone();
        let drop_properties = self.dropped_properties_right.clone();
        let combine: CombineFn = Arc::new(move |l: &Embedding, r: &Embedding| {
            if !DistinctColumns::disjoint(l, &distinct_left, r, &distinct_right) {
                return None;
            }
            Some(l.concat(&r.without_columns(&drop_entries, &drop_properties)))
        });

        if self.join_variables.is_empty() {
            left.cross(&right, self.to_string(), combine)
        } else {
            left.join(
                &right,
                self.to_string(),
                entry_key(self.join_columns_left.clone()),
                entry_key(self.join_columns_right.clone()),
                combine,
            )
        }
    }

    fn children(&self) -> Vec<&dyn PlanNode> {
        vec![self.left.as_ref(), self.right.as_ref()]
    }
}

impl fmt::Display for JoinEmbeddingsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JoinEmbeddings([{}], {}/{})",
            self.join_variables.join(", "),
            self.left_strategy,
            self.right_strategy
        )
    }
}

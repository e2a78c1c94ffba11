//! In-process execution environment
//!
//! Evaluates a [`DataSet`] bottom-up. Joins build a hash table over the left
//! input and probe it with the right input; large inputs are processed with
//! rayon when the configuration allows it. Output order is deterministic for
//! a given input order, but callers must only rely on multiset semantics.

use super::{DataSet, EngineResult, ExecutionEnvironment, JoinKey, Operation};
use crate::config::EngineConfig;
use crate::query::embedding::Embedding;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct LocalEnvironment {
    config: EngineConfig,
}

impl LocalEnvironment {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn parallel_for(&self, rows: usize) -> bool {
        self.config.parallel && rows >= self.config.parallel_threshold
    }

    fn evaluate(&self, data: &DataSet) -> Vec<Embedding> {
        let operation = data.operation();
        let rows = match operation {
            Operation::Source { scan, .. } => scan(),
            Operation::Map { input, function, .. } => {
                let rows = self.evaluate(input);
                if self.parallel_for(rows.len()) {
                    rows.par_iter().map(|row| function(row)).collect()
                } else {
                    rows.iter().map(|row| function(row)).collect()
                }
            }
            Operation::Filter { input, predicate, .. } => {
                let rows = self.evaluate(input);
                if self.parallel_for(rows.len()) {
                    rows.into_par_iter().filter(|row| predicate(row)).collect()
                } else {
                    rows.into_iter().filter(|row| predicate(row)).collect()
                }
            }
            Operation::Join {
                left,
                right,
                left_key,
                right_key,
                combine,
                ..
            } => {
                let left_rows = self.evaluate(left);
                let right_rows = self.evaluate(right);

                let mut table: FxHashMap<JoinKey, Vec<usize>> = FxHashMap::default();
                for (i, row) in left_rows.iter().enumerate() {
                    table.entry(left_key(row)).or_default().push(i);
                }
                trace!("Join build side: {} rows, {} keys", left_rows.len(), table.len());

                let probe = |row: &Embedding| -> Vec<Embedding> {
                    match table.get(&right_key(row)) {
                        Some(matches) => matches
                            .iter()
                            .filter_map(|&i| combine(&left_rows[i], row))
                            .collect(),
                        None => Vec::new(),
                    }
                };
                if self.parallel_for(right_rows.len()) {
                    right_rows.par_iter().flat_map_iter(|row| probe(row)).collect()
                } else {
                    right_rows.iter().flat_map(|row| probe(row)).collect()
                }
            }
            Operation::Cross {
                left,
                right,
                combine,
                ..
            } => {
                let left_rows = self.evaluate(left);
                let right_rows = self.evaluate(right);
                let pair_with = |l: &Embedding| -> Vec<Embedding> {
                    right_rows.iter().filter_map(|r| combine(l, r)).collect()
                };
                if self.parallel_for(left_rows.len().saturating_mul(right_rows.len())) {
                    left_rows.par_iter().flat_map_iter(|l| pair_with(l)).collect()
                } else {
                    left_rows.iter().flat_map(|l| pair_with(l)).collect()
                }
            }
        };
        trace!("{} produced {} rows", operation.name(), rows.len());
        rows
    }
}

impl ExecutionEnvironment for LocalEnvironment {
    fn collect(&self, data: &DataSet) -> EngineResult<Vec<Embedding>> {
        let rows = self.evaluate(data);
        debug!("Collected {} rows from {}", rows.len(), data.operation().name());
        Ok(rows)
    }
}

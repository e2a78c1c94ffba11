//! Pattern matching query engine
//!
//! This module contains:
//! - Matching semantics (isomorphism / homomorphism)
//! - Embeddings and their column metadata
//! - Lazy dataflow descriptions and the local execution environment
//! - The plan-node algebra that joins partial matches

pub mod dataflow;
pub mod embedding;
pub mod plan;
pub mod strategy;

use crate::graph::EntryType;
use thiserror::Error;

pub use dataflow::{DataSet, EngineError, EngineResult, ExecutionEnvironment, LocalEnvironment};
pub use embedding::{Embedding, EmbeddingMetaData};
pub use plan::{
    explain, has_distinct_entries, Comparator, EdgeScanNode, EmbeddingsNode, FilterEmbeddingsNode,
    JoinEmbeddingsNode, Operand, PlanNode, PlanNodeBox, Predicate, ProjectEmbeddingsNode,
    ValueJoinNode, VertexScanNode,
};
pub use strategy::MatchStrategy;

/// Plan construction errors.
///
/// All of them are raised while building a plan node, before any data is
/// touched. A plan that fails to build must be fixed, not retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown property: {variable}.{property}")]
    UnknownProperty { variable: String, property: String },

    /// Left and right join predicate lists differ in length
    #[error("Join predicate arity mismatch: {left} left vs {right} right")]
    ArityMismatch { left: usize, right: usize },

    #[error("Variable already bound: {0}")]
    DuplicateVariable(String),

    #[error("Property already bound: {variable}.{property}")]
    DuplicateProperty { variable: String, property: String },

    #[error("Column {column} already taken in {space} index space")]
    DuplicateColumn { space: &'static str, column: usize },

    /// Binding the column would leave a gap in a dense index space
    #[error("Column {column} out of range in {space} index space, next free column is {next}")]
    ColumnOutOfRange {
        space: &'static str,
        column: usize,
        next: usize,
    },

    #[error("Variable {variable} is {existing}, can not rebind as {requested}")]
    EntryTypeConflict {
        variable: String,
        existing: EntryType,
        requested: EntryType,
    },
}

pub type PlanResult<T> = Result<T, PlanError>;

//! Lazy dataflow descriptions
//!
//! `PlanNode::execute` does not touch data. It returns a [`DataSet`], an
//! immutable tree of operations (source, map, filter, equi-join, cross
//! product) whose functions are pure. An [`ExecutionEnvironment`] decides
//! how to evaluate it: [`LocalEnvironment`] runs it in-process, a
//! distributed engine can walk [`DataSet::operation`] and translate every
//! node into its own collection API. Because every function is pure and
//! every source is repeatable, evaluating the same `DataSet` twice yields the
//! same multiset of embeddings, so retries are always safe.

pub mod local;

pub use local::LocalEnvironment;

use crate::graph::{Identifier, PropertyValue};
use crate::query::embedding::Embedding;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by an execution environment
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Execution failed: {0}")]
    Execution(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Repeatable producer of the rows of a source
pub type SourceFn = Arc<dyn Fn() -> Vec<Embedding> + Send + Sync>;
pub type MapFn = Arc<dyn Fn(&Embedding) -> Embedding + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(&Embedding) -> bool + Send + Sync>;
/// Extracts the equi-join key of a row
pub type KeyFn = Arc<dyn Fn(&Embedding) -> JoinKey + Send + Sync>;
/// Combines a candidate pair; `None` drops the pair
pub type CombineFn = Arc<dyn Fn(&Embedding, &Embedding) -> Option<Embedding> + Send + Sync>;

/// Equi-join key. Equality is the engine's key comparator: tuples match iff
/// they have the same variant, length and pairwise-equal components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    /// Property values, compared by kind and value
    Values(Vec<PropertyValue>),
    /// Entry identifiers
    Ids(Vec<Identifier>),
}

/// One node of a dataflow description
pub enum Operation {
    Source {
        name: String,
        scan: SourceFn,
    },
    Map {
        name: String,
        input: DataSet,
        function: MapFn,
    },
    Filter {
        name: String,
        input: DataSet,
        predicate: FilterFn,
    },
    /// Inner equi-join with multiset semantics
    Join {
        name: String,
        left: DataSet,
        right: DataSet,
        left_key: KeyFn,
        right_key: KeyFn,
        combine: CombineFn,
    },
    /// Cross product with multiset semantics
    Cross {
        name: String,
        left: DataSet,
        right: DataSet,
        combine: CombineFn,
    },
}

impl Operation {
    pub fn name(&self) -> &str {
        match self {
            Operation::Source { name, .. }
            | Operation::Map { name, .. }
            | Operation::Filter { name, .. }
            | Operation::Join { name, .. }
            | Operation::Cross { name, .. } => name,
        }
    }

    fn inputs(&self) -> Vec<&DataSet> {
        match self {
            Operation::Source { .. } => vec![],
            Operation::Map { input, .. } | Operation::Filter { input, .. } => vec![input],
            Operation::Join { left, right, .. } | Operation::Cross { left, right, .. } => {
                vec![left, right]
            }
        }
    }
}

/// Cheaply clonable handle to a dataflow description
#[derive(Clone)]
pub struct DataSet {
    operation: Arc<Operation>,
}

impl DataSet {
    fn wrap(operation: Operation) -> Self {
        Self {
            operation: Arc::new(operation),
        }
    }

    pub fn source<F>(name: impl Into<String>, scan: F) -> Self
    where
        F: Fn() -> Vec<Embedding> + Send + Sync + 'static,
    {
        Self::wrap(Operation::Source {
            name: name.into(),
            scan: Arc::new(scan),
        })
    }

    /// Source over a fixed collection of rows
    pub fn from_embeddings(name: impl Into<String>, rows: Vec<Embedding>) -> Self {
        let rows = Arc::new(rows);
        Self::source(name, move || rows.as_ref().clone())
    }

    pub fn map<F>(&self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Embedding) -> Embedding + Send + Sync + 'static,
    {
        Self::wrap(Operation::Map {
            name: name.into(),
            input: self.clone(),
            function: Arc::new(function),
        })
    }

    pub fn filter<F>(&self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Embedding) -> bool + Send + Sync + 'static,
    {
        Self::wrap(Operation::Filter {
            name: name.into(),
            input: self.clone(),
            predicate: Arc::new(predicate),
        })
    }

    pub fn join(
        &self,
        right: &DataSet,
        name: impl Into<String>,
        left_key: KeyFn,
        right_key: KeyFn,
        combine: CombineFn,
    ) -> Self {
        Self::wrap(Operation::Join {
            name: name.into(),
            left: self.clone(),
            right: right.clone(),
            left_key,
            right_key,
            combine,
        })
    }

    pub fn cross(&self, right: &DataSet, name: impl Into<String>, combine: CombineFn) -> Self {
        Self::wrap(Operation::Cross {
            name: name.into(),
            left: self.clone(),
            right: right.clone(),
            combine,
        })
    }

    /// Root operation, for engines translating the description
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.operation.name(), indent = depth * 2)?;
        for input in self.operation.inputs() {
            input.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Evaluates dataflow descriptions
pub trait ExecutionEnvironment {
    /// Materialize all rows of `data`
    fn collect(&self, data: &DataSet) -> EngineResult<Vec<Embedding>>;
}

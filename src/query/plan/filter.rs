//! Filter node: `WHERE a.age > 30 AND NOT a.name = 'x'`
//!
//! Predicates name properties by `(variable, key)`; they are resolved to
//! property columns of the child's metadata when the node is built. A
//! comparison is true only when both operands hold values of the same kind
//! that satisfy the operator, so `Null` operands and cross-kind comparisons
//! are always false.

use super::{PlanNode, PlanNodeBox};
use crate::graph::PropertyValue;
use crate::query::dataflow::DataSet;
use crate::query::embedding::{Embedding, EmbeddingMetaData};
use crate::query::PlanResult;
use std::cmp::Ordering;
use std::fmt;
use std::mem::discriminant;
use tracing::debug;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    fn evaluate(&self, left: &PropertyValue, right: &PropertyValue) -> bool {
        if left.is_null() || right.is_null() || discriminant(left) != discriminant(right) {
            return false;
        }
        match self {
            Comparator::Eq => left == right,
            Comparator::Ne => left != right,
            Comparator::Lt => left.partial_cmp(right) == Some(Ordering::Less),
            Comparator::Le => matches!(left.partial_cmp(right), Some(Ordering::Less | Ordering::Equal)),
            Comparator::Gt => left.partial_cmp(right) == Some(Ordering::Greater),
            Comparator::Ge => matches!(left.partial_cmp(right), Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// Comparison operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `variable.key`
    Property { variable: String, key: String },
    Literal(PropertyValue),
}

impl Operand {
    pub fn property(variable: impl Into<String>, key: impl Into<String>) -> Self {
        Operand::Property {
            variable: variable.into(),
            key: key.into(),
        }
    }

    pub fn literal(value: impl Into<PropertyValue>) -> Self {
        Operand::Literal(value.into())
    }

    fn resolve(&self, meta: &EmbeddingMetaData) -> PlanResult<ResolvedOperand> {
        match self {
            Operand::Property { variable, key } => Ok(ResolvedOperand::Column(meta.property_column(variable, key)?)),
            Operand::Literal(value) => Ok(ResolvedOperand::Literal(value.clone())),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Property { variable, key } => write!(f, "{}.{}", variable, key),
            Operand::Literal(PropertyValue::String(s)) => write!(f, "'{}'", s),
            Operand::Literal(value) => write!(f, "{}", value),
        }
    }
}

/// Boolean predicate over the property columns of an embedding
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: Comparator,
        right: Operand,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(left: Operand, op: Comparator, right: Operand) -> Self {
        Predicate::Compare { left, op, right }
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    fn resolve(&self, meta: &EmbeddingMetaData) -> PlanResult<ResolvedPredicate> {
        Ok(match self {
            Predicate::Compare { left, op, right } => ResolvedPredicate::Compare {
                left: left.resolve(meta)?,
                op: *op,
                right: right.resolve(meta)?,
            },
            Predicate::And(l, r) => ResolvedPredicate::And(Box::new(l.resolve(meta)?), Box::new(r.resolve(meta)?)),
            Predicate::Or(l, r) => ResolvedPredicate::Or(Box::new(l.resolve(meta)?), Box::new(r.resolve(meta)?)),
            Predicate::Not(p) => ResolvedPredicate::Not(Box::new(p.resolve(meta)?)),
        })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Predicate::And(l, r) => write!(f, "({} AND {})", l, r),
            Predicate::Or(l, r) => write!(f, "({} OR {})", l, r),
            Predicate::Not(p) => write!(f, "NOT {}", p),
        }
    }
}

#[derive(Debug, Clone)]
enum ResolvedOperand {
    Column(usize),
    Literal(PropertyValue),
}

impl ResolvedOperand {
    fn value<'a>(&'a self, embedding: &'a Embedding) -> &'a PropertyValue {
        match self {
            ResolvedOperand::Column(c) => embedding.property(*c).unwrap_or(&PropertyValue::Null),
            ResolvedOperand::Literal(value) => value,
        }
    }
}

#[derive(Debug, Clone)]
enum ResolvedPredicate {
    Compare {
        left: ResolvedOperand,
        op: Comparator,
        right: ResolvedOperand,
    },
    And(Box<ResolvedPredicate>, Box<ResolvedPredicate>),
    Or(Box<ResolvedPredicate>, Box<ResolvedPredicate>),
    Not(Box<ResolvedPredicate>),
}

impl ResolvedPredicate {
    fn evaluate(&self, embedding: &Embedding) -> bool {
        match self {
            ResolvedPredicate::Compare { left, op, right } => {
                op.evaluate(left.value(embedding), right.value(embedding))
            }
            ResolvedPredicate::And(l, r) => l.evaluate(embedding) && r.evaluate(embedding),
            ResolvedPredicate::Or(l, r) => l.evaluate(embedding) || r.evaluate(embedding),
            ResolvedPredicate::Not(p) => !p.evaluate(embedding),
        }
    }
}

/// Keeps the child's embeddings that satisfy a predicate
pub struct FilterEmbeddingsNode {
    child: PlanNodeBox,
    predicate: Predicate,
    resolved: ResolvedPredicate,
}

impl FilterEmbeddingsNode {
    pub fn new(child: PlanNodeBox, predicate: Predicate) -> PlanResult<Self> {
        let resolved = predicate.resolve(child.meta_data())?;
        debug!("Filter {} resolved against {}", predicate, child.meta_data());
        Ok(Self {
            child,
            predicate,
            resolved,
        })
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl PlanNode for FilterEmbeddingsNode {
    fn meta_data(&self) -> &EmbeddingMetaData {
        self.child.meta_data()
    }

    fn execute(&self) -> DataSet {
        let resolved = self.resolved.clone();
        self.child
            .execute()
            .filter(self.to_string(), move |embedding| resolved.evaluate(embedding))
    }

    fn children(&self) -> Vec<&dyn PlanNode> {
        vec![self.child.as_ref()]
    }
}

impl fmt::Display for FilterEmbeddingsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterEmbeddings({})", self.predicate)
    }
}

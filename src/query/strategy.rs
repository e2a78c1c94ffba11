//! Matching semantics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Matching semantics applied to a plan subtree.
///
/// Under `Isomorphism` every embedding produced by the subtree binds
/// pairwise distinct vertices to its vertex columns and pairwise distinct
/// edges to its edge columns. Join nodes rely on their children already
/// honouring this and only enforce distinctness *across* their two inputs,
/// so the property holds by induction up to the root.
///
/// `Homomorphism` places no distinctness constraint: several pattern
/// elements may map to the same graph element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStrategy {
    Isomorphism,
    Homomorphism,
}

impl MatchStrategy {
    pub fn is_isomorphism(&self) -> bool {
        matches!(self, MatchStrategy::Isomorphism)
    }
}

impl Default for MatchStrategy {
    fn default() -> Self {
        MatchStrategy::Isomorphism
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::Isomorphism => write!(f, "ISOMORPHISM"),
            MatchStrategy::Homomorphism => write!(f, "HOMOMORPHISM"),
        }
    }
}

//! Distinctness bookkeeping for isomorphism semantics
//!
//! A side of a join running under [`MatchStrategy::Isomorphism`] contributes
//! its vertex and edge columns to the cross-side check; a homomorphism side
//! contributes nothing. Same-side distinctness is never re-checked here: it is
//! guaranteed by the side's own subtree.

use crate::graph::{EntryType, IdentifierSet};
use crate::query::embedding::{Embedding, EmbeddingMetaData};
use crate::query::MatchStrategy;

/// Entry columns of one join side that take part in the cross-side check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinctColumns {
    vertex: Vec<usize>,
    edge: Vec<usize>,
}

impl DistinctColumns {
    /// Columns of `meta` that must stay distinct under `strategy`, skipping
    /// the entry columns listed in `excluded`.
    pub fn for_side(meta: &EmbeddingMetaData, strategy: MatchStrategy, excluded: &[usize]) -> Self {
        if !strategy.is_isomorphism() {
            return Self::default();
        }
        let keep = |columns: Vec<usize>| -> Vec<usize> {
            columns.into_iter().filter(|c| !excluded.contains(c)).collect()
        };
        Self {
            vertex: keep(meta.vertex_columns()),
            edge: keep(meta.edge_columns()),
        }
    }

    pub fn vertex_columns(&self) -> &[usize] {
        &self.vertex
    }

    pub fn edge_columns(&self) -> &[usize] {
        &self.edge
    }

    pub fn is_empty(&self) -> bool {
        self.vertex.is_empty() && self.edge.is_empty()
    }

    /// True when no identifier in one of `left`'s distinct columns equals an
    /// identifier in the same-typed distinct columns of `right`.
    pub fn disjoint(
        left: &Embedding,
        left_columns: &DistinctColumns,
        right: &Embedding,
        right_columns: &DistinctColumns,
    ) -> bool {
        disjoint_columns(left, &left_columns.vertex, right, &right_columns.vertex)
            && disjoint_columns(left, &left_columns.edge, right, &right_columns.edge)
    }
}

fn disjoint_columns(left: &Embedding, left_columns: &[usize], right: &Embedding, right_columns: &[usize]) -> bool {
    if left_columns.is_empty() || right_columns.is_empty() {
        return true;
    }
    !left_columns.iter().filter_map(|&l| left.id(l)).any(|left_id| {
        right_columns
            .iter()
            .filter_map(|&r| right.id(r))
            .any(|right_id| right_id == left_id)
    })
}

/// True when `embedding` binds pairwise distinct identifiers to its vertex
/// columns and pairwise distinct identifiers to its edge columns.
pub fn has_distinct_entries(embedding: &Embedding, meta: &EmbeddingMetaData) -> bool {
    [EntryType::Vertex, EntryType::Edge].into_iter().all(|entry_type| {
        let columns = match entry_type {
            EntryType::Vertex => meta.vertex_columns(),
            EntryType::Edge => meta.edge_columns(),
        };
        let mut seen = IdentifierSet::with_capacity(columns.len());
        columns
            .into_iter()
            .filter_map(|c| embedding.id(c))
            .all(|id| seen.add(id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Identifier;

    fn path_meta() -> EmbeddingMetaData {
        let mut meta = EmbeddingMetaData::new();
        meta.push_entry_column("v1", EntryType::Vertex).unwrap();
        meta.push_entry_column("e1", EntryType::Edge).unwrap();
        meta.push_entry_column("v2", EntryType::Vertex).unwrap();
        meta.push_entry_column("e2", EntryType::Edge).unwrap();
        meta.push_entry_column("v3", EntryType::Vertex).unwrap();
        meta
    }

    fn row(ids: &[u64]) -> Embedding {
        Embedding::from_parts(ids.iter().map(|&i| Identifier::from_long(i)).collect(), vec![])
    }

    #[test]
    fn test_columns_follow_strategy() {
        let meta = path_meta();
        let iso = DistinctColumns::for_side(&meta, MatchStrategy::Isomorphism, &[]);
        assert_eq!(iso.vertex_columns(), &[0, 2, 4]);
        assert_eq!(iso.edge_columns(), &[1, 3]);

        let homo = DistinctColumns::for_side(&meta, MatchStrategy::Homomorphism, &[]);
        assert!(homo.is_empty());

        let excluded = DistinctColumns::for_side(&meta, MatchStrategy::Isomorphism, &[0, 3]);
        assert_eq!(excluded.vertex_columns(), &[2, 4]);
        assert_eq!(excluded.edge_columns(), &[1]);
    }

    #[test]
    fn test_disjoint_checks_same_type_only() {
        let meta = path_meta();
        let columns = DistinctColumns::for_side(&meta, MatchStrategy::Isomorphism, &[]);

        assert!(DistinctColumns::disjoint(&row(&[1, 2, 3, 4, 5]), &columns, &row(&[6, 7, 8, 9, 10]), &columns));
        // vertex 3 on both sides
        assert!(!DistinctColumns::disjoint(&row(&[1, 2, 3, 4, 5]), &columns, &row(&[3, 7, 8, 9, 10]), &columns));
        // edge 4 on both sides
        assert!(!DistinctColumns::disjoint(&row(&[1, 2, 3, 4, 5]), &columns, &row(&[6, 4, 8, 9, 10]), &columns));
        // id 2 is an edge on the left and a vertex on the right
        assert!(DistinctColumns::disjoint(&row(&[1, 2, 3, 4, 5]), &columns, &row(&[2, 7, 8, 9, 10]), &columns));
    }

    #[test]
    fn test_homomorphism_side_contributes_nothing() {
        let meta = path_meta();
        let iso = DistinctColumns::for_side(&meta, MatchStrategy::Isomorphism, &[]);
        let homo = DistinctColumns::for_side(&meta, MatchStrategy::Homomorphism, &[]);
        let same = row(&[1, 2, 3, 4, 5]);
        assert!(DistinctColumns::disjoint(&same, &iso, &same, &homo));
        assert!(DistinctColumns::disjoint(&same, &homo, &same, &iso));
    }

    #[test]
    fn test_has_distinct_entries() {
        let meta = path_meta();
        assert!(has_distinct_entries(&row(&[1, 2, 3, 4, 5]), &meta));
        assert!(!has_distinct_entries(&row(&[1, 2, 1, 4, 5]), &meta));
        assert!(!has_distinct_entries(&row(&[1, 2, 3, 2, 5]), &meta));
        assert!(has_distinct_entries(&row(&[1, 1, 3, 3, 5]), &meta));
    }
}

//! Column schema of embeddings
//!
//! `EmbeddingMetaData` maps pattern variables to entry columns (with their
//! [`EntryType`]) and `(variable, property)` pairs to property columns. The
//! two index spaces are independent, zero-based and dense. Plan nodes derive
//! their metadata once at construction; it is the static contract between a
//! node and its parent.

use crate::graph::EntryType;
use crate::query::{PlanError, PlanResult};
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddingMetaData {
    entry_columns: IndexMap<String, (usize, EntryType)>,
    property_columns: IndexMap<(String, String), usize>,
}

impl EmbeddingMetaData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `variable` to entry column `column`.
    ///
    /// Re-declaring a variable with identical type and column is a no-op. A
    /// variable's entry type can not change once set, and a column can only
    /// hold one variable. Columns stay dense: `column` may be at most
    /// [`entry_count`](Self::entry_count).
    pub fn set_entry_column(
        &mut self,
        variable: impl Into<String>,
        entry_type: EntryType,
        column: usize,
    ) -> PlanResult<()> {
        let variable = variable.into();
        if let Some(&(existing_column, existing_type)) = self.entry_columns.get(&variable) {
            if existing_type != entry_type {
                return Err(PlanError::EntryTypeConflict {
                    variable,
                    existing: existing_type,
                    requested: entry_type,
                });
            }
            if existing_column == column {
                return Ok(());
            }
            return Err(PlanError::DuplicateVariable(variable));
        }
        if self.entry_columns.values().any(|&(c, _)| c == column) {
            return Err(PlanError::DuplicateColumn { space: "entry", column });
        }
        if column > self.entry_count() {
            return Err(PlanError::ColumnOutOfRange {
                space: "entry",
                column,
                next: self.entry_count(),
            });
        }
        self.entry_columns.insert(variable, (column, entry_type));
        Ok(())
    }

    /// Bind `variable` to the next free entry column and return that column
    pub fn push_entry_column(
        &mut self,
        variable: impl Into<String>,
        entry_type: EntryType,
    ) -> PlanResult<usize> {
        let column = self.entry_count();
        self.set_entry_column(variable, entry_type, column)?;
        Ok(column)
    }

    /// Bind `variable.property` to property column `column`, at most
    /// [`property_count`](Self::property_count)
    pub fn set_property_column(
        &mut self,
        variable: impl Into<String>,
        property: impl Into<String>,
        column: usize,
    ) -> PlanResult<()> {
        let key = (variable.into(), property.into());
        if let Some(&existing) = self.property_columns.get(&key) {
            if existing == column {
                return Ok(());
            }
            return Err(PlanError::DuplicateProperty {
                variable: key.0,
                property: key.1,
            });
        }
        if self.property_columns.values().any(|&c| c == column) {
            return Err(PlanError::DuplicateColumn { space: "property", column });
        }
        if column > self.property_count() {
            return Err(PlanError::ColumnOutOfRange {
                space: "property",
                column,
                next: self.property_count(),
            });
        }
        self.property_columns.insert(key, column);
        Ok(())
    }

    pub fn push_property_column(
        &mut self,
        variable: impl Into<String>,
        property: impl Into<String>,
    ) -> PlanResult<usize> {
        let column = self.property_count();
        self.set_property_column(variable, property, column)?;
        Ok(column)
    }

    /// Entry column bound to `variable`
    pub fn entry_column(&self, variable: &str) -> PlanResult<usize> {
        self.entry_columns
            .get(variable)
            .map(|&(column, _)| column)
            .ok_or_else(|| PlanError::UnknownVariable(variable.to_string()))
    }

    pub fn entry_type(&self, variable: &str) -> PlanResult<EntryType> {
        self.entry_columns
            .get(variable)
            .map(|&(_, entry_type)| entry_type)
            .ok_or_else(|| PlanError::UnknownVariable(variable.to_string()))
    }

    /// Property column bound to `variable.property`
    pub fn property_column(&self, variable: &str, property: &str) -> PlanResult<usize> {
        // Owned lookup key; IndexMap has no borrowed form for tuple keys.
        let key = (variable.to_string(), property.to_string());
        if let Some(&column) = self.property_columns.get(&key) {
            return Ok(column);
        }
        if !self.entry_columns.contains_key(variable)
            && !self.property_columns.keys().any(|(v, _)| v == variable)
        {
            return Err(PlanError::UnknownVariable(variable.to_string()));
        }
        Err(PlanError::UnknownProperty {
            variable: variable.to_string(),
            property: property.to_string(),
        })
    }

    pub fn contains_entry_column(&self, variable: &str) -> bool {
        self.entry_columns.contains_key(variable)
    }

    pub fn contains_property_column(&self, variable: &str, property: &str) -> bool {
        self.property_columns
            .contains_key(&(variable.to_string(), property.to_string()))
    }

    pub fn entry_count(&self) -> usize {
        self.entry_columns.len()
    }

    pub fn property_count(&self) -> usize {
        self.property_columns.len()
    }

    /// `(variable, column, type)` triples ordered by column
    pub fn entries(&self) -> Vec<(&str, usize, EntryType)> {
        let mut entries: Vec<_> = self
            .entry_columns
            .iter()
            .map(|(v, &(c, t))| (v.as_str(), c, t))
            .collect();
        entries.sort_by_key(|&(_, c, _)| c);
        entries
    }

    /// `(variable, property, column)` triples ordered by column
    pub fn properties(&self) -> Vec<(&str, &str, usize)> {
        let mut properties: Vec<_> = self
            .property_columns
            .iter()
            .map(|((v, p), &c)| (v.as_str(), p.as_str(), c))
            .collect();
        properties.sort_by_key(|&(_, _, c)| c);
        properties
    }

    /// Variables ordered by entry column
    pub fn entry_variables(&self) -> Vec<&str> {
        self.entries().into_iter().map(|(v, _, _)| v).collect()
    }

    /// Sorted entry columns holding vertices
    pub fn vertex_columns(&self) -> Vec<usize> {
        self.columns_of_type(EntryType::Vertex)
    }

    /// Sorted entry columns holding edges
    pub fn edge_columns(&self) -> Vec<usize> {
        self.columns_of_type(EntryType::Edge)
    }

    fn columns_of_type(&self, entry_type: EntryType) -> Vec<usize> {
        let mut columns: Vec<usize> = self
            .entry_columns
            .values()
            .filter(|&&(_, t)| t == entry_type)
            .map(|&(c, _)| c)
            .collect();
        columns.sort_unstable();
        columns
    }

    /// Property keys declared for `variable`, ordered by column
    pub fn property_keys(&self, variable: &str) -> Vec<&str> {
        self.properties()
            .into_iter()
            .filter(|&(v, _, _)| v == variable)
            .map(|(_, p, _)| p)
            .collect()
    }

    /// Schema of `left ++ right`.
    ///
    /// All left entry columns come first in their original relative order,
    /// followed by all right entry columns, renumbered from zero. Property
    /// columns are concatenated the same way in their own index space.
    /// Nothing is dropped; a variable bound on both sides is rejected.
    pub fn concat(left: &EmbeddingMetaData, right: &EmbeddingMetaData) -> PlanResult<Self> {
        let mut combined = EmbeddingMetaData::new();
        for (variable, _, entry_type) in left.entries().into_iter().chain(right.entries()) {
            if combined.contains_entry_column(variable) {
                return Err(PlanError::DuplicateVariable(variable.to_string()));
            }
            combined.push_entry_column(variable, entry_type)?;
        }
        for (variable, property, _) in left.properties().into_iter().chain(right.properties()) {
            combined.push_property_column(variable, property)?;
        }
        Ok(combined)
    }
}

impl fmt::Display for EmbeddingMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EmbeddingMetaData{{entries=[")?;
        for (i, (variable, column, entry_type)) in self.entries().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}@{}", variable, entry_type, column)?;
        }
        write!(f, "], properties=[")?;
        for (i, (variable, property, column)) in self.properties().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}.{}@{}", variable, property, column)?;
        }
        write!(f, "]}}")
    }
}

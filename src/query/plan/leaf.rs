//! Leaf plan nodes
//!
//! Scans turn stored elements into embeddings. Property keys requested by a
//! scan become property columns in the listed order; an element lacking a
//! key yields `Null` in that column.

use super::{fmt_pairs, PlanNode};
use crate::graph::{
    Edge, EntryType, GraphElement, GraphSource, Identifier, PropertyMap, PropertyValue, Vertex,
};
use crate::query::dataflow::DataSet;
use crate::query::embedding::{Embedding, EmbeddingMetaData};
use crate::query::{MatchStrategy, PlanResult};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

fn property_values<'a>(properties: &'a PropertyMap, keys: &'a [String]) -> impl Iterator<Item = PropertyValue> + 'a {
    keys.iter()
        .map(move |k| properties.get(k).cloned().unwrap_or(PropertyValue::Null))
}

fn fmt_scan_suffix(
    f: &mut fmt::Formatter<'_>,
    variable: &str,
    label: Option<&str>,
    keys: &[String],
    graph: Option<Identifier>,
) -> fmt::Result {
    let pairs: Vec<(String, String)> = keys.iter().map(|k| (variable.to_string(), k.clone())).collect();
    write!(f, ", keys=")?;
    fmt_pairs(f, &pairs)?;
    if let Some(label) = label {
        write!(f, ", label={}", label)?;
    }
    if let Some(graph) = graph {
        write!(f, ", graph={}", graph)?;
    }
    write!(f, ")")
}

/// Scan of stored vertices: `(v:Label {keys})`
pub struct VertexScanNode {
    source: Arc<dyn GraphSource>,
    variable: String,
    label: Option<String>,
    keys: Vec<String>,
    graph: Option<Identifier>,
    meta_data: EmbeddingMetaData,
}

impl VertexScanNode {
    pub fn new(
        source: Arc<dyn GraphSource>,
        variable: impl Into<String>,
        label: Option<String>,
        keys: Vec<String>,
    ) -> PlanResult<Self> {
        let variable = variable.into();
        let mut meta_data = EmbeddingMetaData::new();
        meta_data.push_entry_column(variable.as_str(), EntryType::Vertex)?;
        for key in &keys {
            meta_data.push_property_column(variable.as_str(), key.as_str())?;
        }
        debug!("VertexScan {} -> {}", variable, meta_data);

        Ok(Self {
            source,
            variable,
            label,
            keys,
            graph: None,
            meta_data,
        })
    }

    /// Restrict the scan to members of one logical graph
    pub fn in_graph(mut self, graph: Identifier) -> Self {
        self.graph = Some(graph);
        self
    }
}

impl PlanNode for VertexScanNode {
    fn meta_data(&self) -> &EmbeddingMetaData {
        &self.meta_data
    }

    fn execute(&self) -> DataSet {
        let source = self.source.clone();
        let label = self.label.clone();
        let keys = self.keys.clone();
        let graph = self.graph;

        DataSet::source(self.to_string(), move || {
            source
                .vertices(label.as_deref())
                .iter()
                .filter(|v: &&Vertex| graph.map_or(true, |g| v.in_graph(&g)))
                .map(|v| {
                    let mut embedding = Embedding::new();
                    embedding.add(v.id);
                    embedding.add_properties(property_values(&v.properties, &keys));
                    embedding
                })
                .collect()
        })
    }
}

impl fmt::Display for VertexScanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexScan({}", self.variable)?;
        fmt_scan_suffix(f, &self.variable, self.label.as_deref(), &self.keys, self.graph)
    }
}

/// Scan of stored edges: `(s)-[e:Label {keys}]->(t)`
///
/// Produces `s@0, e@1, t@2`. When `s` and `t` name the same variable the
/// pattern is a loop: the node produces `s@0, e@1` and only self-loop edges
/// qualify. Under isomorphism with distinct endpoint variables self-loops are
/// dropped, since `s` and `t` would bind the same vertex.
pub struct EdgeScanNode {
    source: Arc<dyn GraphSource>,
    source_variable: String,
    edge_variable: String,
    target_variable: String,
    label: Option<String>,
    keys: Vec<String>,
    strategy: MatchStrategy,
    graph: Option<Identifier>,
    meta_data: EmbeddingMetaData,
}

impl EdgeScanNode {
    pub fn new(
        source: Arc<dyn GraphSource>,
        source_variable: impl Into<String>,
        edge_variable: impl Into<String>,
        target_variable: impl Into<String>,
        label: Option<String>,
        keys: Vec<String>,
        strategy: MatchStrategy,
    ) -> PlanResult<Self> {
        let source_variable = source_variable.into();
        let edge_variable = edge_variable.into();
        let target_variable = target_variable.into();

        let mut meta_data = EmbeddingMetaData::new();
        meta_data.push_entry_column(source_variable.as_str(), EntryType::Vertex)?;
        meta_data.push_entry_column(edge_variable.as_str(), EntryType::Edge)?;
        if target_variable != source_variable {
            meta_data.push_entry_column(target_variable.as_str(), EntryType::Vertex)?;
        }
        for key in &keys {
            meta_data.push_property_column(edge_variable.as_str(), key.as_str())?;
        }
        debug!("EdgeScan {} -> {}", edge_variable, meta_data);

        Ok(Self {
            source,
            source_variable,
            edge_variable,
            target_variable,
            label,
            keys,
            strategy,
            graph: None,
            meta_data,
        })
    }

    /// Restrict the scan to members of one logical graph
    pub fn in_graph(mut self, graph: Identifier) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn is_loop(&self) -> bool {
        self.source_variable == self.target_variable
    }
}

impl PlanNode for EdgeScanNode {
    fn meta_data(&self) -> &EmbeddingMetaData {
        &self.meta_data
    }

    fn execute(&self) -> DataSet {
        let source = self.source.clone();
        let label = self.label.clone();
        let keys = self.keys.clone();
        let graph = self.graph;
        let loop_pattern = self.is_loop();
        let drop_loops = !loop_pattern && self.strategy.is_isomorphism();

        DataSet::source(self.to_string(), move || {
            source
                .edges(label.as_deref())
                .iter()
                .filter(|e: &&Edge| graph.map_or(true, |g| e.in_graph(&g)))
                .filter(|e| if loop_pattern { e.is_loop() } else { !(drop_loops && e.is_loop()) })
                .map(|e| {
                    let mut embedding = Embedding::new();
                    embedding.add(e.source);
                    embedding.add(e.id);
                    if !loop_pattern {
                        embedding.add(e.target);
                    }
                    embedding.add_properties(property_values(&e.properties, &keys));
                    embedding
                })
                .collect()
        })
    }
}

impl fmt::Display for EdgeScanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EdgeScan(({})-[{}]->({}), {}",
            self.source_variable, self.edge_variable, self.target_variable, self.strategy
        )?;
        fmt_scan_suffix(f, &self.edge_variable, self.label.as_deref(), &self.keys, self.graph)
    }
}

/// Leaf over an already materialized collection of embeddings
pub struct EmbeddingsNode {
    name: String,
    rows: Arc<Vec<Embedding>>,
    meta_data: EmbeddingMetaData,
}

impl EmbeddingsNode {
    /// Rows must conform to `meta_data`
    pub fn new(name: impl Into<String>, meta_data: EmbeddingMetaData, rows: Vec<Embedding>) -> Self {
        Self {
            name: name.into(),
            rows: Arc::new(rows),
            meta_data,
        }
    }
}

impl PlanNode for EmbeddingsNode {
    fn meta_data(&self) -> &EmbeddingMetaData {
        &self.meta_data
    }

    fn execute(&self) -> DataSet {
        let rows = self.rows.clone();
        DataSet::source(self.to_string(), move || rows.as_ref().clone())
    }
}

impl fmt::Display for EmbeddingsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Embeddings({}, rows={})", self.name, self.rows.len())
    }
}

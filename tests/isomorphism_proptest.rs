//! Property-based tests for join trees and wire formats.

use graphmatch::graph::{GraphStore, Identifier, IdentifierSet, PropertyValue};
use graphmatch::query::{
    has_distinct_entries, EdgeScanNode, Embedding, ExecutionEnvironment, JoinEmbeddingsNode,
    LocalEnvironment, MatchStrategy, PlanNode, PlanNodeBox, ValueJoinNode, VertexScanNode,
};
use graphmatch::EngineConfig;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

struct TestGraph {
    store: Arc<GraphStore>,
    vertices: Vec<(Identifier, i64)>,
    /// (source, id, target)
    edges: Vec<(Identifier, Identifier, Identifier)>,
}

/// Strategy for small graphs: vertex groups plus edges between vertex indices
fn arb_graph() -> impl Strategy<Value = (Vec<i64>, Vec<(usize, usize)>)> {
    (2usize..7).prop_flat_map(|n| {
        (
            prop::collection::vec(0i64..3, n),
            prop::collection::vec((0..n, 0..n), 0..12),
        )
    })
}

fn build((groups, edges): (Vec<i64>, Vec<(usize, usize)>)) -> TestGraph {
    let mut store = GraphStore::new();
    let mut vertices = Vec::with_capacity(groups.len());
    for group in groups {
        let id = store.create_vertex("V");
        store.get_vertex_mut(id).unwrap().set_property("group", group);
        vertices.push((id, group));
    }
    let mut stored_edges = Vec::with_capacity(edges.len());
    for (s, t) in edges {
        let (source, target) = (vertices[s].0, vertices[t].0);
        let id = store.create_edge(source, target, "E").unwrap();
        stored_edges.push((source, id, target));
    }
    TestGraph {
        store: Arc::new(store),
        vertices,
        edges: stored_edges,
    }
}

fn environment() -> LocalEnvironment {
    // Threshold 0 exercises the rayon paths on tiny inputs
    LocalEnvironment::new(EngineConfig {
        parallel_threshold: 0,
        ..EngineConfig::default()
    })
}

fn edge_scan(graph: &TestGraph, s: &str, e: &str, t: &str, strategy: MatchStrategy) -> PlanNodeBox {
    Box::new(EdgeScanNode::new(graph.store.clone(), s, e, t, None, vec![], strategy).unwrap())
}

/// `(a)-[e1]->(b)-[e2]->(c)-[e3]->(d)` built left-deep
fn three_hop_plan(graph: &TestGraph, strategy: MatchStrategy) -> JoinEmbeddingsNode {
    let first = JoinEmbeddingsNode::new(
        edge_scan(graph, "a", "e1", "b", strategy),
        edge_scan(graph, "b", "e2", "c", strategy),
        vec!["b".to_string()],
        strategy,
        strategy,
    )
    .unwrap();
    JoinEmbeddingsNode::new(
        Box::new(first),
        edge_scan(graph, "c", "e3", "d", strategy),
        vec!["c".to_string()],
        strategy,
        strategy,
    )
    .unwrap()
}

fn all_distinct(ids: &[Identifier]) -> bool {
    let mut set = IdentifierSet::new();
    ids.iter().all(|id| set.add(*id))
}

/// Brute-force `(a)->(b)->(c)->(d)` enumeration as sorted id rows
fn brute_force_three_hops(graph: &TestGraph, isomorphism: bool) -> Vec<Vec<Identifier>> {
    let mut rows = Vec::new();
    for &(a, e1, b) in &graph.edges {
        for &(b2, e2, c) in &graph.edges {
            if b2 != b {
                continue;
            }
            for &(c2, e3, d) in &graph.edges {
                if c2 != c {
                    continue;
                }
                if isomorphism && !(all_distinct(&[a, b, c, d]) && all_distinct(&[e1, e2, e3])) {
                    continue;
                }
                rows.push(vec![a, e1, b, e2, c, e3, d]);
            }
        }
    }
    rows.sort();
    rows
}

fn sorted_ids(rows: &[Embedding]) -> Vec<Vec<Identifier>> {
    let mut ids: Vec<Vec<Identifier>> = rows.iter().map(|r| r.all_ids().to_vec()).collect();
    ids.sort();
    ids
}

fn group_scan(graph: &TestGraph, variable: &str) -> PlanNodeBox {
    Box::new(VertexScanNode::new(graph.store.clone(), variable, None, vec!["group".to_string()]).unwrap())
}

fn key(variable: &str) -> Vec<(String, String)> {
    vec![(variable.to_string(), "group".to_string())]
}

/// Strategy for generating arbitrary `PropertyValue` instances.
fn arb_value() -> impl Strategy<Value = PropertyValue> {
    let leaf = prop_oneof![
        Just(PropertyValue::Null),
        any::<bool>().prop_map(PropertyValue::Boolean),
        any::<i64>().prop_map(PropertyValue::Integer),
        // NaN is fine: floats compare by bit pattern
        any::<f64>().prop_map(PropertyValue::Float),
        ".*".prop_map(PropertyValue::String),
        any::<i64>().prop_map(PropertyValue::DateTime),
    ];

    leaf.prop_recursive(3, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(PropertyValue::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..8)
                .prop_map(|m: BTreeMap<String, PropertyValue>| PropertyValue::Map(m)),
        ]
    })
}

fn arb_embedding() -> impl Strategy<Value = Embedding> {
    (
        prop::collection::vec(any::<u128>(), 0..10),
        prop::collection::vec(arb_value(), 0..10),
    )
        .prop_map(|(ids, properties)| {
            Embedding::from_parts(ids.into_iter().map(Identifier::from_u128).collect(), properties)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn isomorphic_paths_never_repeat_elements(shape in arb_graph()) {
        let graph = build(shape);
        let plan = three_hop_plan(&graph, MatchStrategy::Isomorphism);
        let rows = environment().collect(&plan.execute()).unwrap();

        for row in &rows {
            prop_assert!(has_distinct_entries(row, plan.meta_data()));
        }
        prop_assert_eq!(sorted_ids(&rows), brute_force_three_hops(&graph, true));
    }

    #[test]
    fn homomorphic_paths_match_brute_force(shape in arb_graph()) {
        let graph = build(shape);
        let plan = three_hop_plan(&graph, MatchStrategy::Homomorphism);
        let rows = environment().collect(&plan.execute()).unwrap();
        prop_assert_eq!(sorted_ids(&rows), brute_force_three_hops(&graph, false));
    }

    #[test]
    fn value_join_trees_keep_vertices_distinct(shape in arb_graph(), left_deep in any::<bool>()) {
        let graph = build(shape);
        let iso = MatchStrategy::Isomorphism;
        let join = |l: PlanNodeBox, r: PlanNodeBox, lk: &str, rk: &str| -> PlanNodeBox {
            Box::new(ValueJoinNode::new(l, r, key(lk), key(rk), iso, iso).unwrap())
        };

        let plan = if left_deep {
            let ab = join(group_scan(&graph, "a"), group_scan(&graph, "b"), "a", "b");
            join(ab, group_scan(&graph, "c"), "b", "c")
        } else {
            let bc = join(group_scan(&graph, "b"), group_scan(&graph, "c"), "b", "c");
            join(group_scan(&graph, "a"), bc, "a", "b")
        };
        prop_assert_eq!(plan.meta_data().entry_variables(), vec!["a", "b", "c"]);

        let rows = environment().collect(&plan.execute()).unwrap();
        for row in &rows {
            prop_assert!(has_distinct_entries(row, plan.meta_data()));
            prop_assert_eq!(row.property(0), row.property(2));
        }

        let mut expected = 0usize;
        for (a, ga) in &graph.vertices {
            for (b, gb) in &graph.vertices {
                for (c, gc) in &graph.vertices {
                    if ga == gb && gb == gc && all_distinct(&[*a, *b, *c]) {
                        expected += 1;
                    }
                }
            }
        }
        prop_assert_eq!(rows.len(), expected);
    }

    #[test]
    fn homomorphic_side_allows_repeats(shape in arb_graph()) {
        let graph = build(shape);
        let plan = ValueJoinNode::new(
            group_scan(&graph, "a"),
            group_scan(&graph, "b"),
            key("a"),
            key("b"),
            MatchStrategy::Isomorphism,
            MatchStrategy::Homomorphism,
        )
        .unwrap();
        let rows = environment().collect(&plan.execute()).unwrap();

        let expected: usize = graph
            .vertices
            .iter()
            .map(|(_, ga)| graph.vertices.iter().filter(|(_, gb)| ga == gb).count())
            .sum();
        prop_assert_eq!(rows.len(), expected);
    }

    #[test]
    fn embedding_wire_round_trip(embedding in arb_embedding()) {
        let bytes = embedding.encode();
        prop_assert_eq!(Embedding::decode(&bytes).unwrap(), embedding);
    }

    #[test]
    fn identifier_set_wire_round_trip(ids in prop::collection::vec(any::<u64>(), 0..32)) {
        let set = IdentifierSet::from_longs(&ids);
        let mut buf = Vec::new();
        set.write_to(&mut buf);

        let mut reversed = ids.clone();
        reversed.reverse();
        let mut other = Vec::new();
        IdentifierSet::from_longs(&reversed).write_to(&mut other);

        prop_assert_eq!(IdentifierSet::read_from(&mut buf.as_slice()).unwrap(), set.clone());
        prop_assert_eq!(IdentifierSet::read_from(&mut other.as_slice()).unwrap(), set);
    }
}

use evigraph_layout::{layout, Direction, LayoutConfig};
use evigraph_model::{build_node, EvidenceEdge, EvidenceNode, Relation};
use proptest::prelude::*;
use serde_json::json;

const MAX_NODES: usize = 12;

fn node(i: usize) -> EvidenceNode {
    build_node(&json!({"@id": format!("ark:n{i}"), "@type": "Dataset", "name": format!("n{i}")}))
        .expect("node")
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..=MAX_NODES).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..30)))
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::LR),
        Just(Direction::RL),
        Just(Direction::TB),
        Just(Direction::BT),
    ]
}

fn build(n: usize, pairs: &[(usize, usize)]) -> (Vec<EvidenceNode>, Vec<EvidenceEdge>) {
    let nodes = (0..n).map(node).collect();
    let edges = pairs
        .iter()
        .enumerate()
        .map(|(k, &(s, t))| {
            EvidenceEdge::new(
                &format!("ark:n{s}"),
                &format!("ark:n{t}"),
                Relation::UsedDataset,
                Some(k),
            )
        })
        .collect();
    (nodes, edges)
}

fn positions(nodes: &[EvidenceNode]) -> Vec<(String, f64, f64)> {
    let mut out: Vec<_> = nodes
        .iter()
        .map(|n| {
            let p = n.position.expect("positioned");
            (n.id.clone(), p.x, p.y)
        })
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn every_node_is_positioned_without_overlap(
        (n, pairs) in graph_strategy(),
        direction in direction_strategy(),
    ) {
        let (nodes, edges) = build(n, &pairs);
        let config = LayoutConfig::with_direction(direction);
        let out = layout(&nodes, &edges, &config);

        prop_assert!(out.diagnostics.is_empty());
        prop_assert_eq!(out.nodes.len(), n);
        prop_assert_eq!(out.edges.len(), edges.len());

        let placed = positions(&out.nodes);
        for (_, x, y) in &placed {
            prop_assert!(x.is_finite() && y.is_finite());
            prop_assert!(*x >= -1e-9 && *y >= -1e-9);
        }
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                let apart_x = (a.1 - b.1).abs() >= config.node_width - 1e-9;
                let apart_y = (a.2 - b.2).abs() >= config.node_height - 1e-9;
                prop_assert!(apart_x || apart_y, "{} overlaps {}", a.0, b.0);
            }
        }
    }

    #[test]
    fn layout_is_deterministic_and_order_independent(
        (n, pairs) in graph_strategy(),
        direction in direction_strategy(),
        rotate in 0usize..MAX_NODES,
    ) {
        let (nodes, edges) = build(n, &pairs);
        let config = LayoutConfig::with_direction(direction);
        let first = positions(&layout(&nodes, &edges, &config).nodes);
        let second = positions(&layout(&nodes, &edges, &config).nodes);
        prop_assert_eq!(&first, &second);

        let mut shuffled_nodes = nodes.clone();
        shuffled_nodes.rotate_left(rotate % n);
        let mut shuffled_edges = edges.clone();
        shuffled_edges.reverse();
        let shuffled = positions(&layout(&shuffled_nodes, &shuffled_edges, &config).nodes);
        prop_assert_eq!(&first, &shuffled);
    }

    #[test]
    fn acyclic_edges_point_down_the_rank_axis((n, pairs) in graph_strategy()) {
        // Keep only forward pairs so the graph is a DAG.
        let forward: Vec<_> = pairs.into_iter().filter(|(s, t)| s < t).collect();
        let (nodes, edges) = build(n, &forward);
        let out = layout(&nodes, &edges, &LayoutConfig::default());
        for edge in &out.edges {
            let s = out.position_of(&edge.source).expect("source");
            let t = out.position_of(&edge.target).expect("target");
            prop_assert!(s.x < t.x, "{} is not left of {}", edge.source, edge.target);
        }
    }
}

use evigraph_model::{build_node, EvidenceEdge, EvidenceNode, Relation};
use evigraph_path::find_shortest_path;
use proptest::prelude::*;
use serde_json::json;

const MAX_NODES: usize = 10;

fn id(i: usize) -> String {
    format!("ark:n{i}")
}

fn build(n: usize, pairs: &[(usize, usize)]) -> (Vec<EvidenceNode>, Vec<EvidenceEdge>) {
    let nodes = (0..n)
        .map(|i| build_node(&json!({"@id": id(i), "@type": "Dataset", "name": id(i)})).expect("node"))
        .collect();
    let edges = pairs
        .iter()
        .enumerate()
        .map(|(k, &(s, t))| EvidenceEdge::new(&id(s), &id(t), Relation::UsedDataset, Some(k)))
        .collect();
    (nodes, edges)
}

/// Hop distances by repeated relaxation, independent of the search under test.
fn distances(n: usize, pairs: &[(usize, usize)], from: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; n];
    dist[from] = Some(0);
    for _ in 0..n {
        for &(s, t) in pairs {
            for (a, b) in [(s, t), (t, s)] {
                if let Some(d) = dist[a] {
                    if dist[b].map_or(true, |cur| d + 1 < cur) {
                        dist[b] = Some(d + 1);
                    }
                }
            }
        }
    }
    dist
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn bfs_paths_are_connected_and_shortest(
        (n, pairs, start, end) in (2usize..=MAX_NODES).prop_flat_map(|n| (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..20),
            0..n,
            0..n,
        ))
    ) {
        let (nodes, edges) = build(n, &pairs);
        let found = find_shortest_path(&id(start), &id(end), &nodes, &edges);
        let expected = if start == end { None } else { distances(n, &pairs, start)[end] };

        match (found, expected) {
            (None, None) => {}
            (Some(path), Some(hops)) => {
                prop_assert_eq!(path.node_ids.len(), hops + 1);
                prop_assert_eq!(path.edge_ids.len(), hops);
                prop_assert_eq!(path.node_ids.first(), Some(&id(start)));
                prop_assert_eq!(path.node_ids.last(), Some(&id(end)));
                for (step, edge_id) in path.edge_ids.iter().enumerate() {
                    let edge = edges.iter().find(|e| &e.id == edge_id).expect("edge exists");
                    let (a, b) = (&path.node_ids[step], &path.node_ids[step + 1]);
                    prop_assert!(
                        (&edge.source == a && &edge.target == b)
                            || (&edge.source == b && &edge.target == a)
                    );
                }
            }
            (found, expected) => prop_assert!(false, "found {:?}, expected {:?}", found, expected),
        }
    }
}

use evigraph_model::{build_node, NodeBuilder, NodeState};
use proptest::prelude::*;
use serde_json::{json, Value};

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z:/#]{0,12}".prop_map(Value::from),
    ]
}

fn reference() -> impl Strategy<Value = Value> {
    prop_oneof![
        leaf_value(),
        "[a-z0-9:]{1,8}".prop_map(|id| json!({"@id": id})),
        prop::collection::vec("[a-z0-9:]{0,8}".prop_map(Value::from), 0..4).prop_map(Value::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn display_name_is_a_bounded_prefix(label in "\\PC{0,80}", limit in 1usize..60) {
        let builder = NodeBuilder::new(limit);
        let shown = builder.display_name(&label);
        let count = label.chars().count();
        if count <= limit {
            prop_assert_eq!(&shown, &label);
        } else {
            prop_assert_eq!(shown.chars().count(), limit + 3);
            prop_assert!(shown.ends_with("..."));
            let kept: String = label.chars().take(limit).collect();
            prop_assert!(shown.starts_with(&kept));
        }
    }

    #[test]
    fn build_node_tolerates_arbitrary_relation_values(
        id in "[a-z0-9:]{1,10}",
        kind in prop::sample::select(vec!["Dataset", "Computation", "Software", "Sample", "evi:Experiment"]),
        generated_by in reference(),
        used_dataset in reference(),
        used_software in reference(),
    ) {
        let entity = json!({
            "@id": id,
            "@type": kind,
            "generatedBy": generated_by,
            "usedDataset": used_dataset,
            "usedSoftware": used_software,
        });
        let node = build_node(&entity).expect("entity with an id builds");
        prop_assert_eq!(&node.id, &id);
        prop_assert!(matches!(node.state, NodeState::Collapsed | NodeState::Leaf));
        prop_assert!(node.properties.keys().all(|k| !k.starts_with('@')));
        prop_assert!(!node.properties.contains_key("usedDataset"));
    }
}

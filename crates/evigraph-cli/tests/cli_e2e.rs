use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

const ROOT: &str = "ark:59852/dataset-expression-matrix";
const COLLECTION: &str = "ark:59852/computation-quantify::datasets#0";

fn evigraph_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_evigraph"))
}

fn demo() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/rnaseq-crate.jsonld")
        .canonicalize()
        .expect("demo document")
}

fn tmp_dir(label: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
        .join("evigraph_cli_e2e")
        .join(format!("{label}_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create tmp dir");
    dir
}

fn run(args: &[&str]) -> Output {
    Command::new(evigraph_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("run evigraph")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "evigraph failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json stdout")
}

#[test]
fn show_json_renders_positioned_initial_graph() {
    let input = demo();
    let view = stdout_json(&run(&["show", input.to_str().expect("utf8 path")]));

    assert_eq!(view["direction"], "LR");
    let nodes = view["nodes"].as_array().expect("nodes");
    let ids: Vec<&str> = nodes.iter().filter_map(|n| n["id"].as_str()).collect();
    assert_eq!(
        ids,
        vec![
            ROOT,
            "ark:59852/computation-quantify",
            "ark:59852/software-salmon",
            COLLECTION,
        ]
    );
    assert!(nodes.iter().all(|n| n["position"]["x"].is_number()));
    assert_eq!(nodes[3]["remaining"], 4);
    assert_eq!(
        nodes[0]["displayName"],
        "Normalized gene expression matrix for the pilot RN..."
    );
    assert_eq!(view["edges"].as_array().map(Vec::len), Some(3));
}

#[test]
fn show_dot_applies_expansions_direction_and_output_file() {
    let input = demo();
    let out = tmp_dir("dot").join("graph.dot");
    let output = run(&[
        "show",
        input.to_str().expect("utf8 path"),
        "--format",
        "dot",
        "--direction",
        "TB",
        "--expand",
        COLLECTION,
        "--expand",
        COLLECTION,
        "--highlight",
        ROOT,
        "ark:59852/dataset-reads-s2",
        "--out",
        out.to_str().expect("utf8 path"),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let dot = fs::read_to_string(&out).expect("dot output");
    assert!(dot.starts_with("digraph evidence {"));
    assert!(dot.contains("rankdir=TB;"));
    assert!(dot.contains("Input Datasets (2)"));
    assert!(dot.contains("\"ark:59852/dataset-reads-s2\" [label=\"Trimmed reads, sample 2\\n(Dataset)\", style=\"bold\"];"));
    assert!(dot.contains(&format!(
        "\"{COLLECTION}\" -> \"ark:59852/dataset-reads-s2\" [label=\"contains\", style=bold];"
    )));
}

#[test]
fn path_falls_back_to_the_document() {
    let input = demo();
    let value = stdout_json(&run(&[
        "path",
        input.to_str().expect("utf8 path"),
        "--from",
        ROOT,
        "--to",
        "ark:59852/sample-s2",
        "--json",
    ]));
    assert_eq!(value["source"], "document");
    assert_eq!(
        value["nodeIds"],
        serde_json::json!([
            ROOT,
            "ark:59852/computation-quantify",
            "ark:59852/dataset-reads-s2",
            "ark:59852/experiment-sequencing",
            "ark:59852/sample-s2"
        ])
    );
    assert_eq!(
        value["unmaterialized"],
        serde_json::json!([
            "ark:59852/dataset-reads-s2",
            "ark:59852/experiment-sequencing",
            "ark:59852/sample-s2"
        ])
    );
}

#[test]
fn path_uses_rendered_graph_after_expansion() {
    let input = demo();
    let value = stdout_json(&run(&[
        "path",
        input.to_str().expect("utf8 path"),
        "--expand",
        COLLECTION,
        "--expand",
        COLLECTION,
        "--expand",
        "ark:59852/dataset-reads-s2",
        "--from",
        "ark:59852/software-salmon",
        "--to",
        "ark:59852/experiment-sequencing",
        "--json",
    ]));
    assert_eq!(value["source"], "rendered");
    let ids = value["nodeIds"].as_array().expect("ids");
    assert_eq!(ids.first(), Some(&Value::from("ark:59852/software-salmon")));
    assert_eq!(ids.last(), Some(&Value::from("ark:59852/experiment-sequencing")));
}

#[test]
fn path_between_unrelated_nodes_fails() {
    let input = demo();
    let output = run(&[
        "path",
        input.to_str().expect("utf8 path"),
        "--from",
        "ark:59852/software-salmon",
        "--to",
        "ark:59852/sample-s2",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no relationship"));
}

#[test]
fn inspect_lists_entities_and_relation_counts() {
    let input = demo();
    let output = run(&["inspect", input.to_str().expect("utf8 path")]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("(7 entities)"));
    assert!(text.contains(&format!("* {ROOT} Dataset generatedBy=1")));
    assert!(text.contains("usedSoftware=1 usedDataset=4") || text.contains("usedDataset=4 usedSoftware=1"));
    assert!(text.contains("ark:59852/instrument-novaseq Instrument"));
}

#[test]
fn config_file_is_applied_and_flags_override_it() {
    let input = demo();
    let config = tmp_dir("config").join("viewer.json");
    fs::write(
        &config,
        r#"{"expansion": {"initial_depth": 1}, "layout": {"direction": "RL"}}"#,
    )
    .expect("write config");

    let view = stdout_json(&run(&[
        "show",
        input.to_str().expect("utf8 path"),
        "--config",
        config.to_str().expect("utf8 path"),
    ]));
    assert_eq!(view["direction"], "RL");
    assert_eq!(view["nodes"].as_array().map(Vec::len), Some(2));

    let view = stdout_json(&run(&[
        "show",
        input.to_str().expect("utf8 path"),
        "--config",
        config.to_str().expect("utf8 path"),
        "--depth",
        "0",
        "--direction",
        "BT",
    ]));
    assert_eq!(view["direction"], "BT");
    assert_eq!(view["nodes"].as_array().map(Vec::len), Some(1));
}

#[test]
fn malformed_documents_are_reported() {
    let file = tmp_dir("bad").join("bad.jsonld");
    fs::write(&file, r#"{"name": "no graph here"}"#).expect("write");
    let output = run(&["show", file.to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load"));
    assert!(stderr.contains("@graph"));
}

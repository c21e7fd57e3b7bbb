use anyhow::Result;
use evigraph_layout::Direction;
use evigraph_model::{EvidenceEdge, EvidenceNode};
use serde::Serialize;

use crate::session::GraphSession;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView<'a> {
    #[serde(flatten)]
    pub node: &'a EvidenceNode,
    pub expandable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<usize>,
    pub selected: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView<'a> {
    #[serde(flatten)]
    pub edge: &'a EvidenceEdge,
    pub highlighted: bool,
}

/// What a renderer sees: the session's graph plus per-node UI flags.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView<'a> {
    pub direction: Direction,
    pub nodes: Vec<NodeView<'a>>,
    pub edges: Vec<EdgeView<'a>>,
}

impl<'a> GraphView<'a> {
    pub fn from_session(session: &'a GraphSession) -> Self {
        let highlight = session.highlight();
        let nodes = session
            .nodes()
            .iter()
            .map(|node| NodeView {
                node,
                expandable: node.expandable(),
                remaining: node.remaining(),
                selected: session.is_selected(&node.id),
                highlighted: highlight.is_some_and(|h| h.contains_node(&node.id)),
            })
            .collect();
        let edges = session
            .edges()
            .iter()
            .map(|edge| EdgeView {
                edge,
                highlighted: highlight.is_some_and(|h| h.contains_edge(&edge.id)),
            })
            .collect();
        Self {
            direction: session.config().layout.direction,
            nodes,
            edges,
        }
    }
}

pub fn render_json(view: &GraphView<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

pub fn render_dot(view: &GraphView<'_>) -> String {
    fn dot_escape(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }

    let mut out = String::new();
    out.push_str("digraph evidence {\n");
    out.push_str(&format!("  rankdir={};\n", view.direction));
    out.push_str("  node [shape=box, fontname=\"Helvetica\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\"];\n\n");

    for n in &view.nodes {
        let mut attrs = vec![format!(
            "label=\"{}\\n({})\"",
            dot_escape(&n.node.display_name),
            dot_escape(n.node.kind.as_str())
        )];
        let mut styles = Vec::new();
        if n.node.is_collection() {
            styles.push("dashed");
        }
        if n.highlighted {
            styles.push("bold");
        }
        if n.selected {
            styles.push("filled");
        }
        if !styles.is_empty() {
            attrs.push(format!("style=\"{}\"", styles.join(",")));
        }
        out.push_str(&format!(
            "  \"{}\" [{}];\n",
            dot_escape(&n.node.id),
            attrs.join(", ")
        ));
    }

    if !view.edges.is_empty() {
        out.push('\n');
    }
    for e in &view.edges {
        let mut attrs = vec![format!("label=\"{}\"", dot_escape(&e.edge.label))];
        if e.highlighted {
            attrs.push("style=bold".to_string());
        }
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [{}];\n",
            dot_escape(&e.edge.source),
            dot_escape(&e.edge.target),
            attrs.join(", ")
        ));
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use evigraph_model::GraphDocument;
    use serde_json::json;

    fn session() -> GraphSession {
        let document = GraphDocument::from_value(json!({
            "@graph": [
                {
                    "@id": "ark:c",
                    "@type": "Computation",
                    "name": "Say \"hi\"",
                    "usedSoftware": {"@id": "ark:s", "@type": "Software", "name": "echo"},
                    "usedDataset": ["ark:d1", "ark:d2"]
                }
            ]
        }))
        .expect("document");
        let mut session = GraphSession::new(ViewerConfig::default());
        session.load(document);
        session
    }

    #[test]
    fn dot_marks_collections_and_highlights() {
        let mut session = session();
        session.find_relationship("ark:c", "ark:s");
        let dot = render_dot(&GraphView::from_session(&session));

        assert!(dot.starts_with("digraph evidence {\n  rankdir=LR;"));
        assert!(dot.contains("\"ark:c\" [label=\"Say \\\"hi\\\"\\n(Computation)\", style=\"bold\"];"));
        assert!(dot.contains("\\n(DatasetCollection)\", style=\"dashed\"]"));
        assert!(dot.contains("\"ark:c\" -> \"ark:s\" [label=\"used software\", style=bold];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn json_view_carries_ui_flags() {
        let session = session();
        let text = render_json(&GraphView::from_session(&session)).expect("json");
        let v: serde_json::Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(v["direction"], "LR");
        let nodes = v["nodes"].as_array().expect("nodes");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0]["id"], "ark:c");
        assert_eq!(nodes[0]["type"], "Computation");
        assert_eq!(nodes[0]["expandable"], false);
        let collection = &nodes[2];
        assert_eq!(collection["type"], "DatasetCollection");
        assert_eq!(collection["remaining"], 2);
        assert_eq!(collection["expandable"], true);
        assert_eq!(v["edges"][0]["relation"], "usedSoftware");
        assert_eq!(v["edges"][0]["highlighted"], false);
    }
}

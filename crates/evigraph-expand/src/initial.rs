use evigraph_model::{GraphDocument, IdSequence};
use tracing::{debug, warn};

use crate::elements::ElementSet;
use crate::engine::Expander;

/// Build the root node of `document` and expand breadth-first for `depth`
/// levels.
///
/// Only `expand_node` is used, so an activity with several input datasets
/// shows one collapsed collection rather than every dataset. A node joins
/// the next level only if this pass added it and it is expandable. Nodes
/// whose expansion yields nothing end `Exhausted`, not `Expanded`. Dataset
/// collections are never queued.
pub fn initial_elements(
    document: &GraphDocument,
    depth: usize,
    expander: &Expander<'_>,
    ids: &mut IdSequence,
) -> ElementSet {
    let mut elements = ElementSet::new();
    let Some(root) = document.root().and_then(|e| expander.builder().build_node(e)) else {
        warn!("root entity has no @id; nothing to render");
        return elements;
    };

    let mut frontier = Vec::new();
    if root.expandable() {
        frontier.push(root.id.clone());
    }
    elements.insert_node(root);

    for level in 0..depth {
        if frontier.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for id in frontier {
            let Some(node) = elements.node_mut(&id) else {
                continue;
            };
            if !node.begin_expansion() {
                continue;
            }

            let expansion = match elements.node(&id) {
                Some(node) => expander.expand_node(node, elements.nodes(), ids),
                None => continue,
            };
            if let Some(node) = elements.node_mut(&id) {
                node.finish_expansion(!expansion.is_empty());
            }

            let absorbed = elements.absorb(expansion.new_nodes, expansion.new_edges);
            for new_id in absorbed.node_ids {
                // Collections only open on an explicit click.
                if elements
                    .node(&new_id)
                    .is_some_and(|n| n.expandable() && !n.is_collection())
                {
                    next.push(new_id);
                }
            }
        }
        debug!(level, queued = next.len(), "initial expansion level done");
        frontier = next;
    }
    elements
}

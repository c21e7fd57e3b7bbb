use ahash::AHashSet;
use evigraph_model::{entity_id, is_bare_reference, relation_targets, GraphDocument, Relation};
use serde_json::Value;
use tracing::trace;

/// First id path from the document root to `target_id` in the raw JSON-LD.
///
/// Relations are followed in `Relation::ENTITY_RELATIONS` order, bare
/// references are swapped for the document's full entity when it has one,
/// and each id is entered at most once over the whole search. The walk keeps
/// its own frame stack, so chain length is bounded by memory, not by the
/// thread stack.
pub fn find_path_in_full_graph(document: &GraphDocument, target_id: &str) -> Option<Vec<String>> {
    let root = document.root()?;
    let mut visited = AHashSet::new();
    let mut frames: Vec<Frame> = Vec::new();

    if enter(root, target_id, &mut visited, &mut frames) {
        return Some(path_of(&frames));
    }
    while let Some(frame) = frames.last_mut() {
        let Some(child) = frame.children.get_mut(frame.next).map(std::mem::take) else {
            frames.pop();
            continue;
        };
        frame.next += 1;

        let full = if is_bare_reference(&child) {
            entity_id(&child).and_then(|cid| document.get(cid))
        } else {
            None
        };
        if enter(full.unwrap_or(&child), target_id, &mut visited, &mut frames) {
            return Some(path_of(&frames));
        }
    }

    trace!(target = target_id, visited = visited.len(), "target unreachable from root");
    None
}

/// One entity on the current path and the relation targets still to try.
struct Frame {
    id: String,
    children: Vec<Value>,
    next: usize,
}

/// Push a frame for `entity` unless it has no id or was already entered.
/// Returns true when `entity` is the target.
fn enter(
    entity: &Value,
    target_id: &str,
    visited: &mut AHashSet<String>,
    frames: &mut Vec<Frame>,
) -> bool {
    let Some(id) = entity_id(entity) else {
        return false;
    };
    if !visited.insert(id.to_string()) {
        return false;
    }
    let found = id == target_id;
    let children = if found {
        Vec::new()
    } else {
        Relation::ENTITY_RELATIONS
            .into_iter()
            .flat_map(|relation| relation_targets(entity, relation))
            .collect()
    };
    frames.push(Frame {
        id: id.to_string(),
        children,
        next: 0,
    });
    found
}

fn path_of(frames: &[Frame]) -> Vec<String> {
    frames.iter().map(|f| f.id.clone()).collect()
}

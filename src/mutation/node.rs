use super::begin;
use crate::error::PreconditionError;
use crate::ids;
use crate::model::{Definition, Node, NodeId};
use crate::normalizer::{FALLBACK_START, canonicalize};
use serde_json::Value;
use tracing::trace;

/// Partial update for a node's scalar fields. `None` leaves a field untouched;
/// an empty `prompt` or `handler` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub node_type: Option<String>,
    pub prompt: Option<String>,
    pub handler: Option<String>,
}

impl NodePatch {
    pub fn node_type(value: impl Into<String>) -> Self {
        Self {
            node_type: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn prompt(value: impl Into<String>) -> Self {
        Self {
            prompt: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn handler(value: impl Into<String>) -> Self {
        Self {
            handler: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Appends a node of `node_type` with an id allocated from `hint`.
///
/// Returns the new definition and the allocated id, which callers use as the
/// next selection.
pub fn add_node(def: &Definition, hint: &str, node_type: &str) -> (Definition, NodeId) {
    let mut next = begin(def);
    let id = ids::node_id(&next, hint);
    next.nodes.push(Node::new(id.clone(), node_type));
    (canonicalize(next), id)
}

/// Inserts `node` as given at `index` (clamped to the end of the list).
/// The caller guarantees the id is free.
pub fn insert_node(def: &Definition, index: usize, node: Node) -> Definition {
    let mut next = begin(def);
    let index = index.min(next.nodes.len());
    next.nodes.insert(index, node);
    canonicalize(next)
}

/// Drops the node, every transition that targets it, and reassigns `start` to
/// the first remaining node (or the fallback id) when the start node goes.
///
/// Removing the start node is allowed; restricting it is up to the calling layer.
pub fn remove_node(def: &Definition, id: &str) -> Definition {
    let mut next = begin(def);
    next.nodes.retain(|n| n.id != id);
    for node in &mut next.nodes {
        node.transitions.retain(|t| t.to != id);
    }
    if next.start == id {
        next.start = next
            .nodes
            .first()
            .map(|n| n.id.clone())
            .unwrap_or_else(|| FALLBACK_START.to_string());
        trace!(removed = id, start = %next.start, "remove_node: start reassigned");
    }
    canonicalize(next)
}

/// The node an editor should select after `id` is removed: its predecessor in
/// list order, else whatever becomes the first node.
pub fn selection_after_removal(def: &Definition, id: &str) -> Option<NodeId> {
    let index = def.node_index(id)?;
    let remaining = def.nodes.iter().filter(|n| n.id != id);
    if index > 0 {
        remaining.take(index).last().map(|n| n.id.clone())
    } else {
        remaining.map(|n| n.id.clone()).next()
    }
}

/// Renames a node and rewrites every reference to it (transitions and `start`).
///
/// This does not check whether `new_id` is already taken: uniqueness is the
/// caller's contract, and a collision surfaces as a duplicate-id validation
/// issue. Use [`try_rename_node`] for the checked variant.
pub fn rename_node(def: &Definition, old_id: &str, new_id: &str) -> Definition {
    let mut next = begin(def);
    if old_id == new_id || !next.contains_node(old_id) {
        return next;
    }
    for node in &mut next.nodes {
        if node.id == old_id {
            node.id = new_id.to_string();
        }
        for transition in &mut node.transitions {
            if transition.to == old_id {
                transition.to = new_id.to_string();
            }
        }
    }
    if next.start == old_id {
        next.start = new_id.to_string();
    }
    canonicalize(next)
}

/// [`rename_node`] that rejects a missing source or an existing target id.
/// Renaming a node to its own id counts as a collision.
pub fn try_rename_node(
    def: &Definition,
    old_id: &str,
    new_id: &str,
) -> Result<Definition, PreconditionError> {
    if !def.contains_node(old_id) {
        return Err(PreconditionError::NodeNotFound(old_id.to_string()));
    }
    if def.contains_node(new_id) {
        return Err(PreconditionError::NodeExists(new_id.to_string()));
    }
    Ok(rename_node(def, old_id, new_id))
}

/// Merges `patch` into the node at `node_index`.
pub fn patch_node(def: &Definition, node_index: usize, patch: NodePatch) -> Definition {
    let mut next = begin(def);
    let Some(node) = next.nodes.get_mut(node_index) else {
        trace!(node_index, "patch_node: index out of range");
        return next;
    };
    if let Some(node_type) = patch.node_type {
        node.node_type = node_type;
    }
    if let Some(prompt) = patch.prompt {
        node.prompt = Some(prompt);
    }
    if let Some(handler) = patch.handler {
        node.handler = Some(handler);
    }
    canonicalize(next)
}

/// Sets or clears one config entry.
///
/// `None`, JSON `null` and the empty string delete the key. A config map left
/// empty becomes absent.
pub fn set_node_config_value(
    def: &Definition,
    node_index: usize,
    key: &str,
    value: Option<Value>,
) -> Definition {
    let mut next = begin(def);
    let Some(node) = next.nodes.get_mut(node_index) else {
        trace!(node_index, "set_node_config_value: index out of range");
        return next;
    };
    let mut config = node.config.take().unwrap_or_default();
    match value {
        None | Some(Value::Null) => {
            config.remove(key);
        }
        Some(Value::String(s)) if s.is_empty() => {
            config.remove(key);
        }
        Some(v) => {
            config.insert(key.to_string(), v);
        }
    }
    node.config = Some(config);
    canonicalize(next)
}

/// Points `start` at `id`. Existence is checked by the validator, not here.
pub fn set_start(def: &Definition, id: &str) -> Definition {
    let mut next = begin(def);
    next.start = id.to_string();
    canonicalize(next)
}

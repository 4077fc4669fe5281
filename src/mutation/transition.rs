use super::begin;
use crate::model::{Definition, NodeId, ObjectMap, Transition, condition};
use crate::normalizer::canonicalize;
use tracing::trace;

/// Partial update for a transition. The outer `Option` selects whether a field
/// is touched; for `when`/`effects` an inner `None` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionPatch {
    pub to: Option<NodeId>,
    pub when: Option<Option<ObjectMap>>,
    pub effects: Option<Option<ObjectMap>>,
}

/// Appends an unconditional transition to `to`.
pub fn add_transition(def: &Definition, node_index: usize, to: &str) -> Definition {
    push_transition(def, node_index, Transition::to(to))
}

/// Appends a fully formed transition.
pub fn push_transition(def: &Definition, node_index: usize, transition: Transition) -> Definition {
    let mut next = begin(def);
    let Some(node) = next.nodes.get_mut(node_index) else {
        trace!(node_index, "push_transition: index out of range");
        return next;
    };
    node.transitions.push(transition);
    canonicalize(next)
}

pub fn remove_transition(def: &Definition, node_index: usize, transition_index: usize) -> Definition {
    let mut next = begin(def);
    let Some(node) = next
        .nodes
        .get_mut(node_index)
        .filter(|n| transition_index < n.transitions.len())
    else {
        trace!(node_index, transition_index, "remove_transition: index out of range");
        return next;
    };
    node.transitions.remove(transition_index);
    canonicalize(next)
}

pub fn patch_transition(
    def: &Definition,
    node_index: usize,
    transition_index: usize,
    patch: TransitionPatch,
) -> Definition {
    let mut next = begin(def);
    let Some(transition) = next
        .nodes
        .get_mut(node_index)
        .and_then(|n| n.transitions.get_mut(transition_index))
    else {
        trace!(node_index, transition_index, "patch_transition: index out of range");
        return next;
    };
    if let Some(to) = patch.to {
        transition.to = to;
    }
    if let Some(when) = patch.when {
        transition.when = when.map(|w| condition::prune(&w));
    }
    if let Some(effects) = patch.effects {
        transition.effects = effects;
    }
    canonicalize(next)
}

/// Sets the guard of a transition. Blank entries are pruned first; a guard with
/// nothing left is stored as absent, turning the edge into a default edge.
pub fn set_transition_condition(
    def: &Definition,
    node_index: usize,
    transition_index: usize,
    when: Option<ObjectMap>,
) -> Definition {
    patch_transition(
        def,
        node_index,
        transition_index,
        TransitionPatch {
            when: Some(when),
            ..TransitionPatch::default()
        },
    )
}

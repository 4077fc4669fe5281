use super::lead::{LeadKanban, LeadSummary};
use serde::Serialize;
use serde_json::{Map, Value};

/// Identifier of a node inside a `Definition`.
pub type NodeId = String;

/// An ordered, string-keyed JSON object. Used for node config, transition
/// conditions and transition effects.
pub type ObjectMap = Map<String, Value>;

/// The canonical, versioned flow graph being edited.
///
/// A `Definition` is only ever produced by the normalizer (see
/// [`crate::normalizer::normalize`]), so every value in circulation already has
/// its optional collections materialized or cleanly absent. It is not
/// `Deserialize` on purpose: untrusted JSON enters through the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub version: i64,
    pub start: NodeId,
    pub nodes: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_summary: Option<LeadSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_kanban: Option<LeadKanban>,
}

/// One conversation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Open tag interpreted by the runtime; the engine never enumerates it.
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ObjectMap>,
    pub transitions: Vec<Transition>,
}

/// A directed edge to another node. A transition without `when` is always taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub to: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<ObjectMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<ObjectMap>,
}

impl Definition {
    /// An empty definition whose `start` is the literal fallback id.
    pub fn empty() -> Self {
        Self {
            version: 1,
            start: crate::normalizer::FALLBACK_START.to_string(),
            nodes: Vec::new(),
            lead_summary: None,
            lead_kanban: None,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn transition_count(&self) -> usize {
        self.nodes.iter().map(|n| n.transitions.len()).sum()
    }
}

impl Node {
    /// A node with no prompt, handler, config or transitions.
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            prompt: None,
            handler: None,
            config: None,
            transitions: Vec::new(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }
}

impl Transition {
    /// An unconditional (default) edge.
    pub fn to(target: impl Into<NodeId>) -> Self {
        Self {
            to: target.into(),
            when: None,
            effects: None,
        }
    }

    pub fn when(mut self, condition: ObjectMap) -> Self {
        self.when = if condition.is_empty() {
            None
        } else {
            Some(condition)
        };
        self
    }

    pub fn is_default(&self) -> bool {
        self.when.is_none()
    }
}

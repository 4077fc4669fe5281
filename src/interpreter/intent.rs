use super::templates;
use crate::config::InterpreterConfig;
use crate::error::PreconditionError;
use crate::ids;
use crate::model::{Definition, Node, NodeId, ObjectMap, Transition, condition};
use crate::mutation::{self, NodePatch};
use itertools::Itertools;
use serde_json::Value;

/// What a new node created by `criar nó` looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewNode {
    Message(String),
    End,
}

/// The guard of a transition written with `nó a -> b ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Default,
    ContainsAny(Vec<String>),
    YesNo(bool),
    Schedule,
}

/// Which consent text `inserir lgpd` uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LgpdText {
    Short,
    Full,
    Custom(String),
}

/// One parsed command line, ready to be folded over a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CreateNode { id: NodeId, kind: NewNode },
    BasicFlow,
    InsertLgpd(LgpdText),
    SetStart(NodeId),
    Connect { from: NodeId, to: NodeId, guard: Guard },
    SetType { id: NodeId, node_type: String },
    SetPrompt { id: NodeId, prompt: String },
    SetHandler { id: NodeId, handler: String },
    Rename { from: NodeId, to: NodeId },
    Remove(NodeId),
}

/// Result of applying one intent.
#[derive(Debug, Clone)]
pub struct Applied {
    pub definition: Definition,
    /// The node the editor should focus after this step, if any.
    pub focus: Option<NodeId>,
}

impl Guard {
    fn condition(&self, config: &InterpreterConfig) -> Option<ObjectMap> {
        match self {
            Guard::Default => None,
            Guard::ContainsAny(words) => Some(condition::contains_any(words)),
            Guard::YesNo(yes) => Some(condition::yes_no(*yes)),
            Guard::Schedule => Some(condition::intent(&config.schedule_intent)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Guard::Default => "always".to_string(),
            Guard::ContainsAny(words) => {
                format!("when the reply contains any of [{}]", words.iter().join(", "))
            }
            Guard::YesNo(true) => "when the reply is yes".to_string(),
            Guard::YesNo(false) => "when the reply is no".to_string(),
            Guard::Schedule => "when the user asks to schedule".to_string(),
        }
    }
}

impl LgpdText {
    fn text<'a>(&'a self, config: &'a InterpreterConfig) -> &'a str {
        match self {
            LgpdText::Short => config.lgpd_short_text.as_str(),
            LgpdText::Full => config.lgpd_full_text.as_str(),
            LgpdText::Custom(text) => text.as_str(),
        }
    }
}

impl Intent {
    /// A one-line, human-readable account of what this intent does.
    pub fn describe(&self, config: &InterpreterConfig) -> String {
        match self {
            Intent::CreateNode {
                id,
                kind: NewNode::Message(prompt),
            } => format!(
                "create node '{}' ({}) with prompt \"{}\"",
                id, config.message_type, prompt
            ),
            Intent::CreateNode {
                id,
                kind: NewNode::End,
            } => format!("create node '{}' ({})", id, config.end_type),
            Intent::BasicFlow => format!(
                "add the starter flow ({})",
                templates::STARTER_NODE_IDS.iter().join(", ")
            ),
            Intent::InsertLgpd(text) => {
                let variant = match text {
                    LgpdText::Short => "short",
                    LgpdText::Full => "full",
                    LgpdText::Custom(_) => "custom",
                };
                format!("insert a {} LGPD consent node before the current start", variant)
            }
            Intent::SetStart(id) => format!("set start to '{}'", id),
            Intent::Connect { from, to, guard } => {
                format!("connect '{}' -> '{}' {}", from, to, guard.describe())
            }
            Intent::SetType { id, node_type } => {
                format!("set type of '{}' to '{}'", id, node_type)
            }
            Intent::SetPrompt { id, prompt } => {
                format!("set prompt of '{}' to \"{}\"", id, prompt)
            }
            Intent::SetHandler { id, handler } => {
                format!("set handler of '{}' to '{}'", id, handler)
            }
            Intent::Rename { from, to } => format!("rename node '{}' to '{}'", from, to),
            Intent::Remove(id) => format!("remove node '{}'", id),
        }
    }

    /// Checks this intent's preconditions against `def` and applies it through
    /// the mutation catalog.
    pub fn apply(
        &self,
        def: &Definition,
        config: &InterpreterConfig,
    ) -> Result<Applied, PreconditionError> {
        match self {
            Intent::CreateNode { id, kind } => {
                require_absent(def, id)?;
                let node = match kind {
                    NewNode::Message(prompt) => {
                        Node::new(id.clone(), config.message_type.clone()).with_prompt(prompt.clone())
                    }
                    NewNode::End => Node::new(id.clone(), config.end_type.clone()),
                };
                let definition = mutation::insert_node(def, def.nodes.len(), node);
                Ok(focused(definition, id))
            }
            Intent::BasicFlow => {
                if let Some(taken) = templates::STARTER_NODE_IDS
                    .iter()
                    .find(|id| def.contains_node(id))
                {
                    return Err(PreconditionError::TemplateCollision(taken.to_string()));
                }
                let entry = templates::STARTER_NODE_IDS[0];
                let definition = templates::starter_nodes(config)
                    .into_iter()
                    .fold(def.clone(), |acc, node| {
                        mutation::insert_node(&acc, acc.nodes.len(), node)
                    });
                let definition = mutation::set_start(&definition, entry);
                Ok(focused(definition, entry))
            }
            Intent::InsertLgpd(text) => {
                let id = ids::node_id(def, &config.lgpd_node_id);
                let mut node_config = ObjectMap::new();
                node_config.insert("variant".to_string(), Value::String("lgpd".to_string()));
                let node = Node {
                    config: Some(node_config),
                    ..Node::new(id.clone(), config.message_type.clone())
                        .with_prompt(text.text(config))
                        .with_transition(Transition::to(def.start.clone()))
                };
                let definition = mutation::insert_node(def, 0, node);
                let definition = mutation::set_start(&definition, &id);
                Ok(focused(definition, &id))
            }
            Intent::SetStart(id) => {
                require_present(def, id)?;
                Ok(focused(mutation::set_start(def, id), id))
            }
            Intent::Connect { from, to, guard } => {
                let index = require_present(def, from)?;
                require_present(def, to)?;
                let mut transition = Transition::to(to.clone());
                transition.when = guard.condition(config);
                let definition = mutation::push_transition(def, index, transition);
                Ok(focused(definition, from))
            }
            Intent::SetType { id, node_type } => {
                let index = require_present(def, id)?;
                let definition = mutation::patch_node(def, index, NodePatch::node_type(node_type));
                Ok(focused(definition, id))
            }
            Intent::SetPrompt { id, prompt } => {
                let index = require_present(def, id)?;
                let definition = mutation::patch_node(def, index, NodePatch::prompt(prompt));
                Ok(focused(definition, id))
            }
            Intent::SetHandler { id, handler } => {
                let index = require_present(def, id)?;
                let definition = mutation::patch_node(def, index, NodePatch::handler(handler));
                Ok(focused(definition, id))
            }
            Intent::Rename { from, to } => {
                let definition = mutation::try_rename_node(def, from, to)?;
                Ok(focused(definition, to))
            }
            Intent::Remove(id) => {
                require_present(def, id)?;
                let focus = mutation::selection_after_removal(def, id);
                Ok(Applied {
                    definition: mutation::remove_node(def, id),
                    focus,
                })
            }
        }
    }
}

fn focused(definition: Definition, id: &str) -> Applied {
    Applied {
        definition,
        focus: Some(id.to_string()),
    }
}

fn require_present(def: &Definition, id: &str) -> Result<usize, PreconditionError> {
    def.node_index(id)
        .ok_or_else(|| PreconditionError::NodeNotFound(id.to_string()))
}

fn require_absent(def: &Definition, id: &str) -> Result<(), PreconditionError> {
    if def.contains_node(id) {
        Err(PreconditionError::NodeExists(id.to_string()))
    } else {
        Ok(())
    }
}

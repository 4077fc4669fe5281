//! Converts arbitrary, possibly malformed JSON into a canonical [`Definition`].
//!
//! Normalization is total: every input produces a definition. Structural
//! problems (dangling targets, duplicate ids) are left in place for the
//! validator to report; only shape is repaired here.

use crate::error::LoadError;
use crate::model::{
    Definition, KanbanStage, LeadKanban, LeadSummary, LeadSummaryField, Node, ObjectMap,
    SourceOption, Transition,
};
use serde_json::Value;
use tracing::trace;

/// The `start` id used when a definition has no nodes to default to.
pub const FALLBACK_START: &str = "start";

/// Schema version assumed when the input carries none.
pub const DEFAULT_VERSION: i64 = 1;

/// Reads untrusted JSON into a canonical definition.
///
/// Transitions are re-projected to exactly `{to, when, effects}`; any other key
/// is dropped here, which makes this the sanitization boundary for input.
pub fn normalize(raw: &Value) -> Definition {
    let Some(obj) = raw.as_object() else {
        trace!("normalize: input is not an object, using an empty definition");
        return canonicalize(Definition::empty());
    };

    let nodes = obj
        .get("nodes")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(read_node).collect())
        .unwrap_or_default();

    let definition = Definition {
        version: obj.get("version").and_then(read_version).unwrap_or(DEFAULT_VERSION),
        start: obj.get("start").and_then(read_id).unwrap_or_default(),
        nodes,
        lead_summary: obj.get("lead_summary").and_then(read_lead_summary),
        lead_kanban: obj.get("lead_kanban").and_then(read_lead_kanban),
    };

    canonicalize(definition)
}

/// Applies the canonical-form rules to an already typed definition.
///
/// Every mutation runs its input through this on entry and its output on exit,
/// so `canonicalize(canonicalize(d)) == canonicalize(d)` must hold.
pub fn canonicalize(mut def: Definition) -> Definition {
    for node in &mut def.nodes {
        node.prompt = node.prompt.take().filter(|p| !p.is_empty());
        node.handler = node.handler.take().filter(|h| !h.is_empty());
        node.config = node.config.take().filter(|c| !c.is_empty());
        for transition in &mut node.transitions {
            transition.when = transition.when.take().filter(|w| !w.is_empty());
            transition.effects = transition.effects.take().filter(|e| !e.is_empty());
        }
    }

    if def.start.is_empty() {
        def.start = def
            .nodes
            .first()
            .map(|n| n.id.clone())
            .unwrap_or_else(|| FALLBACK_START.to_string());
    }

    def.lead_summary = def.lead_summary.take().map(canonical_lead_summary);
    def.lead_kanban = def.lead_kanban.take().map(|kanban| LeadKanban {
        stages: kanban
            .stages
            .into_iter()
            .map(|s| KanbanStage {
                id: s.id.trim().to_string(),
                label: s.label.trim().to_string(),
            })
            .filter(|s| {
                let keep = !s.id.is_empty() && !s.label.is_empty();
                if !keep {
                    trace!(stage = ?s, "normalize: dropping incomplete kanban stage");
                }
                keep
            })
            .collect(),
    });

    def
}

impl Definition {
    /// Decodes JSON text and normalizes it. Only the decoding step can fail.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let raw: Value =
            serde_json::from_str(text).map_err(|e| LoadError::InvalidJson(e.to_string()))?;
        Ok(normalize(&raw))
    }

    /// Serializes the canonical form. Serialization of these types cannot fail
    /// in practice; a failure is still reported rather than swallowed.
    pub fn to_json_string_pretty(&self) -> Result<String, LoadError> {
        serde_json::to_string_pretty(self).map_err(|e| LoadError::InvalidJson(e.to_string()))
    }

    pub fn to_json_value(&self) -> Result<Value, LoadError> {
        serde_json::to_value(self).map_err(|e| LoadError::InvalidJson(e.to_string()))
    }
}

fn canonical_lead_summary(summary: LeadSummary) -> LeadSummary {
    let fields = summary
        .fields
        .into_iter()
        .map(|f| LeadSummaryField {
            key: f.key.trim().to_string(),
            label: f.label.trim().to_string(),
            source: f.source.trim().to_string(),
            empty_value: f.empty_value,
        })
        .filter(|f| {
            let keep = !f.key.is_empty() && !f.label.is_empty() && !f.source.is_empty();
            if !keep {
                trace!(field = ?f, "normalize: dropping incomplete lead summary field");
            }
            keep
        })
        .collect();

    let source_options = summary
        .source_options
        .map(|options| {
            options
                .into_iter()
                .map(|o| SourceOption {
                    value: o.value.trim().to_string(),
                    label: o.label.trim().to_string(),
                })
                .filter(|o| !o.value.is_empty() && !o.label.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|options| !options.is_empty());

    LeadSummary {
        fields,
        source_options,
    }
}

fn read_version(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

/// Ids may arrive as strings or numbers; anything else reads as absent.
fn read_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_string(obj: &ObjectMap, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn read_object(obj: &ObjectMap, key: &str) -> Option<ObjectMap> {
    obj.get(key).and_then(Value::as_object).cloned()
}

fn read_node(value: &Value) -> Option<Node> {
    let Some(obj) = value.as_object() else {
        trace!(?value, "normalize: dropping non-object node");
        return None;
    };

    let transitions = obj
        .get("transitions")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(read_transition).collect())
        .unwrap_or_default();

    Some(Node {
        id: obj.get("id").and_then(read_id).unwrap_or_default(),
        node_type: read_string(obj, "type").unwrap_or_default(),
        prompt: read_string(obj, "prompt"),
        handler: read_string(obj, "handler"),
        config: read_object(obj, "config"),
        transitions,
    })
}

fn read_transition(value: &Value) -> Option<Transition> {
    let obj = value.as_object()?;
    Some(Transition {
        to: obj.get("to").and_then(read_id).unwrap_or_default(),
        when: read_object(obj, "when"),
        effects: read_object(obj, "effects"),
    })
}

fn read_lead_summary(value: &Value) -> Option<LeadSummary> {
    let obj = value.as_object()?;
    let fields = obj
        .get("fields")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|f| LeadSummaryField {
                    key: read_string(f, "key").unwrap_or_default(),
                    label: read_string(f, "label").unwrap_or_default(),
                    source: read_string(f, "source").unwrap_or_default(),
                    empty_value: read_string(f, "empty_value"),
                })
                .collect()
        })
        .unwrap_or_default();

    let source_options = obj.get("source_options").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|o| SourceOption {
                value: read_string(o, "value").unwrap_or_default(),
                label: read_string(o, "label").unwrap_or_default(),
            })
            .collect()
    });

    Some(LeadSummary {
        fields,
        source_options,
    })
}

fn read_lead_kanban(value: &Value) -> Option<LeadKanban> {
    let obj = value.as_object()?;
    let stages = obj
        .get("stages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|s| KanbanStage {
                    id: s.get("id").and_then(read_id).unwrap_or_default(),
                    label: read_string(s, "label").unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();
    Some(LeadKanban { stages })
}

//! Common test utilities for building flow definitions.
use fluxo::prelude::*;
use serde_json::json;

/// The single-node flow a new editor session starts from.
#[allow(dead_code)]
pub fn create_starting_flow() -> Definition {
    normalize(&json!({
        "version": 1,
        "start": "start",
        "nodes": [{ "id": "start", "type": "static_message", "transitions": [] }]
    }))
}

/// A small, valid flow with a branch, a loop back and both lead sections.
///
/// `welcome -> ask -> (yes) done | (no) ask`, start = `welcome`.
#[allow(dead_code)]
pub fn create_sample_flow() -> Definition {
    normalize(&json!({
        "version": 3,
        "start": "welcome",
        "nodes": [
            {
                "id": "welcome",
                "type": "static_message",
                "prompt": "Olá!",
                "transitions": [{ "to": "ask" }]
            },
            {
                "id": "ask",
                "type": "question",
                "prompt": "Quer continuar?",
                "config": { "save_as": "answer" },
                "transitions": [
                    { "to": "done", "when": { "yes_no": "yes" } },
                    { "to": "ask", "when": { "yes_no": "no" } }
                ]
            },
            { "id": "done", "type": "end", "transitions": [] }
        ],
        "lead_summary": {
            "fields": [
                { "key": "name", "label": "Nome", "source": "state.name" },
                { "key": "phone", "label": "Telefone", "source": "state.phone", "empty_value": "-" },
                { "key": "city", "label": "Cidade", "source": "state.city" }
            ],
            "source_options": [
                { "value": "state.name", "label": "Nome" },
                { "value": "state.phone", "label": "Telefone" }
            ]
        },
        "lead_kanban": {
            "stages": [
                { "id": "welcome", "label": "Novo" },
                { "id": "ask", "label": "Qualificando" }
            ]
        }
    }))
}

#[allow(dead_code)]
pub fn targets_of(def: &Definition, id: &str) -> Vec<String> {
    def.node(id)
        .map(|n| n.transitions.iter().map(|t| t.to.clone()).collect())
        .unwrap_or_default()
}

#[allow(dead_code)]
pub fn all_targets(def: &Definition) -> Vec<String> {
    def.nodes
        .iter()
        .flat_map(|n| n.transitions.iter().map(|t| t.to.clone()))
        .collect()
}

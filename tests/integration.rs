//! Integration tests for fluxo
//!
//! End-to-end scenarios and properties that span the normalizer, validator,
//! mutation catalog and interpreter.
//!
mod common;
use common::*;
use fluxo::mutation::keyed;
use fluxo::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_edit_session_round_trip() {
        let raw = r#"{
            "version": 2,
            "nodes": [
                { "id": "start", "type": "static_message", "prompt": "Oi", "extra": true }
            ]
        }"#;
        let def = Definition::from_json_str(raw).unwrap();
        assert!(validate(&def).is_empty());

        let outcome = interpret(
            &def,
            "criar nó nome prompt \"Qual seu nome?\"\n\
             criar nó fim fim\n\
             nó start -> nome default\n\
             nó nome -> fim default\n\
             inserir lgpd curto",
        )
        .unwrap();

        let def = add_lead_kanban_stage(&outcome.definition);
        let def = add_lead_field(&def);
        let json = def.to_json_string_pretty().unwrap();

        let reloaded = Definition::from_json_str(&json).unwrap();
        assert_eq!(reloaded, def);
        assert_eq!(reloaded.version, 2);
        assert_eq!(reloaded.start, "lgpd");
        assert_eq!(prepare_for_publish(&reloaded), Ok(reloaded.clone()));
    }

    #[test]
    fn test_remove_then_validate_reports_nothing_dangling() {
        let def = create_sample_flow();
        for id in ["welcome", "ask", "done"] {
            let result = remove_node(&def, id);
            assert!(validate(&result).is_empty(), "removing {}", id);
        }
    }
}

fn arb_id() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("start"), Just("")].prop_map(String::from)
}

fn arb_json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z ]{0,6}".prop_map(Value::String),
    ]
}

fn arb_transition() -> impl Strategy<Value = Value> {
    (
        arb_id(),
        prop::option::of(prop::collection::btree_map("[a-z_]{1,8}", arb_json_scalar(), 0..3)),
        any::<bool>(),
    )
        .prop_map(|(to, when, junk)| {
            let mut t = json!({ "to": to });
            if let Some(when) = when {
                t["when"] = json!(when);
            }
            if junk {
                t["junk"] = json!({ "x": 1 });
            }
            t
        })
}

fn arb_node() -> impl Strategy<Value = Value> {
    (
        arb_id(),
        prop::option::of("[a-z_]{0,10}"),
        prop::option::of("[A-Za-z ?]{0,12}"),
        prop::collection::btree_map("[a-z]{1,5}", arb_json_scalar(), 0..3),
        prop::collection::vec(arb_transition(), 0..4),
    )
        .prop_map(|(id, node_type, prompt, config, transitions)| {
            json!({
                "id": id,
                "type": node_type,
                "prompt": prompt,
                "config": config,
                "transitions": transitions,
            })
        })
}

fn arb_entry(keys: [&'static str; 3]) -> impl Strategy<Value = Value> {
    ("[ a-z]{0,4}", "[ a-z]{0,4}", "[ a-z]{0,4}").prop_map(move |(x, y, z)| {
        let entry: ObjectMap = keys
            .iter()
            .zip([x, y, z])
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        Value::Object(entry)
    })
}

fn arb_raw_definition() -> impl Strategy<Value = Value> {
    (
        prop::option::of(0i64..5),
        prop::option::of(arb_id()),
        prop::collection::vec(arb_node(), 0..6),
        prop::collection::vec(arb_entry(["key", "label", "source"]), 0..4),
        prop::option::of(prop::collection::vec(arb_entry(["value", "label", "unused"]), 0..3)),
        prop::collection::vec(arb_entry(["id", "label", "unused"]), 0..3),
    )
        .prop_map(|(version, start, nodes, fields, options, stages)| {
            json!({
                "version": version,
                "start": start,
                "nodes": nodes,
                "lead_summary": { "fields": fields, "source_options": options },
                "lead_kanban": { "stages": stages },
            })
        })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in arb_raw_definition()) {
        let once = normalize(&raw);
        let twice = normalize(&once.to_json_value().unwrap());
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(canonicalize(once.clone()), once);
    }

    #[test]
    fn well_formed_definitions_validate_clean(
        count in 1usize..8,
        edges in prop::collection::vec((0usize..8, 0usize..8), 0..16),
        start in 0usize..8,
    ) {
        let nodes: Vec<Value> = (0..count)
            .map(|i| {
                let transitions: Vec<Value> = edges
                    .iter()
                    .filter(|(from, _)| from % count == i)
                    .map(|(_, to)| json!({ "to": format!("n{}", to % count) }))
                    .collect();
                json!({ "id": format!("n{}", i), "type": "static_message", "transitions": transitions })
            })
            .collect();
        let def = normalize(&json!({ "start": format!("n{}", start % count), "nodes": nodes }));
        prop_assert!(validate(&def).is_empty());
    }

    #[test]
    fn remove_node_leaves_no_reference(raw in arb_raw_definition(), victim in arb_id()) {
        let def = normalize(&raw);
        let result = remove_node(&def, &victim);
        prop_assert!(all_targets(&result).iter().all(|t| *t != victim));
        prop_assert!(!result.contains_node(&victim));
        if def.start == victim {
            let expected = result.nodes.first().map(|n| n.id.clone()).unwrap_or_else(|| "start".to_string());
            prop_assert_eq!(result.start, expected);
        }
    }

    #[test]
    fn rename_node_moves_every_reference(raw in arb_raw_definition()) {
        let def = normalize(&raw);
        prop_assume!(def.contains_node("a") && !def.contains_node("z"));
        let before = def.nodes.iter().flat_map(|n| &n.transitions).filter(|t| t.to == "a").count();
        let result = rename_node(&def, "a", "z");
        prop_assert!(!result.contains_node("a"));
        prop_assert!(result.contains_node("z"));
        prop_assert_eq!(all_targets(&result).iter().filter(|t| *t == "a").count(), 0);
        prop_assert_eq!(all_targets(&result).iter().filter(|t| *t == "z").count(), before);
        prop_assert_eq!(result.start == "z", def.start == "a");
    }

    #[test]
    fn swapped_preserves_other_entries(
        list in prop::collection::vec(any::<u8>(), 0..10),
        index in 0usize..12,
        offset in -3isize..4,
    ) {
        match keyed::swapped(&list, index, offset) {
            None => {
                let target = index as isize + offset;
                prop_assert!(index >= list.len() || target < 0 || target as usize >= list.len());
            }
            Some(out) => {
                let target = (index as isize + offset) as usize;
                prop_assert_eq!(out.len(), list.len());
                prop_assert_eq!(out[index], list[target]);
                prop_assert_eq!(out[target], list[index]);
                for i in (0..list.len()).filter(|i| *i != index && *i != target) {
                    prop_assert_eq!(out[i], list[i]);
                }
            }
        }
    }

    #[test]
    fn config_value_blanks_never_leave_empty_map(raw in arb_raw_definition(), key in "[a-z]{1,5}") {
        let def = normalize(&raw);
        for index in 0..def.nodes.len() {
            let result = set_node_config_value(&def, index, &key, Some(Value::String(String::new())));
            prop_assert!(result.nodes[index].config.as_ref().is_none_or(|c| !c.is_empty()));
            prop_assert!(result.nodes[index].config.as_ref().is_none_or(|c| !c.contains_key(&key)));
        }
    }
}

//! Tests for the command language: parsing, applying and previewing.
mod common;
use common::*;
use fluxo::error::{CommandErrorKind, PreconditionError, SyntaxError};
use fluxo::interpreter::parser::parse_line;
use fluxo::interpreter::{Guard, Intent, LgpdText, NewNode, tokenize, Token};
use fluxo::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_tokenize_words_quotes_and_arrows() {
    let tokens = tokenize(r#"nó ask->end contém "preço, valor" "diz \"oi\"""#).unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Word("nó".to_string()),
            Token::Word("ask".to_string()),
            Token::Arrow,
            Token::Word("end".to_string()),
            Token::Word("contém".to_string()),
            Token::Quoted("preço, valor".to_string()),
            Token::Quoted("diz \"oi\"".to_string()),
        ]
    );
    assert_eq!(tokenize(r#"criar nó a prompt "aberto"#), Err(SyntaxError::UnterminatedQuote));
}

#[test]
fn test_quoted_text_keeps_plain_backslashes() {
    assert_eq!(
        tokenize(r#""C:\dados\novo""#).unwrap(),
        vec![Token::Quoted(r"C:\dados\novo".to_string())]
    );
    assert_eq!(
        tokenize(r#""a \\ b \" c""#).unwrap(),
        vec![Token::Quoted(r#"a \ b " c"#.to_string())]
    );
    assert_eq!(tokenize(r"“fim\”").unwrap_err(), SyntaxError::UnterminatedQuote);

    let def = create_starting_flow();
    let outcome = interpret(&def, r#"nó start prompt "C:\dados\novo""#).unwrap();
    assert_eq!(outcome.definition.nodes[0].prompt.as_deref(), Some(r"C:\dados\novo"));
}

#[test]
fn test_parse_each_statement_form() {
    let cases = vec![
        (
            r#"criar nó ask prompt "Qual seu nome?""#,
            Intent::CreateNode {
                id: "ask".to_string(),
                kind: NewNode::Message("Qual seu nome?".to_string()),
            },
        ),
        (
            r#"CRIAR NO ask MENSAGEM "Oi""#,
            Intent::CreateNode {
                id: "ask".to_string(),
                kind: NewNode::Message("Oi".to_string()),
            },
        ),
        (
            "criar nó fim fim",
            Intent::CreateNode {
                id: "fim".to_string(),
                kind: NewNode::End,
            },
        ),
        ("criar fluxo básico", Intent::BasicFlow),
        ("criar fluxo basico", Intent::BasicFlow),
        ("inserir lgpd", Intent::InsertLgpd(LgpdText::Short)),
        ("inserir lgpd completo", Intent::InsertLgpd(LgpdText::Full)),
        (
            r#"inserir lgpd "Aceita?""#,
            Intent::InsertLgpd(LgpdText::Custom("Aceita?".to_string())),
        ),
        ("start -> ask", Intent::SetStart("ask".to_string())),
        (
            "nó a -> b default",
            Intent::Connect {
                from: "a".to_string(),
                to: "b".to_string(),
                guard: Guard::Default,
            },
        ),
        (
            r#"no a -> b contem "preço, valor,  ,horário""#,
            Intent::Connect {
                from: "a".to_string(),
                to: "b".to_string(),
                guard: Guard::ContainsAny(vec![
                    "preço".to_string(),
                    "valor".to_string(),
                    "horário".to_string(),
                ]),
            },
        ),
        (
            "nó a -> b se sim",
            Intent::Connect {
                from: "a".to_string(),
                to: "b".to_string(),
                guard: Guard::YesNo(true),
            },
        ),
        (
            "nó a -> b se não",
            Intent::Connect {
                from: "a".to_string(),
                to: "b".to_string(),
                guard: Guard::YesNo(false),
            },
        ),
        (
            "nó a -> b agendar",
            Intent::Connect {
                from: "a".to_string(),
                to: "b".to_string(),
                guard: Guard::Schedule,
            },
        ),
        (
            "nó a tipo question",
            Intent::SetType {
                id: "a".to_string(),
                node_type: "question".to_string(),
            },
        ),
        (
            r#"nó a prompt "Novo texto""#,
            Intent::SetPrompt {
                id: "a".to_string(),
                prompt: "Novo texto".to_string(),
            },
        ),
        (
            "nó a handler crm_sync",
            Intent::SetHandler {
                id: "a".to_string(),
                handler: "crm_sync".to_string(),
            },
        ),
        (
            "renomear nó a para b",
            Intent::Rename {
                from: "a".to_string(),
                to: "b".to_string(),
            },
        ),
        ("remover nó a", Intent::Remove("a".to_string())),
    ];

    for (line, expected) in cases {
        assert_eq!(parse_line(line), Ok(expected), "line: {}", line);
    }
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        parse_line("voar nó a"),
        Err(SyntaxError::UnknownCommand("voar".to_string()))
    );
    assert_eq!(
        parse_line("criar nó a prompt"),
        Err(SyntaxError::UnexpectedEnd("quoted text".to_string()))
    );
    assert!(matches!(
        parse_line("nó a -> b talvez"),
        Err(SyntaxError::Unexpected { .. })
    ));
    assert!(matches!(
        parse_line("remover nó a b"),
        Err(SyntaxError::TrailingInput(_))
    ));
}

#[test]
fn test_end_to_end_script() {
    let def = create_starting_flow();
    let script = "criar nó end fim\ncriar nó ask prompt \"Qual seu nome?\"\nstart -> ask\nnó ask -> end default";

    let outcome = interpret(&def, script).expect("script should apply");

    let mut ids: Vec<&str> = outcome.definition.node_ids().collect();
    ids.sort();
    assert_eq!(ids, vec!["ask", "end", "start"]);
    assert_eq!(outcome.definition.start, "ask");

    let ask = outcome.definition.node("ask").unwrap();
    assert_eq!(ask.transitions.len(), 1);
    assert_eq!(ask.transitions[0], Transition::to("end"));
    assert_eq!(ask.prompt.as_deref(), Some("Qual seu nome?"));
    assert_eq!(ask.node_type, "static_message");
    assert_eq!(outcome.definition.node("end").unwrap().node_type, "end");

    assert_eq!(outcome.applied.len(), 4);
    assert_eq!(outcome.suggested_selected_node_id.as_deref(), Some("ask"));
}

#[test]
fn test_missing_target_rolls_back_everything() {
    let def = create_starting_flow();
    let snapshot = def.clone();
    let script = "criar nó ask prompt \"Qual seu nome?\"\nstart -> ask\nnó ask -> end default";

    let err = interpret(&def, script).unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(
        err.kind,
        CommandErrorKind::Precondition(PreconditionError::NodeNotFound("end".to_string()))
    );
    assert_eq!(def, snapshot);
}

#[test]
fn test_parse_error_reports_line_before_any_apply() {
    let def = create_starting_flow();
    let script = "criar nó a fim\n\n# comentário\nisso não é comando\ncriar nó a fim";
    let err = interpret(&def, script).unwrap_err();
    assert_eq!(err.line, 4);
    assert!(matches!(err.kind, CommandErrorKind::Syntax(_)));
    assert!(err.to_string().starts_with("line 4:"));
}

#[test]
fn test_duplicate_create_fails() {
    let err = interpret(&create_starting_flow(), "criar nó start fim").unwrap_err();
    assert_eq!(err.line, 1);
    assert_eq!(
        err.kind,
        CommandErrorKind::Precondition(PreconditionError::NodeExists("start".to_string()))
    );
}

#[test]
fn test_rename_rejects_existing_target() {
    let def = create_sample_flow();
    let err = interpret(&def, "renomear nó ask para done").unwrap_err();
    assert_eq!(
        err.kind,
        CommandErrorKind::Precondition(PreconditionError::NodeExists("done".to_string()))
    );

    let outcome = interpret(&def, "renomear nó ask para pergunta").unwrap();
    assert_eq!(targets_of(&outcome.definition, "welcome"), vec!["pergunta"]);
    assert_eq!(outcome.suggested_selected_node_id.as_deref(), Some("pergunta"));
}

#[test]
fn test_rename_to_same_id_is_rejected() {
    let def = create_sample_flow();
    let err = interpret(&def, "renomear nó ask para ask").unwrap_err();
    assert_eq!(err.line, 1);
    assert_eq!(
        err.kind,
        CommandErrorKind::Precondition(PreconditionError::NodeExists("ask".to_string()))
    );
}

#[test]
fn test_contains_guard_needs_a_keyword() {
    for keywords in [r#""""#, r#"" , ""#] {
        let line = format!("nó start -> b contém {keywords}");
        assert!(
            matches!(parse_line(&line), Err(SyntaxError::Unexpected { .. })),
            "line: {}",
            line
        );
    }

    let def = create_starting_flow();
    let script = "criar nó b fim\nnó start -> b contém \" , \"";
    let err = interpret(&def, script).unwrap_err();
    assert_eq!(err.line, 2);
    assert!(matches!(err.kind, CommandErrorKind::Syntax(SyntaxError::Unexpected { .. })));
}

#[test]
fn test_guards_produce_conditions() {
    let def = create_sample_flow();
    let script = "nó done -> welcome contém \"recomeçar, de novo\"\n\
                  nó done -> ask se sim\n\
                  nó done -> ask se não\n\
                  nó done -> welcome agendar";
    let outcome = interpret(&def, script).unwrap();
    let whens: Vec<_> = outcome
        .definition
        .node("done")
        .unwrap()
        .transitions
        .iter()
        .map(|t| t.when.clone().map(serde_json::Value::Object))
        .collect();
    assert_eq!(
        whens,
        vec![
            Some(json!({ "contains_any": ["recomeçar", "de novo"] })),
            Some(json!({ "yes_no": "yes" })),
            Some(json!({ "yes_no": "no" })),
            Some(json!({ "intent": "schedule" })),
        ]
    );
}

#[test]
fn test_node_patches() {
    let def = create_sample_flow();
    let script = "nó done tipo handoff\nnó done prompt \"Tchau\"\nnó done handler crm_sync";
    let outcome = interpret(&def, script).unwrap();
    let done = outcome.definition.node("done").unwrap();
    assert_eq!(done.node_type, "handoff");
    assert_eq!(done.prompt.as_deref(), Some("Tchau"));
    assert_eq!(done.handler.as_deref(), Some("crm_sync"));
}

#[test]
fn test_remove_via_command() {
    let def = create_sample_flow();
    let outcome = interpret(&def, "remover nó welcome").unwrap();
    assert_eq!(outcome.definition.start, "ask");
    assert_eq!(outcome.suggested_selected_node_id.as_deref(), Some("ask"));

    let err = interpret(&def, "remover nó ghost").unwrap_err();
    assert_eq!(
        err.kind,
        CommandErrorKind::Precondition(PreconditionError::NodeNotFound("ghost".to_string()))
    );
}

#[test]
fn test_insert_lgpd_short() {
    let def = create_starting_flow();
    let outcome = interpret(&def, "inserir lgpd curto").unwrap();
    let result = outcome.definition;

    assert_eq!(result.nodes.len(), def.nodes.len() + 1);
    assert_eq!(result.start, "lgpd");
    assert_eq!(result.nodes[0].id, "lgpd");

    let consent = result.node("lgpd").unwrap();
    assert_eq!(consent.transitions, vec![Transition::to("start")]);
    assert_eq!(
        consent.prompt.as_deref(),
        Some(InterpreterConfig::default().lgpd_short_text.as_str())
    );
    assert!(validate(&result).is_empty());
}

#[test]
fn test_insert_lgpd_twice_allocates_new_id() {
    let def = create_starting_flow();
    let outcome = interpret(&def, "inserir lgpd\ninserir lgpd \"Aceita os termos?\"").unwrap();
    let result = outcome.definition;
    assert_eq!(result.start, "lgpd_2");
    assert_eq!(targets_of(&result, "lgpd_2"), vec!["lgpd"]);
    assert_eq!(targets_of(&result, "lgpd"), vec!["start"]);
    assert_eq!(
        result.node("lgpd_2").unwrap().prompt.as_deref(),
        Some("Aceita os termos?")
    );
}

#[test]
fn test_basic_flow_template() {
    let outcome = interpret(&Definition::empty(), "criar fluxo básico").unwrap();
    let result = outcome.definition;
    assert_eq!(result.nodes.len(), 5);
    assert_eq!(result.start, "boas_vindas");
    assert!(validate(&result).is_empty());

    let err = interpret(&result, "criar fluxo básico").unwrap_err();
    assert_eq!(
        err.kind,
        CommandErrorKind::Precondition(PreconditionError::TemplateCollision(
            "boas_vindas".to_string()
        ))
    );
}

#[test]
fn test_builder_configures_node_types() {
    let interpreter = Interpreter::builder()
        .with_message_type("text")
        .with_end_type("finish")
        .with_schedule_intent("booking")
        .with_lgpd_texts("curto!", "completo!")
        .build();
    let outcome = interpreter
        .interpret(
            &create_starting_flow(),
            "criar nó a prompt \"oi\"\ncriar nó b fim\nnó a -> b agendar\ninserir lgpd completo",
        )
        .unwrap();
    let def = outcome.definition;
    assert_eq!(def.node("a").unwrap().node_type, "text");
    assert_eq!(def.node("b").unwrap().node_type, "finish");
    assert_eq!(
        def.node("a").unwrap().transitions[0].when,
        json!({ "intent": "booking" }).as_object().cloned()
    );
    assert_eq!(def.node("lgpd").unwrap().prompt.as_deref(), Some("completo!"));
}

#[test]
fn test_config_from_json_keeps_defaults() {
    let config = InterpreterConfig::from_json_str(r#"{ "end_type": "finish" }"#).unwrap();
    assert_eq!(config.end_type, "finish");
    assert_eq!(config.message_type, "static_message");
    assert!(InterpreterConfig::from_json_str("[").is_err());
}

#[test]
fn test_preview_stops_at_first_failure() {
    let def = create_starting_flow();
    let script = "criar nó ask prompt \"Nome?\"\nnó ask -> end default\ncriar nó end fim";
    let lines = preview(&def, script);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].is_ok());
    assert_eq!(lines[0].line, 1);
    assert!(lines[0].description.contains("'ask'"));
    assert_eq!(lines[1].line, 2);
    assert!(lines[1].error.as_deref().unwrap().contains("'end'"));
}

#[test]
fn test_preview_reports_parse_errors_with_raw_text() {
    let def = create_starting_flow();
    let lines = preview(&def, "criar nó a fim\n  bla bla  ");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].description, "bla bla");
    assert!(lines[1].error.is_some());
}

#[test]
fn test_preview_of_valid_script_matches_apply() {
    let def = create_starting_flow();
    let script = "criar nó end fim\ncriar nó ask prompt \"Qual seu nome?\"\nstart -> ask\nnó ask -> end default";
    let lines = preview(&def, script);
    let outcome = interpret(&def, script).unwrap();
    assert!(lines.iter().all(|l| l.is_ok()));
    assert_eq!(
        lines.into_iter().map(|l| l.description).collect::<Vec<_>>(),
        outcome.applied
    );
}

#[test]
fn test_empty_script_is_a_noop() {
    let def = create_sample_flow();
    let outcome = interpret(&def, "\n   \n# nada\n// nada").unwrap();
    assert_eq!(outcome.definition, def);
    assert!(outcome.applied.is_empty());
    assert_eq!(outcome.suggested_selected_node_id, None);
}

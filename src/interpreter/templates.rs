//! The fixed starter flow expanded by `criar fluxo básico`.

use crate::config::InterpreterConfig;
use crate::model::{Node, ObjectMap, Transition, condition};
use serde_json::Value;

/// Ids of the starter nodes, entry node first.
pub const STARTER_NODE_IDS: [&str; 5] = ["boas_vindas", "nome", "interesse", "contato", "fim"];

fn save_as(key: &str) -> ObjectMap {
    let mut config = ObjectMap::new();
    config.insert("save_as".to_string(), Value::String(key.to_string()));
    config
}

/// Greeting, name capture, a yes/no branch, phone capture and a closing node.
pub fn starter_nodes(config: &InterpreterConfig) -> Vec<Node> {
    let [welcome, name, interest, contact, end] = STARTER_NODE_IDS;
    vec![
        Node::new(welcome, config.message_type.clone())
            .with_prompt("Olá! Que bom ter você por aqui.")
            .with_transition(Transition::to(name)),
        Node {
            config: Some(save_as("nome")),
            ..Node::new(name, config.question_type.clone())
                .with_prompt("Para começar, qual é o seu nome?")
                .with_transition(Transition::to(interest))
        },
        Node::new(interest, config.question_type.clone())
            .with_prompt("Você gostaria de falar com um especialista?")
            .with_transition(Transition::to(contact).when(condition::yes_no(true)))
            .with_transition(Transition::to(end).when(condition::yes_no(false))),
        Node {
            config: Some(save_as("telefone")),
            ..Node::new(contact, config.question_type.clone())
                .with_prompt("Qual o melhor telefone para contato?")
                .with_transition(Transition::to(end))
        },
        Node::new(end, config.end_type.clone())
            .with_prompt("Obrigado! Em breve entraremos em contato."),
    ]
}

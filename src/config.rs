use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fs;

/// Settings for the command interpreter: the node types it writes and the
/// preset texts its macros expand to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Type given to nodes created with `prompt`/`mensagem` and to the consent node.
    pub message_type: String,
    /// Type given to nodes created with `fim`.
    pub end_type: String,
    /// Type used by the starter template for nodes that wait for an answer.
    pub question_type: String,
    /// Value written to `when.intent` by `agendar`.
    pub schedule_intent: String,
    /// Id hint for the node created by `inserir lgpd`.
    pub lgpd_node_id: String,
    pub lgpd_short_text: String,
    pub lgpd_full_text: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            message_type: "static_message".to_string(),
            end_type: "end".to_string(),
            question_type: "question".to_string(),
            schedule_intent: "schedule".to_string(),
            lgpd_node_id: "lgpd".to_string(),
            lgpd_short_text: "Ao continuar, você concorda com o uso dos seus dados para este \
                              atendimento, conforme a LGPD."
                .to_string(),
            lgpd_full_text: "Antes de começarmos: seus dados pessoais (como nome e telefone) \
                             serão usados apenas para este atendimento e para entrarmos em \
                             contato com você, conforme a Lei Geral de Proteção de Dados \
                             (Lei 13.709/2018). Você pode pedir a exclusão dos seus dados a \
                             qualquer momento. Ao continuar, você concorda com esses termos."
                .to_string(),
        }
    }
}

impl InterpreterConfig {
    /// Parses a JSON object; missing keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::InvalidJson(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }
}

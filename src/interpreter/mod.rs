//! The line-oriented command language.
//!
//! Interpretation runs in two explicit phases:
//!
//! 1. **Parse**: every line is tokenized and parsed into an [`Intent`]. The first
//!    unparsable line fails the whole call; the definition is not touched.
//! 2. **Fold**: intents are applied in order through the mutation catalog. The
//!    first intent whose preconditions fail aborts the fold and the partially
//!    edited value is dropped, so a caller only ever sees the fully edited
//!    definition or an error.
//!
//! [`Interpreter::preview`] runs the same phases but reports each step up to
//! and including the first failure, for live feedback while text is typed.
//!
//! ```text
//! criar nó fim fim
//! criar nó ask prompt "Qual seu nome?"
//! start -> ask
//! nó ask -> fim default
//! ```

use crate::config::InterpreterConfig;
use crate::error::CommandError;
use crate::model::{Definition, NodeId};
use crate::normalizer::canonicalize;
use serde::Serialize;
use tracing::debug;

mod intent;
mod lexer;
pub mod parser;
pub mod templates;

pub use intent::{Applied, Guard, Intent, LgpdText, NewNode};
pub use lexer::{Token, tokenize};

/// A successful interpretation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub definition: Definition,
    /// One description per applied command, in order.
    pub applied: Vec<String>,
    /// The node an editor should select afterwards, when one stands out.
    pub suggested_selected_node_id: Option<NodeId>,
}

/// One step of a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewLine {
    /// 1-based line number in the submitted text.
    pub line: usize,
    /// What the line would do, or the raw line text when it does not parse.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreviewLine {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs command text against definitions.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

pub struct InterpreterBuilder {
    config: InterpreterConfig,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            config: InterpreterConfig::default(),
        }
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_message_type(mut self, node_type: &str) -> Self {
        self.config.message_type = node_type.to_string();
        self
    }

    pub fn with_end_type(mut self, node_type: &str) -> Self {
        self.config.end_type = node_type.to_string();
        self
    }

    pub fn with_schedule_intent(mut self, intent: &str) -> Self {
        self.config.schedule_intent = intent.to_string();
        self
    }

    pub fn with_lgpd_texts(mut self, short: &str, full: &str) -> Self {
        self.config.lgpd_short_text = short.to_string();
        self.config.lgpd_full_text = full.to_string();
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            config: self.config,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Parses the whole text into intents, failing on the first bad line.
    pub fn parse(&self, text: &str) -> Result<Vec<(usize, Intent)>, CommandError> {
        parser::parse_lines(text)
            .map(|(line, parsed)| {
                parsed
                    .map(|intent| (line, intent))
                    .map_err(|e| CommandError::new(line, e))
            })
            .collect()
    }

    /// Applies `text` to `def`, all or nothing.
    pub fn interpret(&self, def: &Definition, text: &str) -> Result<Interpretation, CommandError> {
        let intents = self.parse(text).inspect_err(|e| debug!(%e, "interpret: parse failed"))?;
        debug!(count = intents.len(), "interpret: parsed");

        let mut current = canonicalize(def.clone());
        let mut applied = Vec::with_capacity(intents.len());
        let mut focus = None;

        for (line, intent) in &intents {
            let step = intent
                .apply(&current, &self.config)
                .map_err(|e| CommandError::new(*line, e))
                .inspect_err(|e| debug!(%e, "interpret: apply failed"))?;
            applied.push(intent.describe(&self.config));
            current = step.definition;
            if step.focus.is_some() {
                focus = step.focus;
            }
        }

        let suggested_selected_node_id = focus.filter(|id| current.contains_node(id));
        Ok(Interpretation {
            definition: current,
            applied,
            suggested_selected_node_id,
        })
    }

    /// Describes each command up to and including the first failing one.
    ///
    /// Unlike [`Interpreter::interpret`] this never fails as a whole: a bad
    /// line ends the preview with an error entry.
    pub fn preview(&self, def: &Definition, text: &str) -> Vec<PreviewLine> {
        let mut current = canonicalize(def.clone());
        let mut lines = Vec::new();

        for (line, parsed) in parser::parse_lines(text) {
            let raw = text.lines().nth(line - 1).unwrap_or_default().trim().to_string();
            let intent = match parsed {
                Ok(intent) => intent,
                Err(e) => {
                    lines.push(PreviewLine {
                        line,
                        description: raw,
                        error: Some(CommandError::new(line, e).to_string()),
                    });
                    break;
                }
            };
            let description = intent.describe(&self.config);
            match intent.apply(&current, &self.config) {
                Ok(step) => {
                    current = step.definition;
                    lines.push(PreviewLine {
                        line,
                        description,
                        error: None,
                    });
                }
                Err(e) => {
                    lines.push(PreviewLine {
                        line,
                        description,
                        error: Some(CommandError::new(line, e).to_string()),
                    });
                    break;
                }
            }
        }

        lines
    }
}

/// [`Interpreter::interpret`] with the default configuration.
pub fn interpret(def: &Definition, text: &str) -> Result<Interpretation, CommandError> {
    Interpreter::default().interpret(def, text)
}

/// [`Interpreter::preview`] with the default configuration.
pub fn preview(def: &Definition, text: &str) -> Vec<PreviewLine> {
    Interpreter::default().preview(def, text)
}

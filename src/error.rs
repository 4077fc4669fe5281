use thiserror::Error;

/// Errors that can occur while reading a definition or a script from outside the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("could not read '{path}': {message}")]
    Io { path: String, message: String },
}

/// A structural problem found by the validator. `Display` is the message handed to the UI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("the flow needs at least one node")]
    NoNodes,

    #[error("node #{index} has an empty id")]
    EmptyNodeId { index: usize },

    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),

    #[error("start is empty")]
    EmptyStart,

    #[error("start points to '{0}', which does not exist")]
    UnknownStart(String),

    #[error("node '{node_id}': transition #{index} has an empty target")]
    EmptyTarget { node_id: String, index: usize },

    #[error("node '{node_id}': transition #{index} points to '{target}', which does not exist")]
    UnknownTarget {
        node_id: String,
        index: usize,
        target: String,
    },
}

/// Why a single command line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },

    #[error("expected {0}, found end of line")]
    UnexpectedEnd(String),

    #[error("unterminated quoted text")]
    UnterminatedQuote,

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

/// Why a parsed command could not be applied to the current definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("node '{0}' already exists")]
    NodeExists(String),

    #[error("node '{0}' does not exist")]
    NodeNotFound(String),

    #[error("template node '{0}' already exists")]
    TemplateCollision(String),
}

/// The single, first-error-wins failure reported by the command interpreter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct CommandError {
    /// 1-based line number within the submitted text.
    pub line: usize,
    pub kind: CommandErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandErrorKind {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

impl CommandError {
    pub fn new(line: usize, kind: impl Into<CommandErrorKind>) -> Self {
        Self {
            line,
            kind: kind.into(),
        }
    }
}

/// Failures reported by the external flow-storage collaborator. Opaque by contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("flow '{0}' not found")]
    NotFound(String),

    #[error("flow '{id}' has no version {version}")]
    VersionNotFound { id: String, version: u32 },

    #[error("template '{0}' not found")]
    TemplateNotFound(String),

    #[error("definition rejected: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("{0}")]
    Remote(String),
}

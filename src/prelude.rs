//! Prelude module for convenient imports
//!
//! Re-exports the types and functions an editor host needs most often.
//!
//! # Example
//!
//! ```rust,no_run
//! use fluxo::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let text = std::fs::read_to_string("path/to/flow.json")?;
//! let def = Definition::from_json_str(&text)?;
//!
//! let (def, id) = add_node(&def, "pergunta", "question");
//! let def = set_start(&def, &id);
//! assert!(validate(&def).is_empty());
//! # Ok(())
//! # }
//! ```

// Model
pub use crate::model::{
    Definition, KanbanStage, LeadKanban, LeadSummary, LeadSummaryField, Node, NodeId, ObjectMap,
    SourceOption, Transition,
};

// Normalization and validation
pub use crate::normalizer::{canonicalize, normalize};
pub use crate::validator::{issues, prepare_for_publish, validate};

// Mutation catalog
pub use crate::mutation::{
    Direction, NodePatch, TransitionPatch, add_lead_field, add_lead_kanban_stage, add_node,
    add_source_option, add_transition, insert_node, move_lead_field, move_lead_kanban_stage,
    move_source_option, patch_node, patch_transition, push_transition, remove_lead_field,
    remove_lead_kanban_stage, remove_node, remove_source_option, remove_transition, rename_node,
    selection_after_removal, set_node_config_value, set_start, set_transition_condition,
    try_rename_node, update_lead_field, update_lead_kanban_stage, update_source_option,
};

// Command interpreter
pub use crate::config::InterpreterConfig;
pub use crate::interpreter::{Interpretation, Interpreter, PreviewLine, interpret, preview};

// Collaborator contract
pub use crate::store::{FlowRecord, FlowStore, MemoryFlowStore, publish_checked};

// Error types
pub use crate::error::{CommandError, LoadError, StoreError, ValidationIssue};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

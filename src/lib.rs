//! # Fluxo - Chatbot Flow Definition Engine
//!
//! **Fluxo** canonicalizes, validates and edits "chatbot flow" definitions: directed
//! graphs of conversation steps consumed by an external runtime. It does not run
//! flows and performs no I/O; every operation is a pure function from a
//! definition (plus arguments) to a new definition or an error value.
//!
//! ## Core Workflow
//!
//! 1.  **Normalize**: read untrusted JSON with [`normalizer::normalize`] (or
//!     [`model::Definition::from_json_str`]). This never fails on shape; it falls
//!     back to defaults and drops what it cannot use.
//! 2.  **Validate**: [`validator::validate`] lists structural problems (missing
//!     start, dangling targets, duplicate ids). An empty list means valid.
//! 3.  **Edit**: apply operations from the [`mutation`] catalog, or run operator
//!     text through the [`interpreter`], which compiles a small line-oriented
//!     command language into sequences of those operations.
//! 4.  **Publish**: [`validator::prepare_for_publish`] re-normalizes and
//!     re-validates before a definition is handed to a [`store::FlowStore`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fluxo::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let def = Definition::from_json_str(
//!         r#"{"version": 1, "start": "start", "nodes": [{"id": "start", "type": "static_message"}]}"#,
//!     )?;
//!
//!     let script = "criar nó end fim\n\
//!                   criar nó ask prompt \"Qual seu nome?\"\n\
//!                   start -> ask\n\
//!                   nó ask -> end default";
//!
//!     let outcome = interpret(&def, script)?;
//!     for step in &outcome.applied {
//!         println!("-> {}", step);
//!     }
//!
//!     let problems = validate(&outcome.definition);
//!     println!("{} problem(s)", problems.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod interpreter;
pub mod model;
pub mod mutation;
pub mod normalizer;
pub mod prelude;
pub mod store;
pub mod validator;

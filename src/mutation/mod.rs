//! The catalog of pure structural edits.
//!
//! Every operation takes a borrowed [`Definition`], canonicalizes a private copy,
//! edits it and returns the canonical result. Inputs are never mutated and no
//! nested list is shared between the old and new values. Out-of-range indices
//! are no-ops that return the canonicalized input.

use crate::model::Definition;
use crate::normalizer::canonicalize;

pub mod keyed;
pub mod lead;
pub mod node;
pub mod transition;

pub use keyed::{Direction, KeyedList};
pub use lead::*;
pub use node::*;
pub use transition::*;

/// Canonical private copy of the input, the starting point of every edit.
fn begin(def: &Definition) -> Definition {
    canonicalize(def.clone())
}

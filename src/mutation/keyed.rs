//! Copy-on-write editing of the keyed lists hanging off a definition
//! (lead summary fields, source options and kanban stages).

use super::begin;
use crate::model::Definition;
use crate::normalizer::canonicalize;
use tracing::trace;

/// Direction of a [`move_entry`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// One keyed list stored inside a [`Definition`].
pub trait KeyedList {
    type Entry: Clone;

    /// Current entries, or an empty slice when the owning section is absent.
    fn entries(def: &Definition) -> &[Self::Entry];

    /// Replaces the list, creating the owning section if needed.
    fn store(def: &mut Definition, entries: Vec<Self::Entry>);

    /// A new entry with a freshly allocated key.
    fn fresh(def: &Definition) -> Self::Entry;
}

/// Replaces entry `index` with `entry`.
pub fn update_entry<L: KeyedList>(def: &Definition, index: usize, entry: L::Entry) -> Definition {
    let mut next = begin(def);
    let mut entries = L::entries(&next).to_vec();
    let Some(slot) = entries.get_mut(index) else {
        trace!(index, "update_entry: index out of range");
        return next;
    };
    *slot = entry;
    L::store(&mut next, entries);
    canonicalize(next)
}

/// Appends a new entry with a freshly allocated key.
pub fn add_entry<L: KeyedList>(def: &Definition) -> Definition {
    let mut next = begin(def);
    let mut entries = L::entries(&next).to_vec();
    entries.push(L::fresh(&next));
    L::store(&mut next, entries);
    canonicalize(next)
}

pub fn remove_entry<L: KeyedList>(def: &Definition, index: usize) -> Definition {
    let mut next = begin(def);
    let mut entries = L::entries(&next).to_vec();
    if index >= entries.len() {
        trace!(index, "remove_entry: index out of range");
        return next;
    }
    entries.remove(index);
    L::store(&mut next, entries);
    canonicalize(next)
}

/// Swaps entry `index` with `index + offset`; a no-op if either falls outside the list.
pub fn move_entry<L: KeyedList>(def: &Definition, index: usize, offset: isize) -> Definition {
    let mut next = begin(def);
    let entries = L::entries(&next);
    match swapped(entries, index, offset) {
        Some(entries) => {
            L::store(&mut next, entries);
            canonicalize(next)
        }
        None => next,
    }
}

/// The list with `index` and `index + offset` swapped, or `None` when either
/// position is out of `[0, len)`.
pub fn swapped<T: Clone>(list: &[T], index: usize, offset: isize) -> Option<Vec<T>> {
    let target = index.checked_add_signed(offset)?;
    if index >= list.len() || target >= list.len() {
        return None;
    }
    let mut out = list.to_vec();
    out.swap(index, target);
    Some(out)
}

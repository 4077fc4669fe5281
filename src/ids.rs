//! Collision-free identifiers for new nodes and keyed list entries.

use crate::model::Definition;
use ahash::AHashSet;

/// Base used when a hint sanitizes to nothing.
const DEFAULT_BASE: &str = "node";

/// Reduces a free-form hint to `[a-z0-9_]`, collapsing runs of separators.
pub fn sanitize(hint: &str) -> String {
    let mut out = String::with_capacity(hint.len());
    for c in hint.trim().chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Returns `base` if free, else the first free `base_2`, `base_3`, ...
pub fn allocate<'a, I>(base: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: AHashSet<&str> = taken.into_iter().collect();
    let base = match sanitize(base) {
        s if s.is_empty() => DEFAULT_BASE.to_string(),
        s => s,
    };
    if !taken.contains(base.as_str()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

/// A node id derived from `hint` that no node in `def` uses yet.
pub fn node_id(def: &Definition, hint: &str) -> String {
    allocate(hint, def.node_ids())
}

/// The first `prefix_N` (N from 1) absent from `taken`. Used for keyed list entries.
pub fn sequential_key<'a, I>(prefix: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: AHashSet<&str> = taken.into_iter().collect();
    let mut n = 1;
    loop {
        let candidate = format!("{prefix}_{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

/// The first node id in `def` not present in `used`, or the fallback start id.
pub fn first_unused_node_id<'a, I>(def: &Definition, used: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let used: AHashSet<&str> = used.into_iter().collect();
    def.node_ids()
        .find(|id| !used.contains(id))
        .unwrap_or(crate::normalizer::FALLBACK_START)
        .to_string()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

pub(crate) fn fold_accents(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

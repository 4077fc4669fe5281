use crate::error::ValidationIssue;
use crate::model::Definition;
use ahash::AHashSet;

/// Returns every structural error in `def` as a display string. Empty means valid.
pub fn validate(def: &Definition) -> Vec<String> {
    issues(def).iter().map(ToString::to_string).collect()
}

/// Typed form of [`validate`].
///
/// An empty graph short-circuits with [`ValidationIssue::NoNodes`]; otherwise all
/// checks run and every finding is collected. Node ids are indexed once, so the
/// pass is linear in nodes plus transitions.
pub fn issues(def: &Definition) -> Vec<ValidationIssue> {
    if def.nodes.is_empty() {
        return vec![ValidationIssue::NoNodes];
    }

    let mut found = Vec::new();
    let mut ids: AHashSet<&str> = AHashSet::with_capacity(def.nodes.len());
    let mut reported_duplicates: AHashSet<&str> = AHashSet::new();

    for (index, node) in def.nodes.iter().enumerate() {
        if node.id.is_empty() {
            found.push(ValidationIssue::EmptyNodeId { index });
            continue;
        }
        if !ids.insert(node.id.as_str()) && reported_duplicates.insert(node.id.as_str()) {
            found.push(ValidationIssue::DuplicateNodeId(node.id.clone()));
        }
    }

    if def.start.is_empty() {
        found.push(ValidationIssue::EmptyStart);
    } else if !ids.contains(def.start.as_str()) {
        found.push(ValidationIssue::UnknownStart(def.start.clone()));
    }

    for node in &def.nodes {
        for (index, transition) in node.transitions.iter().enumerate() {
            if transition.to.is_empty() {
                found.push(ValidationIssue::EmptyTarget {
                    node_id: node.id.clone(),
                    index,
                });
            } else if !ids.contains(transition.to.as_str()) {
                found.push(ValidationIssue::UnknownTarget {
                    node_id: node.id.clone(),
                    index,
                    target: transition.to.clone(),
                });
            }
        }
    }

    found
}

/// Re-normalizes and re-validates a definition before it leaves the engine.
///
/// This is the gate applied before a definition is handed to the storage
/// collaborator: the canonical value on success, the issue list otherwise.
pub fn prepare_for_publish(def: &Definition) -> Result<Definition, Vec<String>> {
    let canonical = crate::normalizer::canonicalize(def.clone());
    let problems = validate(&canonical);
    if problems.is_empty() {
        Ok(canonical)
    } else {
        Err(problems)
    }
}

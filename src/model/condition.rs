//! Constructors for the condition objects the command language emits.
//!
//! Conditions are open JSON objects; these helpers only cover the tags the
//! interpreter knows how to write. Anything else passes through untouched.

use super::definition::ObjectMap;
use serde_json::Value;

pub const CONTAINS_ANY: &str = "contains_any";
pub const YES_NO: &str = "yes_no";
pub const INTENT: &str = "intent";

/// `{contains_any: [..]}`. Words are trimmed and blanks dropped.
pub fn contains_any<I, S>(words: I) -> ObjectMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let words: Vec<Value> = words
        .into_iter()
        .map(|w| w.as_ref().trim().to_string())
        .filter(|w| !w.is_empty())
        .map(Value::String)
        .collect();
    let mut map = ObjectMap::new();
    map.insert(CONTAINS_ANY.to_string(), Value::Array(words));
    map
}

/// `{yes_no: "yes"}` or `{yes_no: "no"}`.
pub fn yes_no(yes: bool) -> ObjectMap {
    let mut map = ObjectMap::new();
    let answer = if yes { "yes" } else { "no" };
    map.insert(YES_NO.to_string(), Value::String(answer.to_string()));
    map
}

/// `{intent: "<tag>"}`, used for action-tagged edges such as scheduling.
pub fn intent(tag: &str) -> ObjectMap {
    let mut map = ObjectMap::new();
    map.insert(INTENT.to_string(), Value::String(tag.to_string()));
    map
}

/// Drops entries that carry no information (`null`, `""`, `[]`, `{}`).
pub fn prune(condition: &ObjectMap) -> ObjectMap {
    condition
        .iter()
        .filter(|(_, v)| !is_blank(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// True for the JSON values a config or condition entry treats as "unset".
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

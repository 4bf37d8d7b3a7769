//! Merge semantics for loaded configuration documents.
//!
//! Merging is a shallow dictionary update: a later file's top-level key
//! replaces an earlier file's value wholesale, whatever the types involved.
//! The one exception is the reserved `env` overlay, which is pulled out of
//! each document and routed to an environment sink instead of the mapping.

use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::path::Path;

/// Reserved top-level key routed to the environment sink.
pub const OVERLAY_KEY: &str = "env";

/// Human-readable kind of a value, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Pop the overlay out of a parsed document.
///
/// Returns `None` when the document has no overlay. A present overlay that is
/// not a mapping is a malformed file and fails loudly rather than being
/// dropped.
pub fn extract_overlay(
    doc: &mut Map<String, Value>,
    file: &Path,
) -> ConfigResult<Option<Map<String, Value>>> {
    match doc.remove(OVERLAY_KEY) {
        None => Ok(None),
        Some(Value::Object(overlay)) => Ok(Some(overlay)),
        Some(other) => Err(ConfigError::OverlayType {
            key: OVERLAY_KEY,
            file: file.to_path_buf(),
            found: value_kind(&other),
        }),
    }
}

/// Shallow-merge `doc` into `target`, later values winning per key.
pub fn shallow_merge(target: &mut Map<String, Value>, doc: Map<String, Value>) {
    for (key, value) in doc {
        target.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a mapping, got {other:?}"),
        }
    }

    #[test]
    fn later_key_wins_others_accumulate() {
        let mut target = mapping(json!({"foo": 1, "bar": true}));
        shallow_merge(&mut target, mapping(json!({"foo": 0})));
        assert_eq!(Value::Object(target), json!({"foo": 0, "bar": true}));
    }

    #[test]
    fn merge_is_shallow_not_deep() {
        let mut target = mapping(json!({"nested": {"a": 1, "b": 2}}));
        shallow_merge(&mut target, mapping(json!({"nested": {"a": 3}})));
        // The whole nested mapping is replaced, "b" does not survive.
        assert_eq!(Value::Object(target), json!({"nested": {"a": 3}}));
    }

    #[test]
    fn mixed_type_collision_is_last_write_wins() {
        let mut target = mapping(json!({"foo": [1, 2, 3]}));
        shallow_merge(&mut target, mapping(json!({"foo": "scalar"})));
        assert_eq!(Value::Object(target), json!({"foo": "scalar"}));

        let mut target = mapping(json!({"foo": "scalar"}));
        shallow_merge(&mut target, mapping(json!({"foo": {"now": "a mapping"}})));
        assert_eq!(Value::Object(target), json!({"foo": {"now": "a mapping"}}));
    }

    #[test]
    fn merge_idempotence() {
        let doc = mapping(json!({"foo": 1, "bar": [true, false]}));
        let mut once = Map::new();
        shallow_merge(&mut once, doc.clone());
        let mut twice = once.clone();
        shallow_merge(&mut twice, doc);
        assert_eq!(once, twice);
    }

    #[test]
    fn overlay_is_removed_from_document() {
        let mut doc = mapping(json!({"env": {"a": 1}, "foo": 1}));
        let overlay = extract_overlay(&mut doc, Path::new("agent.yml"))
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(overlay), json!({"a": 1}));
        assert_eq!(Value::Object(doc), json!({"foo": 1}));
    }

    #[test]
    fn absent_overlay_is_none() {
        let mut doc = mapping(json!({"foo": 1}));
        assert!(
            extract_overlay(&mut doc, Path::new("agent.yml"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn non_mapping_overlay_is_fatal() {
        let mut doc = mapping(json!({"env": [1, 2]}));
        let err = extract_overlay(&mut doc, Path::new("agent.yml")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OverlayType {
                found: "a sequence",
                ..
            }
        ));
    }
}

//! Document accessor for profile records
//!
//! Records are arbitrarily nested JSON mappings. Fields are addressed with
//! dot-delimited [`FieldPath`]s (`values.priority_framework`). All accessors are
//! total: reading a path that does not resolve yields `None`, and writing a path
//! creates whatever intermediate mappings it needs. Nothing here performs I/O.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One profile document
pub type Record = Value;

/// Sentinel some authoring passes used for "no data"
const NOT_AVAILABLE: &str = "n/a";

/// Shortest string (in non-whitespace characters) that counts as populated
const MIN_POPULATED_CHARS: usize = 3;

/// Dot-delimited address of a field inside a [`Record`]
///
/// Parsing rejects empty paths and empty segments (`a..b`, `.a`, `a.`), so every
/// `FieldPath` has at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    /// Parse and validate a dot-delimited path
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("field path is empty".to_string()));
        }
        if trimmed.split('.').any(str::is_empty) {
            return Err(Error::InvalidInput(format!(
                "field path '{}' has an empty segment",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Path segments, root first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extend this path by one key
    pub fn child(&self, key: &str) -> Result<Self> {
        Self::parse(&format!("{}.{}", self.0, key))
    }

    /// Wrap a path written into a rule table without checking it
    ///
    /// Table paths are re-checked with [`FieldPath::parse`] when the owning field
    /// spec is built.
    pub(crate) fn literal(raw: &str) -> Self {
        Self(raw.to_string())
    }

    /// Build a path from keys already known to be non-empty (record traversal)
    fn from_keys(prefix: Option<&FieldPath>, key: &str) -> Self {
        match prefix {
            Some(parent) => Self(format!("{}.{}", parent.0, key)),
            None => Self(key.to_string()),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

/// Resolve `path` through nested mappings
///
/// Returns `None` when any segment is missing or an intermediate value is not a
/// mapping. An explicit JSON `null` leaf is returned as `Some(&Value::Null)`; use
/// [`is_empty`] to treat both the same way.
pub fn get<'a>(record: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .try_fold(record, |current, key| current.as_object()?.get(key))
}

/// Write `value` at `path`, creating intermediate mappings as needed
///
/// The leaf is overwritten unconditionally. An intermediate value that is not a
/// mapping (including a non-mapping root) is replaced by an empty mapping.
pub fn set(record: &mut Value, path: &FieldPath, value: Value) {
    let segments: Vec<&str> = path.segments().collect();
    set_in(record, &segments, value);
}

fn set_in(current: &mut Value, segments: &[&str], value: Value) {
    let Some((key, rest)) = segments.split_first() else {
        *current = value;
        return;
    };

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }

    if let Value::Object(map) = current {
        let slot = map.entry((*key).to_string()).or_insert(Value::Null);
        set_in(slot, rest, value);
    }
}

/// Delete the leaf at `path`, returning the removed value
///
/// Sibling keys keep their relative order.
pub fn remove(record: &mut Value, path: &FieldPath) -> Option<Value> {
    let segments: Vec<&str> = path.segments().collect();
    let (leaf, parents) = segments.split_last()?;

    let mut current = record;
    for key in parents {
        current = current.as_object_mut()?.get_mut(*key)?;
    }
    current.as_object_mut()?.shift_remove(*leaf)
}

/// Emptiness predicate shared by inference and coverage analysis
///
/// Empty means: absent or `null`, an empty sequence or mapping, a blank string,
/// the `N/A` sentinel (any case), or a string with fewer than three non-whitespace
/// characters. Numbers and booleans are always populated.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => is_blank_text(text),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Number(_)) | Some(Value::Bool(_)) => false,
    }
}

/// Shorthand for `is_empty(get(record, path))`
pub fn is_field_empty(record: &Value, path: &FieldPath) -> bool {
    is_empty(get(record, path))
}

fn is_blank_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return true;
    }
    trimmed.chars().filter(|c| !c.is_whitespace()).count() < MIN_POPULATED_CHARS
}

/// Every non-mapping leaf in the record, depth-first in key encounter order
///
/// Nested mappings are descended into and never reported themselves; an empty
/// mapping contributes nothing. Keys that are empty strings cannot be addressed by
/// a [`FieldPath`] and are skipped.
pub fn leaf_paths(record: &Value) -> Vec<(FieldPath, &Value)> {
    let mut leaves = Vec::new();
    if let Value::Object(map) = record {
        collect_leaves(map, None, &mut leaves);
    }
    leaves
}

fn collect_leaves<'a>(
    map: &'a Map<String, Value>,
    prefix: Option<&FieldPath>,
    leaves: &mut Vec<(FieldPath, &'a Value)>,
) {
    for (key, value) in map {
        if key.is_empty() {
            continue;
        }
        let path = FieldPath::from_keys(prefix, key);
        match value {
            Value::Object(child) => collect_leaves(child, Some(&path), leaves),
            leaf => leaves.push((path, leaf)),
        }
    }
}

/// Display label for a record: its `name` attribute, else the given fallback
pub fn display_name<'a>(record: &'a Value, fallback: &'a str) -> &'a str {
    record
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    #[test]
    fn test_field_path_rejects_empty_segments() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("   ").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse(".a").is_err());
        assert!(FieldPath::parse("a.").is_err());
        assert_eq!(path(" values.core_values ").as_str(), "values.core_values");
    }

    #[test]
    fn test_field_path_parts() {
        let p = path("trait_constellations.constellation_details.name");
        assert_eq!(p.depth(), 3);
        assert_eq!(path("values").child("core_values").unwrap(), path("values.core_values"));
    }

    #[test]
    fn test_field_path_serde_roundtrip_as_string() {
        let p = path("learning.failure_response");
        let encoded = serde_json::to_string(&p).unwrap();
        assert_eq!(encoded, "\"learning.failure_response\"");
        let decoded: FieldPath = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, p);
        assert!(serde_json::from_str::<FieldPath>("\"a..b\"").is_err());
    }

    #[test]
    fn test_get_resolves_nested_paths() {
        let record = json!({
            "name": "Ada",
            "values": { "core_values": ["rigor", "curiosity"] }
        });

        assert_eq!(get(&record, &path("name")), Some(&json!("Ada")));
        assert_eq!(
            get(&record, &path("values.core_values")),
            Some(&json!(["rigor", "curiosity"]))
        );
    }

    #[test]
    fn test_get_missing_or_non_mapping_intermediate_is_none() {
        let record = json!({ "name": "Ada", "values": ["not", "a", "map"] });

        assert_eq!(get(&record, &path("missing")), None);
        assert_eq!(get(&record, &path("values.core_values")), None);
        assert_eq!(get(&record, &path("name.first")), None);
        assert_eq!(get(&json!(null), &path("name")), None);
    }

    #[test]
    fn test_set_creates_intermediate_mappings() {
        let mut record = json!({ "name": "Ada" });
        set(&mut record, &path("learning.failure_response"), json!(["resilient recovery"]));

        assert_eq!(
            record,
            json!({
                "name": "Ada",
                "learning": { "failure_response": ["resilient recovery"] }
            })
        );
    }

    #[test]
    fn test_set_overwrites_leaf_and_replaces_scalar_intermediate() {
        let mut record = json!({ "era": "Modern", "values": "flat string" });
        set(&mut record, &path("era"), json!("Contemporary"));
        set(&mut record, &path("values.priority_framework"), json!(["quality over quantity"]));

        assert_eq!(record["era"], json!("Contemporary"));
        assert_eq!(
            record["values"],
            json!({ "priority_framework": ["quality over quantity"] })
        );
    }

    #[test]
    fn test_set_preserves_key_order() {
        let mut record = json!({ "a": 1, "b": 2, "c": 3 });
        set(&mut record, &path("b"), json!(20));
        set(&mut record, &path("d"), json!(4));

        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_remove_leaf() {
        let mut record = json!({
            "communication_style": { "tone": "warm", "tone_parsed": ["warm"], "pace": "slow" }
        });

        let removed = remove(&mut record, &path("communication_style.tone_parsed"));
        assert_eq!(removed, Some(json!(["warm"])));

        let keys: Vec<&String> = record["communication_style"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["tone", "pace"]);

        assert_eq!(remove(&mut record, &path("communication_style.tone_parsed")), None);
        assert_eq!(remove(&mut record, &path("nowhere.at_all")), None);
    }

    #[test]
    fn test_is_empty_predicate() {
        assert!(is_empty(None));
        assert!(is_empty(Some(&json!(null))));
        assert!(is_empty(Some(&json!(""))));
        assert!(is_empty(Some(&json!("   "))));
        assert!(is_empty(Some(&json!("N/A"))));
        assert!(is_empty(Some(&json!(" n/a "))));
        assert!(is_empty(Some(&json!("ab"))));
        assert!(is_empty(Some(&json!(" a b "))));
        assert!(is_empty(Some(&json!([]))));
        assert!(is_empty(Some(&json!({}))));

        assert!(!is_empty(Some(&json!("abc"))));
        assert!(!is_empty(Some(&json!(["x"]))));
        assert!(!is_empty(Some(&json!(0))));
        assert!(!is_empty(Some(&json!(false))));
        assert!(!is_empty(Some(&json!({ "k": null }))));
    }

    #[test]
    fn test_leaf_paths_in_encounter_order() {
        let record = json!({
            "name": "Ada",
            "values": { "core_values": ["rigor"], "nested": { "deep": 1 } },
            "empty_map": {},
            "": "unaddressable"
        });

        let paths: Vec<String> = leaf_paths(&record)
            .into_iter()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(paths, vec!["name", "values.core_values", "values.nested.deep"]);
    }

    #[test]
    fn test_display_name_falls_back() {
        assert_eq!(display_name(&json!({ "name": "Ada" }), "ada.json"), "Ada");
        assert_eq!(display_name(&json!({ "name": " " }), "ada.json"), "ada.json");
        assert_eq!(display_name(&json!({}), "ada.json"), "ada.json");
    }
}

//! Signal extraction
//!
//! A signal is the lowercase text gathered from a fixed list of source fields. It
//! is the only evidence inference rules look at, so the source list of a field spec
//! fully describes which parts of a record can influence that field.

use crate::record::{self, FieldPath};
use serde_json::Value;

/// Lowercase, space-joined text drawn from a record's source fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signal(String);

impl Signal {
    /// Gather text from `sources`, in the order given
    ///
    /// Strings are taken verbatim, sequences are joined with spaces, numbers and
    /// booleans use their JSON text, nested mappings and absent fields contribute
    /// nothing.
    pub fn extract(record: &Value, sources: &[FieldPath]) -> Self {
        let parts: Vec<String> = sources
            .iter()
            .filter_map(|path| record::get(record, path))
            .flat_map(text_items)
            .collect();
        Self(parts.join(" ").to_lowercase())
    }


    /// True when any keyword occurs as a substring (keywords are lowercased first)
    pub fn contains_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        keywords.iter().any(|keyword| {
            let keyword = keyword.as_ref().to_lowercase();
            !keyword.is_empty() && self.0.contains(&keyword)
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Scalar text items held by a value
///
/// A string yields itself, a sequence yields the text of each scalar element, a
/// number or boolean yields its JSON text. `null` and mappings yield nothing.
pub fn text_items(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::Number(_) | Value::Bool(_) => scalar_text(value).into_iter().collect(),
        Value::Null | Value::Object(_) => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

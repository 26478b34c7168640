//! Inference rules: conditions and outcomes
//!
//! A rule pairs a [`Condition`] with an [`Outcome`]. Conditions are a closed set of
//! tagged variants so rule tables stay declarative data; the engine never branches
//! on anything a table cannot express.
//!
//! The lowercase constructor functions (`signal`, `within`, `born_before`, ...)
//! take raw field paths for readability in tables. Paths are checked when the
//! owning [`FieldSpec`](super::FieldSpec) is built.

use crate::record::{self, FieldPath};
use crate::signal::{self, Signal};
use serde_json::Value;

/// Field holding the year of birth, used by the era/generation thresholds
pub const BIRTH_YEAR: &str = "birth_year";

/// Predicate over a record and the target field's signal
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Any keyword occurs in the target field's source signal
    Signal(Vec<String>),
    /// Any keyword occurs in the signal built from these fields only
    Source {
        fields: Vec<FieldPath>,
        keywords: Vec<String>,
    },
    /// The field's text equals `value` (trimmed, case-insensitive)
    Is { field: FieldPath, value: String },
    /// The field holds a year strictly before `year`
    YearBefore { field: FieldPath, year: i64 },
    /// The field holds a year at or after `year`
    YearFrom { field: FieldPath, year: i64 },
    /// The field is populated
    Present(FieldPath),
    /// The field is populated and holds between `min` and `max` items (inclusive)
    ///
    /// A plain string counts as one item.
    ItemCount {
        field: FieldPath,
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Every inner condition holds
    All(Vec<Condition>),
    /// At least one inner condition holds
    Any(Vec<Condition>),
    /// The inner condition does not hold
    Not(Box<Condition>),
}

impl Condition {
    /// Evaluate against a record; `signal` is the target field's source signal
    pub fn matches(&self, record: &Value, signal: &Signal) -> bool {
        match self {
            Condition::Signal(keywords) => signal.contains_any(keywords),
            Condition::Source { fields, keywords } => {
                Signal::extract(record, fields).contains_any(keywords)
            }
            Condition::Is { field, value } => record::get(record, field)
                .and_then(Value::as_str)
                .is_some_and(|text| text.trim().eq_ignore_ascii_case(value.trim())),
            Condition::YearBefore { field, year } => {
                year_of(record, field).is_some_and(|found| found < *year)
            }
            Condition::YearFrom { field, year } => {
                year_of(record, field).is_some_and(|found| found >= *year)
            }
            Condition::Present(field) => !record::is_field_empty(record, field),
            Condition::ItemCount { field, min, max } => {
                let value = record::get(record, field);
                if record::is_empty(value) {
                    return false;
                }
                let count = match value {
                    Some(Value::Array(items)) => items.len(),
                    _ => 1,
                };
                min.map_or(true, |m| count >= m) && max.map_or(true, |m| count <= m)
            }
            Condition::All(inner) => inner.iter().all(|c| c.matches(record, signal)),
            Condition::Any(inner) => inner.iter().any(|c| c.matches(record, signal)),
            Condition::Not(inner) => !inner.matches(record, signal),
        }
    }

    /// Every field path this condition reads
    pub(crate) fn field_paths(&self) -> Vec<&FieldPath> {
        match self {
            Condition::Signal(_) => Vec::new(),
            Condition::Source { fields, .. } => fields.iter().collect(),
            Condition::Is { field, .. }
            | Condition::YearBefore { field, .. }
            | Condition::YearFrom { field, .. }
            | Condition::Present(field)
            | Condition::ItemCount { field, .. } => vec![field],
            Condition::All(inner) | Condition::Any(inner) => {
                inner.iter().flat_map(Condition::field_paths).collect()
            }
            Condition::Not(inner) => inner.field_paths(),
        }
    }
}

/// Year held by a field: an integer, a float with no fraction, or numeric text
fn year_of(record: &Value, field: &FieldPath) -> Option<i64> {
    match record::get(record, field)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// What a matching rule contributes
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// One vocabulary member (categorical fields)
    Category(String),
    /// Fixed list items (multi-value fields)
    Items(Vec<String>),
    /// The current text items of another field (multi-value fields)
    CopyOf(FieldPath),
    /// Text with `{field.path}` or `{field.path|lower}` placeholders
    Template(String),
}

impl Outcome {
    /// Resolve against a record; an empty result means the rule contributes nothing
    pub fn resolve(&self, record: &Value) -> Vec<String> {
        match self {
            Outcome::Category(category) => vec![category.clone()],
            Outcome::Items(items) => items.clone(),
            Outcome::CopyOf(field) => record::get(record, field)
                .map(signal::text_items)
                .unwrap_or_default()
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            Outcome::Template(template) => {
                let rendered = render_template(template, record);
                if rendered.is_empty() {
                    Vec::new()
                } else {
                    vec![rendered]
                }
            }
        }
    }

    pub(crate) fn field_paths(&self) -> Vec<String> {
        match self {
            Outcome::Category(_) | Outcome::Items(_) => Vec::new(),
            Outcome::CopyOf(field) => vec![field.to_string()],
            Outcome::Template(template) => placeholders(template)
                .into_iter()
                .map(|(path, _)| path.to_string())
                .collect(),
        }
    }
}

/// One ordered entry of a field's rule table
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub when: Condition,
    pub then: Outcome,
    /// In multi-value fields, a matching exclusive rule ends the scan
    pub exclusive: bool,
}

/// Render a template, filling placeholders from the record
///
/// `{path}` inserts the field's text items joined with `", "`; `{path|lower}` also
/// lowercases them. Missing fields render as nothing. Runs of whitespace collapse
/// to one space, spaces before `.`/`,` are dropped and the first letter is
/// uppercased.
pub fn render_template(template: &str, record: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                out.push_str(&placeholder_text(&after[..close], record));
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    tidy_sentence(&out)
}

fn placeholder_text(spec: &str, record: &Value) -> String {
    let (raw_path, lower) = match spec.split_once('|') {
        Some((path, "lower")) => (path, true),
        Some((path, _)) => (path, false),
        None => (spec, false),
    };
    let Ok(path) = FieldPath::parse(raw_path) else {
        return String::new();
    };
    let text = record::get(record, &path)
        .filter(|value| !record::is_empty(Some(value)))
        .map(|value| signal::text_items(value).join(", "))
        .unwrap_or_default();
    if lower {
        text.to_lowercase()
    } else {
        text
    }
}

fn placeholders(template: &str) -> Vec<(&str, bool)> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else { break };
        let spec = &after[..close];
        match spec.split_once('|') {
            Some((path, modifier)) => found.push((path, modifier == "lower")),
            None => found.push((spec, false)),
        }
        rest = &after[close + 1..];
    }
    found
}

fn tidy_sentence(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let tidied = collapsed.replace(" .", ".").replace(" ,", ",");
    let tidied = tidied.trim_start_matches(['-', ',', ' ']).trim();

    let mut chars = tidied.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn path(raw: &str) -> FieldPath {
    FieldPath::literal(raw)
}

/// Any keyword in the target field's source signal
pub fn signal(keywords: &[&str]) -> Condition {
    Condition::Signal(owned(keywords))
}

/// Any keyword in the signal built from `fields`
pub fn within(fields: &[&str], keywords: &[&str]) -> Condition {
    Condition::Source {
        fields: fields.iter().map(|f| path(f)).collect(),
        keywords: owned(keywords),
    }
}

/// Field text equals `value` (case-insensitive)
pub fn is(field: &str, value: &str) -> Condition {
    Condition::Is {
        field: path(field),
        value: value.to_string(),
    }
}

/// Field text equals any of `values`
pub fn is_any(field: &str, values: &[&str]) -> Condition {
    Condition::Any(values.iter().map(|v| is(field, v)).collect())
}

/// `birth_year < year`
pub fn born_before(year: i64) -> Condition {
    Condition::YearBefore {
        field: path(BIRTH_YEAR),
        year,
    }
}

/// `birth_year >= year`
pub fn born_from(year: i64) -> Condition {
    Condition::YearFrom {
        field: path(BIRTH_YEAR),
        year,
    }
}

pub fn present(field: &str) -> Condition {
    Condition::Present(path(field))
}

pub fn absent(field: &str) -> Condition {
    not(present(field))
}

pub fn item_count(field: &str, min: Option<usize>, max: Option<usize>) -> Condition {
    Condition::ItemCount {
        field: path(field),
        min,
        max,
    }
}

pub fn all(conditions: Vec<Condition>) -> Condition {
    Condition::All(conditions)
}

pub fn any(conditions: Vec<Condition>) -> Condition {
    Condition::Any(conditions)
}

pub fn not(condition: Condition) -> Condition {
    Condition::Not(Box::new(condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_signal() -> Signal {
        Signal::default()
    }

    #[test]
    fn test_signal_condition_uses_given_signal() {
        let record = json!({ "domain": "Technology" });
        let sig = Signal::extract(&record, &[FieldPath::parse("domain").unwrap()]);

        assert!(signal(&["tech"]).matches(&record, &sig));
        assert!(!signal(&["tech"]).matches(&record, &empty_signal()));
    }

    #[test]
    fn test_within_condition_builds_own_signal() {
        let record = json!({ "occupation": "Executive Coach", "domain": "Business" });

        assert!(within(&["occupation"], &["coach"]).matches(&record, &empty_signal()));
        assert!(!within(&["domain"], &["coach"]).matches(&record, &empty_signal()));
    }

    #[test]
    fn test_is_condition() {
        let record = json!({ "domain": " Philosophy " });
        assert!(is("domain", "philosophy").matches(&record, &empty_signal()));
        assert!(!is("domain", "philosoph").matches(&record, &empty_signal()));
        assert!(is_any("domain", &["Art", "Philosophy"]).matches(&record, &empty_signal()));
    }

    #[test]
    fn test_year_thresholds() {
        let s = empty_signal();
        assert!(born_before(1940).matches(&json!({ "birth_year": 1925 }), &s));
        assert!(!born_before(1940).matches(&json!({ "birth_year": 1940 }), &s));
        assert!(born_from(1940).matches(&json!({ "birth_year": 1940 }), &s));
        assert!(born_from(1980).matches(&json!({ "birth_year": "1985" }), &s));
        assert!(born_from(1980).matches(&json!({ "birth_year": 1985.0 }), &s));
        assert!(!born_from(1980).matches(&json!({ "birth_year": 1985.5 }), &s));
        assert!(!born_from(1980).matches(&json!({}), &s));
        assert!(!born_before(1980).matches(&json!({ "birth_year": "unknown" }), &s));
    }

    #[test]
    fn test_item_count() {
        let s = empty_signal();
        let five = json!({ "c": ["a1", "b2", "c3", "d4", "e5"] });
        let single = json!({ "c": "single competency" });

        assert!(item_count("c", Some(5), None).matches(&five, &s));
        assert!(!item_count("c", None, Some(3)).matches(&five, &s));
        assert!(item_count("c", None, Some(3)).matches(&single, &s));
        assert!(!item_count("c", None, Some(3)).matches(&json!({ "c": [] }), &s));
    }

    #[test]
    fn test_combinators() {
        let s = empty_signal();
        let record = json!({ "domain": "Art", "values": { "core_values": ["beauty"] } });

        assert!(all(vec![present("domain"), present("values.core_values")]).matches(&record, &s));
        assert!(!all(vec![present("domain"), present("missing")]).matches(&record, &s));
        assert!(any(vec![present("missing"), present("domain")]).matches(&record, &s));
        assert!(absent("missing").matches(&record, &s));
        assert!(!absent("domain").matches(&record, &s));
    }

    #[test]
    fn test_copy_of_outcome_trims_and_drops_blank() {
        let record = json!({ "a": [" data-driven ", "", "systematic"] });
        let outcome = Outcome::CopyOf(FieldPath::parse("a").unwrap());
        assert_eq!(outcome.resolve(&record), vec!["data-driven", "systematic"]);
        assert!(Outcome::CopyOf(FieldPath::parse("b").unwrap()).resolve(&record).is_empty());
    }

    #[test]
    fn test_render_template() {
        let record = json!({
            "name": "Ada Lovelace",
            "domain": "Mathematics",
            "archetype": "Visionary Analyst"
        });

        assert_eq!(
            render_template("{domain|lower} professional known for {archetype|lower}.", &record),
            "Mathematics professional known for visionary analyst."
        );
        assert_eq!(
            render_template("{nationality} {domain} Professional", &record),
            "Mathematics Professional"
        );
        assert_eq!(render_template("{missing}", &record), "");
        assert_eq!(render_template("{name} - notable figure.", &record), "Ada Lovelace - notable figure.");
        assert_eq!(render_template("unclosed {brace", &record), "Unclosed {brace");
    }

    #[test]
    fn test_placeholders_listed_for_validation() {
        let outcome = Outcome::Template("{domain|lower} and {values.core_values}".to_string());
        assert_eq!(outcome.field_paths(), vec!["domain", "values.core_values"]);
    }
}

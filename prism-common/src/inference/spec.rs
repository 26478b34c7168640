//! Field specifications
//!
//! A [`FieldSpec`] is everything the engine knows about one inferable field: where
//! it lives, which source fields feed its signal, its ordered rule table and what
//! to produce when no rule matches. Specs are validated once when built; an
//! evaluated spec never fails.

use super::rule::{Condition, Outcome, Rule};
use crate::record::FieldPath;
use crate::signal::Signal;
use crate::{Error, Result};
use serde_json::Value;

/// Smallest and largest cap a multi-value field may declare
pub const MIN_ITEM_CAP: usize = 3;
pub const MAX_ITEM_CAP: usize = 5;

/// How a field's rules combine and what its default looks like
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// First matching rule wins; every value is a vocabulary member
    Categorical {
        vocabulary: Vec<String>,
        default: String,
    },
    /// Matching rules accumulate items in rule order, deduplicated and capped
    MultiValue { cap: usize, default: Vec<String> },
    /// First matching rule's rendered template; the default is a template too
    Text { default: String },
}

/// Which rules produced an inferred value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Indexes of the contributing rules, in table order
    Matched(Vec<usize>),
    /// No rule matched; the field's default was used
    Defaulted,
}

/// Inferred value plus how it was reached
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub value: Value,
    pub resolution: Resolution,
}

/// Validated rule table for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    target: FieldPath,
    sources: Vec<FieldPath>,
    rules: Vec<Rule>,
    kind: FieldKind,
}

impl FieldSpec {
    /// Start a categorical field (first match wins)
    pub fn categorical(target: &str) -> FieldSpecBuilder {
        FieldSpecBuilder::new(target, Shape::Categorical)
    }

    /// Start a multi-value field holding at most `cap` items
    pub fn multi_value(target: &str, cap: usize) -> FieldSpecBuilder {
        FieldSpecBuilder::new(target, Shape::MultiValue(cap))
    }

    /// Start a free-text field
    pub fn text(target: &str) -> FieldSpecBuilder {
        FieldSpecBuilder::new(target, Shape::Text)
    }

    pub fn target(&self) -> &FieldPath {
        &self.target
    }

    pub fn sources(&self) -> &[FieldPath] {
        &self.sources
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Categorical vocabulary (empty for other kinds)
    pub fn vocabulary(&self) -> &[String] {
        match &self.kind {
            FieldKind::Categorical { vocabulary, .. } => vocabulary,
            _ => &[],
        }
    }

    /// Replace the default value
    ///
    /// Categorical defaults must be vocabulary members. For multi-value fields the
    /// text becomes a one-item default list; for text fields it is a template.
    pub fn with_default(mut self, value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::Config(format!(
                "default for '{}' must not be empty",
                self.target
            )));
        }
        match &mut self.kind {
            FieldKind::Categorical {
                vocabulary,
                default,
            } => {
                if !vocabulary.iter().any(|v| v == value) {
                    return Err(Error::Config(format!(
                        "default '{}' for '{}' is not in its vocabulary ({})",
                        value,
                        self.target,
                        vocabulary.join(", ")
                    )));
                }
                *default = value.to_string();
            }
            FieldKind::MultiValue { default, .. } => *default = vec![value.to_string()],
            FieldKind::Text { default } => *default = value.to_string(),
        }
        Ok(self)
    }

    /// Evaluate the rule table against a record
    ///
    /// Pure and total: the same record always yields the same value, and the value
    /// is never empty.
    pub fn evaluate(&self, record: &Value) -> Inference {
        let signal = Signal::extract(record, &self.sources);
        let matching = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.when.matches(record, &signal));

        match &self.kind {
            FieldKind::Categorical { default, .. } | FieldKind::Text { default } => {
                for (index, rule) in matching {
                    if let Some(value) = rule.then.resolve(record).into_iter().next() {
                        return Inference {
                            value: Value::String(value),
                            resolution: Resolution::Matched(vec![index]),
                        };
                    }
                }
                let value = match &self.kind {
                    FieldKind::Text { .. } => Outcome::Template(default.clone())
                        .resolve(record)
                        .into_iter()
                        .next()
                        .unwrap_or_else(|| default.clone()),
                    _ => default.clone(),
                };
                Inference {
                    value: Value::String(value),
                    resolution: Resolution::Defaulted,
                }
            }
            FieldKind::MultiValue { cap, default } => {
                let mut items: Vec<String> = Vec::new();
                let mut contributors = Vec::new();

                for (index, rule) in matching {
                    let resolved = rule.then.resolve(record);
                    if resolved.is_empty() {
                        continue;
                    }
                    contributors.push(index);
                    for item in resolved {
                        if !items.contains(&item) {
                            items.push(item);
                        }
                    }
                    if rule.exclusive || items.len() >= *cap {
                        break;
                    }
                }

                if items.is_empty() {
                    return Inference {
                        value: string_array(default),
                        resolution: Resolution::Defaulted,
                    };
                }
                items.truncate(*cap);
                Inference {
                    value: string_array(&items),
                    resolution: Resolution::Matched(contributors),
                }
            }
        }
    }
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Categorical,
    MultiValue(usize),
    Text,
}

/// Builder for [`FieldSpec`]; all checks happen in [`FieldSpecBuilder::build`]
#[derive(Debug, Clone)]
pub struct FieldSpecBuilder {
    target: String,
    shape: Shape,
    sources: Vec<String>,
    vocabulary: Vec<String>,
    rules: Vec<Rule>,
    default: Vec<String>,
}

impl FieldSpecBuilder {
    fn new(target: &str, shape: Shape) -> Self {
        Self {
            target: target.to_string(),
            shape,
            sources: Vec::new(),
            vocabulary: Vec::new(),
            rules: Vec::new(),
            default: Vec::new(),
        }
    }

    /// Fields whose text forms the signal, in order
    pub fn sources(mut self, sources: &[&str]) -> Self {
        self.sources.extend(sources.iter().map(|s| s.to_string()));
        self
    }

    /// Declare the categorical vocabulary
    pub fn vocabulary(mut self, values: &[&str]) -> Self {
        self.vocabulary.extend(values.iter().map(|v| v.to_string()));
        self
    }

    /// Categorical rule: when `condition` holds the field is `category`
    pub fn when(mut self, condition: Condition, category: &str) -> Self {
        self.push(condition, Outcome::Category(category.to_string()), false);
        self
    }

    /// Multi-value rule contributing `items`
    pub fn add(mut self, condition: Condition, items: &[&str]) -> Self {
        let items = items.iter().map(|i| i.to_string()).collect();
        self.push(condition, Outcome::Items(items), false);
        self
    }

    /// Multi-value rule that contributes `items` and ends the scan
    pub fn only(mut self, condition: Condition, items: &[&str]) -> Self {
        let items = items.iter().map(|i| i.to_string()).collect();
        self.push(condition, Outcome::Items(items), true);
        self
    }

    /// Multi-value rule copying another field's items and ending the scan
    ///
    /// A copy of an empty field contributes nothing, so the scan continues.
    pub fn copy(mut self, condition: Condition, from: &str) -> Self {
        self.push(condition, Outcome::CopyOf(FieldPath::literal(from)), true);
        self
    }

    /// Rule rendering a template (text fields, or one multi-value item)
    pub fn render(mut self, condition: Condition, template: &str) -> Self {
        let exclusive = matches!(self.shape, Shape::Text);
        self.push(condition, Outcome::Template(template.to_string()), exclusive);
        self
    }

    /// Default value (one item per call for multi-value fields)
    pub fn default(mut self, value: &str) -> Self {
        self.default.push(value.to_string());
        self
    }

    /// Multi-value default list
    pub fn defaults(mut self, values: &[&str]) -> Self {
        self.default.extend(values.iter().map(|v| v.to_string()));
        self
    }

    fn push(&mut self, when: Condition, then: Outcome, exclusive: bool) {
        self.rules.push(Rule {
            when,
            then,
            exclusive,
        });
    }

    /// Check paths, vocabulary and default, producing an immutable spec
    pub fn build(self) -> Result<FieldSpec> {
        let target = FieldPath::parse(&self.target)?;
        let sources = self
            .sources
            .iter()
            .map(|s| FieldPath::parse(s))
            .collect::<Result<Vec<_>>>()?;

        let invalid = |reason: String| Error::Config(format!("field spec '{}': {}", target, reason));

        for rule in &self.rules {
            for path in rule.when.field_paths() {
                FieldPath::parse(path.as_str()).map_err(|e| invalid(e.to_string()))?;
            }
            for raw in rule.then.field_paths() {
                FieldPath::parse(&raw).map_err(|e| invalid(e.to_string()))?;
            }
        }

        let kind = match self.shape {
            Shape::Categorical => {
                if self.vocabulary.is_empty() {
                    return Err(invalid("categorical field has no vocabulary".to_string()));
                }
                for rule in &self.rules {
                    match &rule.then {
                        Outcome::Category(category) if self.vocabulary.contains(category) => {}
                        Outcome::Category(category) => {
                            return Err(invalid(format!(
                                "rule value '{}' is not in the vocabulary",
                                category
                            )))
                        }
                        other => {
                            return Err(invalid(format!(
                                "categorical rules must name a category, found {:?}",
                                other
                            )))
                        }
                    }
                }
                let default = single_default(&self.default).map_err(invalid)?;
                if !self.vocabulary.contains(&default) {
                    return Err(invalid(format!(
                        "default '{}' is not in the vocabulary",
                        default
                    )));
                }
                FieldKind::Categorical {
                    vocabulary: self.vocabulary,
                    default,
                }
            }
            Shape::MultiValue(cap) => {
                if !(MIN_ITEM_CAP..=MAX_ITEM_CAP).contains(&cap) {
                    return Err(invalid(format!(
                        "cap {} is outside {}..={}",
                        cap, MIN_ITEM_CAP, MAX_ITEM_CAP
                    )));
                }
                if self.rules.iter().any(|r| matches!(r.then, Outcome::Category(_))) {
                    return Err(invalid("multi-value rules cannot name a category".to_string()));
                }
                let default: Vec<String> = self
                    .default
                    .iter()
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect();
                if default.is_empty() || default.len() > cap {
                    return Err(invalid(format!(
                        "default must hold between 1 and {} items",
                        cap
                    )));
                }
                FieldKind::MultiValue { cap, default }
            }
            Shape::Text => {
                if self.rules.iter().any(|r| !matches!(r.then, Outcome::Template(_))) {
                    return Err(invalid("text rules must render a template".to_string()));
                }
                let default = single_default(&self.default).map_err(invalid)?;
                FieldKind::Text { default }
            }
        };

        Ok(FieldSpec {
            target,
            sources,
            rules: self.rules,
            kind,
        })
    }
}

fn single_default(defaults: &[String]) -> std::result::Result<String, String> {
    match defaults {
        [only] if !only.trim().is_empty() => Ok(only.trim().to_string()),
        [] => Err("no default value".to_string()),
        _ => Err("expected exactly one non-empty default".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::rule::{born_before, born_from, present, signal};
    use serde_json::json;

    fn adoption() -> FieldSpec {
        FieldSpec::categorical("technology_relationship.technology_adoption")
            .sources(&["domain", "archetype"])
            .vocabulary(&["early adopter", "pragmatic", "skeptical", "resistant"])
            .when(signal(&["tech", "entrepreneur"]), "early adopter")
            .when(born_from(1980), "early adopter")
            .when(signal(&["philosophy"]), "skeptical")
            .default("pragmatic")
            .build()
            .unwrap()
    }

    #[test]
    fn test_categorical_first_match_wins() {
        let spec = adoption();
        let inference = spec.evaluate(&json!({ "domain": "Entrepreneur", "birth_year": 1985 }));
        assert_eq!(inference.value, json!("early adopter"));
        assert_eq!(inference.resolution, Resolution::Matched(vec![0]));

        let inference = spec.evaluate(&json!({ "domain": "Philosophy", "birth_year": 1990 }));
        assert_eq!(inference.value, json!("early adopter"));
        assert_eq!(inference.resolution, Resolution::Matched(vec![1]));
    }

    #[test]
    fn test_categorical_default_when_nothing_matches() {
        let inference = adoption().evaluate(&json!({}));
        assert_eq!(inference.value, json!("pragmatic"));
        assert_eq!(inference.resolution, Resolution::Defaulted);
    }

    #[test]
    fn test_build_rejects_value_outside_vocabulary() {
        let result = FieldSpec::categorical("x")
            .vocabulary(&["a"])
            .when(signal(&["k"]), "b")
            .default("a")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = FieldSpec::categorical("x").vocabulary(&["a"]).default("z").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_build_rejects_bad_paths() {
        assert!(FieldSpec::categorical("a..b")
            .vocabulary(&["a"])
            .default("a")
            .build()
            .is_err());
        assert!(FieldSpec::categorical("x")
            .vocabulary(&["a"])
            .when(present("bad."), "a")
            .default("a")
            .build()
            .is_err());
    }

    #[test]
    fn test_build_rejects_cap_outside_range() {
        let result = FieldSpec::multi_value("x", 7).default("a").build();
        assert!(matches!(result, Err(Error::Config(_))));
        let result = FieldSpec::multi_value("x", 2).default("a").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_multi_value_accumulates_dedupes_and_caps() {
        let spec = FieldSpec::multi_value("learning_preferences", 3)
            .sources(&["traits"])
            .add(signal(&["analytical"]), &["structured study", "reading"])
            .add(signal(&["curious"]), &["reading", "exploration"])
            .add(signal(&["social"]), &["discussion"])
            .default("varied learning methods")
            .build()
            .unwrap();

        let inference = spec.evaluate(&json!({ "traits": ["Analytical", "Curious", "Social"] }));
        assert_eq!(inference.value, json!(["structured study", "reading", "exploration"]));
        assert_eq!(inference.resolution, Resolution::Matched(vec![0, 1]));

        let inference = spec.evaluate(&json!({ "traits": ["stoic"] }));
        assert_eq!(inference.value, json!(["varied learning methods"]));
    }

    #[test]
    fn test_multi_value_exclusive_rule_stops_scan() {
        let spec = FieldSpec::multi_value("failure_response", 3)
            .sources(&["traits"])
            .copy(present("resilience"), "resilience")
            .add(signal(&["persistent"]), &["persistence"])
            .default("constructive response")
            .build()
            .unwrap();

        let copied = spec.evaluate(&json!({ "resilience": ["grit"], "traits": "persistent" }));
        assert_eq!(copied.value, json!(["grit"]));

        let fallback = spec.evaluate(&json!({ "resilience": [], "traits": "persistent" }));
        assert_eq!(fallback.value, json!(["persistence"]));
    }

    #[test]
    fn test_text_template_and_default_template() {
        let spec = FieldSpec::text("era")
            .render(born_before(1800), "Enlightenment")
            .render(present("domain"), "{domain} Professional")
            .default("General")
            .build()
            .unwrap();

        assert_eq!(spec.evaluate(&json!({ "birth_year": 1700 })).value, json!("Enlightenment"));
        assert_eq!(spec.evaluate(&json!({ "domain": "Music" })).value, json!("Music Professional"));
        assert_eq!(spec.evaluate(&json!({})).value, json!("General"));
    }

    #[test]
    fn test_with_default_override() {
        let spec = adoption().with_default("skeptical").unwrap();
        assert_eq!(spec.evaluate(&json!({})).value, json!("skeptical"));

        assert!(matches!(adoption().with_default("luddite"), Err(Error::Config(_))));
        assert!(adoption().with_default("  ").is_err());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let spec = adoption();
        let record = json!({ "archetype": "Tech Visionary", "birth_year": 1950 });
        assert_eq!(spec.evaluate(&record), spec.evaluate(&record));
    }
}

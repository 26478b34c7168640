//! Trait canonicalization
//!
//! Free-text trait lists are case-folded, mapped through a synonym table and
//! deduplicated keeping the first occurrence. The result is a fixed point:
//! canonicalizing an already canonical list returns it unchanged.

use crate::record::FieldPath;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Trait list rewritten by the canonicalizer
pub const PRIMARY_TRAITS: &str = "psychological_profile.primary_traits";

/// Free-text fields holding trait-like phrases; standardized to lowercase
pub const TRAIT_FIELDS: &[&str] = &[
    "psychological_profile.primary_traits",
    "psychological_profile.core_motivations",
    "psychological_profile.behavioral_patterns",
    "psychological_profile.stress_responses",
    "psychological_profile.blind_spots",
    "communication_style.tone",
    "communication_style.vocabulary_patterns",
    "domain_expertise.core_competencies",
    "behavioral_patterns.work_style",
    "behavioral_patterns.problem_solving_approach",
    "behavioral_patterns.decision_making",
    "behavioral_patterns.learning_preferences",
    "collaboration.leadership_style",
    "collaboration.team_dynamics",
    "collaboration.mentorship_approach",
    "collaboration.conflict_resolution",
    "values.core_values",
    "values.ethical_standards",
    "bias_awareness.primary_biases",
    "bias_awareness.bias_mitigation_strategies",
    "growth_motivation.intrinsic_drivers",
    "growth_motivation.curiosity_indicators",
    "cognitive_humanism.empathy_expression",
    "cognitive_humanism.ethical_framework",
    "humanistic_cognition.creative_problem_solving",
    "humanistic_cognition.holistic_perspective",
    "humanistic_cognition.collaborative_intelligence",
    "self_actualization_indicators.peak_experiences",
    "self_actualization_indicators.autonomy_expression",
    "self_actualization_indicators.purpose_alignment",
    "behavioral_growth.adaptation_patterns",
    "behavioral_growth.feedback_integration",
    "behavioral_growth.resilience_indicators",
    "learning.learning_style",
    "learning.knowledge_sharing",
    "learning.adaptation_speed",
    "learning.failure_response",
    "domain_expertise.primary_expertise",
    "domain_expertise.knowledge_depth",
    "domain_expertise.innovation_approach",
    "communication.medium_preferences",
    "communication.message_framing",
    "values.priority_framework",
];

/// Variant → canonical trait spellings
const STANDARD_SYNONYMS: &[(&str, &str)] = &[
    ("research-focused", "research-oriented"),
    ("research-driven", "research-oriented"),
    ("research-backed", "research-oriented"),
    ("results-driven", "results-oriented"),
    ("results-focused", "results-oriented"),
    ("growth-focused", "growth-oriented"),
    ("growth-minded", "growth-oriented"),
    ("data-focused", "data-driven"),
    ("emotionally intelligent", "emotionally-intelligent"),
    ("scientifically rigorous", "scientifically-rigorous"),
    ("scientifically-minded", "scientifically-rigorous"),
    ("socially conscious", "socially-conscious"),
    ("socially aware", "socially-conscious"),
    ("transformation-focused", "transformational"),
    ("performance-focused", "performance-oriented"),
    ("leadership-focused", "leadership-oriented"),
    ("observational", "observant"),
    ("methodological", "methodical"),
    ("inspirational", "inspiring"),
    ("evidence-driven", "evidence-based"),
    ("intellectually curious", "intellectually-curious"),
    ("intellectually rigorous", "intellectually-rigorous"),
    ("intellectually sharp", "intellectually-rigorous"),
    ("emotionally driven", "emotionally-driven"),
    ("artistically expressive", "artistically-expressive"),
];

/// Immutable variant → canonical lookup with chains already resolved
///
/// Keys and targets are stored trimmed and lowercase. Construction follows every
/// chain to its end (`a → b`, `b → c` becomes `a → c`, `b → c`), drops identity
/// entries and rejects cycles, so no target is ever itself a key. Targets may
/// not contain `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
    resolved: HashMap<String, String>,
}

impl SynonymTable {
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (normalize(k.as_ref()), normalize(v.as_ref())))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty() && k != v)
            .collect();

        // targets must stay single list items
        if let Some((key, target)) = entries.iter().find(|(_, v)| v.contains(',')) {
            return Err(Error::Config(format!(
                "synonym target '{}' for '{}' contains a comma",
                target, key
            )));
        }

        let mut resolved = HashMap::with_capacity(entries.len());
        for key in entries.keys() {
            let mut seen = HashSet::new();
            seen.insert(key.as_str());
            let mut current = key.as_str();
            while let Some(next) = entries.get(current) {
                if !seen.insert(next.as_str()) {
                    return Err(Error::Config(format!(
                        "synonym cycle through '{}'",
                        key
                    )));
                }
                current = next.as_str();
            }
            resolved.insert(key.clone(), current.to_string());
        }

        Ok(Self { entries, resolved })
    }

    /// Built-in trait vocabulary
    pub fn standard() -> Result<Self> {
        Self::new(STANDARD_SYNONYMS.iter().copied())
    }

    /// A new table with `extra` entries added (replacing same-key entries)
    pub fn with_overrides(&self, extra: &BTreeMap<String, String>) -> Result<Self> {
        let mut merged = self.entries.clone();
        merged.extend(extra.iter().map(|(k, v)| (normalize(k), normalize(v))));
        Self::new(merged)
    }

    /// Canonical form for an already-lowercased trait
    pub fn lookup(&self, trait_text: &str) -> Option<&str> {
        self.resolved.get(trait_text).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Count of each `original → canonical` rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraitChangeLog {
    changes: BTreeMap<String, usize>,
}

impl TraitChangeLog {
    pub fn record(&mut self, original: &str, canonical: &str) {
        *self
            .changes
            .entry(format!("{} → {}", original, canonical))
            .or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: &TraitChangeLog) {
        for (change, count) in &other.changes {
            *self.changes.entry(change.clone()).or_insert(0) += count;
        }
    }

    /// Total rewrites recorded
    pub fn total(&self) -> usize {
        self.changes.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Most frequent rewrites first, ties by text
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .changes
            .iter()
            .map(|(change, count)| (change.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// Case-fold, synonym-map and dedupe trait lists
#[derive(Debug, Clone)]
pub struct TraitCanonicalizer {
    synonyms: SynonymTable,
}

impl TraitCanonicalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Canonical list: lowercase, synonym-mapped, unique, first occurrence kept
    pub fn canonicalize<S: AsRef<str>>(&self, traits: &[S]) -> Vec<String> {
        self.canonicalize_logged(traits, &mut TraitChangeLog::default())
    }

    fn canonicalize_logged<S: AsRef<str>>(
        &self,
        traits: &[S],
        log: &mut TraitChangeLog,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut canonical = Vec::with_capacity(traits.len());

        for original in traits {
            let original = original.as_ref().trim();
            if original.is_empty() {
                continue;
            }
            let lowered = original.to_lowercase();
            let mapped = self
                .synonyms
                .lookup(&lowered)
                .map(str::to_string)
                .unwrap_or(lowered);
            if mapped != original {
                log.record(original, &mapped);
            }
            if seen.insert(mapped.clone()) {
                canonical.push(mapped);
            }
        }
        canonical
    }

    /// Canonicalize a stored value, keeping its shape
    ///
    /// A comma-separated string comes back as a `", "`-joined string, a sequence as
    /// a sequence. Other values are not trait lists and yield `None`.
    pub fn canonicalize_value(&self, value: &Value, log: &mut TraitChangeLog) -> Option<Value> {
        match value {
            Value::String(text) => {
                let traits: Vec<&str> = text.split(',').collect();
                Some(Value::String(
                    self.canonicalize_logged(&traits, log).join(", "),
                ))
            }
            Value::Array(items) => {
                let traits: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                Some(Value::Array(
                    self.canonicalize_logged(&traits, log)
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                ))
            }
            _ => None,
        }
    }
}

/// Trimmed, lowercase copy of a free-text value
///
/// Strings are lowercased whole (no splitting). In sequences, string elements are
/// lowercased, blank strings and nulls dropped, other elements kept. Mappings,
/// numbers and booleans yield `None`.
pub fn lowercase_value(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) => Some(Value::String(text.trim().to_lowercase())),
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) if text.trim().is_empty() => None,
                    Value::String(text) => Some(Value::String(text.trim().to_lowercase())),
                    Value::Null => None,
                    other => Some(other.clone()),
                })
                .collect(),
        )),
        _ => None,
    }
}

/// Trait items of a stored value as the canonicalizer sees them
pub fn split_traits(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// One trait's corpus frequency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitCount {
    #[serde(rename = "trait")]
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

/// Corpus-wide trait usage summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitDistribution {
    pub records: usize,
    pub total_unique: usize,
    pub total_instances: usize,
    pub average_per_record: f64,
    /// Traits used by more than 20 records
    pub high_use: usize,
    /// 6 to 20 records
    pub medium_use: usize,
    /// 2 to 5 records
    pub low_use: usize,
    pub single_use: usize,
    pub top: Vec<TraitCount>,
}

impl TraitDistribution {
    /// Tally trait items of `field` across `records`, keeping the `top_n` most used
    pub fn from_records<'a, I>(records: I, field: &FieldPath, top_n: usize) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut record_count = 0;

        for record in records {
            record_count += 1;
            if let Some(value) = crate::record::get(record, field) {
                for item in split_traits(value) {
                    *counts.entry(item).or_insert(0) += 1;
                }
            }
        }

        let total_instances = counts.values().sum();
        let bucket = |range: std::ops::RangeInclusive<usize>| {
            counts.values().filter(|&&c| range.contains(&c)).count()
        };
        let high_use = counts.values().filter(|&&c| c > 20).count();
        let (medium_use, low_use, single_use) = (bucket(6..=20), bucket(2..=5), bucket(1..=1));

        let mut ranked: Vec<(&String, &usize)> = counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let top = ranked
            .into_iter()
            .take(top_n)
            .map(|(name, &count)| TraitCount {
                name: name.clone(),
                count,
                percentage: percentage_of(count, record_count),
            })
            .collect();

        Self {
            records: record_count,
            total_unique: counts.len(),
            total_instances,
            average_per_record: if record_count == 0 {
                0.0
            } else {
                round1(total_instances as f64 / record_count as f64)
            },
            high_use,
            medium_use,
            low_use,
            single_use,
            top,
        }
    }
}

fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 / total as f64 * 100.0)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//! Corpus coverage analysis
//!
//! Read-only aggregation over a set of records: how many records populate each
//! tracked field, which bands those percentages fall into, and which fields
//! exist in the data without being tracked (or the reverse). The same records
//! always yield the same report.

use crate::record::{self, FieldPath};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Fields under this percentage are reported as enrichment candidates
pub const ENRICHMENT_THRESHOLD: f64 = 50.0;

/// Fields empty in more than this share of the records holding them are removal candidates
pub const REMOVAL_EMPTY_THRESHOLD: f64 = 70.0;

/// Suffixes marking derived copies of a field
const VARIANT_SUFFIXES: &[&str] = &["_parsed", "_chips"];

/// Coverage quality bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageBand {
    Excellent,
    Good,
    Medium,
    Poor,
    Critical,
}

impl CoverageBand {
    /// excellent ≥ 90, good ≥ 70, medium ≥ 50, poor ≥ 20, else critical
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            CoverageBand::Excellent
        } else if percentage >= 70.0 {
            CoverageBand::Good
        } else if percentage >= 50.0 {
            CoverageBand::Medium
        } else if percentage >= 20.0 {
            CoverageBand::Poor
        } else {
            CoverageBand::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoverageBand::Excellent => "excellent",
            CoverageBand::Good => "good",
            CoverageBand::Medium => "medium",
            CoverageBand::Poor => "poor",
            CoverageBand::Critical => "critical",
        }
    }
}

impl fmt::Display for CoverageBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named set of tracked fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    pub name: String,
    pub fields: Vec<FieldPath>,
}

impl FieldGroup {
    pub fn new(name: impl Into<String>, fields: Vec<FieldPath>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    fn literal(name: &str, fields: &[&str]) -> Self {
        Self::new(name, fields.iter().map(|f| FieldPath::literal(f)).collect())
    }
}

/// Ordered field groups the analyzer reports on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFields {
    groups: Vec<FieldGroup>,
}

impl TrackedFields {
    pub fn new(groups: Vec<FieldGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    /// Every tracked path once, in group order
    pub fn paths(&self) -> Vec<&FieldPath> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .flat_map(|group| group.fields.iter())
            .filter(|path| seen.insert(*path))
            .collect()
    }

    /// True when `path` is tracked or nested under a tracked path
    pub fn covers(&self, path: &FieldPath) -> bool {
        self.groups.iter().flat_map(|g| g.fields.iter()).any(|tracked| {
            path == tracked
                || path
                    .as_str()
                    .strip_prefix(tracked.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

impl Default for TrackedFields {
    fn default() -> Self {
        Self::new(vec![
            FieldGroup::literal(
                "Behavioral Humanism",
                &[
                    "bias_awareness.decision_making_style",
                    "bias_awareness.primary_biases",
                    "bias_awareness.bias_mitigation_strategies",
                    "growth_motivation.intrinsic_drivers",
                    "growth_motivation.learning_orientation",
                    "growth_motivation.curiosity_indicators",
                    "cognitive_humanism.empathy_expression",
                    "cognitive_humanism.ethical_framework",
                    "cognitive_humanism.human_centered_thinking",
                    "humanistic_cognition.creative_problem_solving",
                    "humanistic_cognition.holistic_perspective",
                    "humanistic_cognition.collaborative_intelligence",
                    "human_needs_hierarchy.need_priorities",
                    "human_needs_hierarchy.fulfillment_patterns",
                    "human_needs_hierarchy.growth_trajectory",
                    "self_actualization_indicators.peak_experiences",
                    "self_actualization_indicators.autonomy_expression",
                    "self_actualization_indicators.purpose_alignment",
                    "behavioral_growth.adaptation_patterns",
                    "behavioral_growth.feedback_integration",
                    "behavioral_growth.resilience_indicators",
                ],
            ),
            FieldGroup::literal(
                "Core Profile",
                &[
                    "psychological_profile.primary_traits",
                    "psychological_profile.core_motivations",
                    "psychological_profile.behavioral_patterns",
                    "psychological_profile.decision_making_framework",
                    "psychological_profile.stress_responses",
                    "psychological_profile.blind_spots",
                ],
            ),
            FieldGroup::literal(
                "Communication",
                &[
                    "communication_style.tone",
                    "communication_style.sentence_structure",
                    "communication_style.vocabulary_patterns",
                    "communication.audience_adaptation",
                    "communication.medium_preferences",
                    "communication.message_framing",
                ],
            ),
            FieldGroup::literal(
                "Collaboration",
                &[
                    "collaboration.leadership_style",
                    "collaboration.team_dynamics",
                    "collaboration.mentorship_approach",
                    "collaboration.conflict_resolution",
                ],
            ),
            FieldGroup::literal(
                "Domain Expertise",
                &[
                    "domain_expertise.primary_expertise",
                    "domain_expertise.core_competencies",
                    "domain_expertise.knowledge_depth",
                    "domain_expertise.innovation_approach",
                ],
            ),
            FieldGroup::literal(
                "Behavioral Patterns",
                &[
                    "behavioral_patterns.work_style",
                    "behavioral_patterns.problem_solving_approach",
                    "behavioral_patterns.decision_making",
                    "behavioral_patterns.learning_preferences",
                ],
            ),
            FieldGroup::literal(
                "Learning",
                &[
                    "learning.learning_style",
                    "learning.knowledge_sharing",
                    "learning.adaptation_speed",
                    "learning.failure_response",
                ],
            ),
            FieldGroup::literal(
                "Values",
                &[
                    "values.core_values",
                    "values.ethical_standards",
                    "values.priority_framework",
                ],
            ),
        ])
    }
}

/// Population statistics for one tracked field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCoverage {
    pub path: FieldPath,
    pub group: String,
    pub populated: usize,
    pub empty: usize,
    pub total: usize,
    pub percentage: f64,
    pub band: CoverageBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCoverage {
    pub name: String,
    pub fields: Vec<FieldCoverage>,
}

/// Field present in records but mostly empty where present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalCandidate {
    pub path: FieldPath,
    pub empty: usize,
    pub present: usize,
    pub empty_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantUsage {
    pub path: FieldPath,
    pub usage: usize,
}

/// Fields sharing a base name once `_parsed`/`_chips` suffixes are stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedundantVariants {
    pub base: String,
    /// Most used first
    pub variants: Vec<VariantUsage>,
    pub recommended: FieldPath,
}

/// Coverage summary for a corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub records: usize,
    pub groups: Vec<GroupCoverage>,
    pub overall_percentage: f64,
    pub band_summary: BTreeMap<CoverageBand, usize>,
    /// Leaf paths found in records but not tracked, sorted
    pub orphaned_fields: Vec<FieldPath>,
    /// Tracked paths absent from every record, in tracked order
    pub missing_fields: Vec<FieldPath>,
    /// Tracked fields below the enrichment threshold, lowest coverage first
    pub enrichment_candidates: Vec<FieldCoverage>,
    pub removal_candidates: Vec<RemovalCandidate>,
    pub redundant_variants: Vec<RedundantVariants>,
}

impl CoverageReport {
    /// Statistics for a tracked field (first group that tracks it)
    pub fn field(&self, path: &FieldPath) -> Option<&FieldCoverage> {
        self.groups
            .iter()
            .flat_map(|group| group.fields.iter())
            .find(|coverage| &coverage.path == path)
    }
}

/// Per-leaf tallies gathered while walking the corpus
#[derive(Debug, Default)]
struct LeafUsage {
    present: usize,
    empty: usize,
}

/// Computes [`CoverageReport`]s over a tracked field set
#[derive(Debug, Clone, Default)]
pub struct CoverageAnalyzer {
    tracked: TrackedFields,
}

impl CoverageAnalyzer {
    pub fn new(tracked: TrackedFields) -> Self {
        Self { tracked }
    }

    pub fn tracked(&self) -> &TrackedFields {
        &self.tracked
    }

    pub fn analyze<'a, I>(&self, records: I) -> CoverageReport
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let records: Vec<&Value> = records.into_iter().collect();
        let total = records.len();

        let mut leaves: BTreeMap<FieldPath, LeafUsage> = BTreeMap::new();
        for record in &records {
            for (path, value) in record::leaf_paths(record) {
                let usage = leaves.entry(path).or_default();
                if value.is_null() {
                    continue;
                }
                usage.present += 1;
                if record::is_empty(Some(value)) {
                    usage.empty += 1;
                }
            }
        }

        let mut groups = Vec::with_capacity(self.tracked.groups().len());
        let mut band_summary = BTreeMap::new();
        let (mut populated_sum, mut total_sum) = (0usize, 0usize);

        for group in self.tracked.groups() {
            let mut fields = Vec::with_capacity(group.fields.len());
            for path in &group.fields {
                let populated = records
                    .iter()
                    .filter(|record| !record::is_field_empty(record, path))
                    .count();
                let percentage = percentage_of(populated, total);
                let band = CoverageBand::from_percentage(percentage);
                *band_summary.entry(band).or_insert(0) += 1;
                populated_sum += populated;
                total_sum += total;
                fields.push(FieldCoverage {
                    path: path.clone(),
                    group: group.name.clone(),
                    populated,
                    empty: total - populated,
                    total,
                    percentage,
                    band,
                });
            }
            groups.push(GroupCoverage {
                name: group.name.clone(),
                fields,
            });
        }

        let orphaned_fields: Vec<FieldPath> = leaves
            .keys()
            .filter(|path| !self.tracked.covers(path))
            .cloned()
            .collect();

        let missing_fields: Vec<FieldPath> = self
            .tracked
            .paths()
            .into_iter()
            .filter(|path| records.iter().all(|record| record::get(record, path).is_none()))
            .cloned()
            .collect();

        let mut enrichment_candidates: Vec<FieldCoverage> = groups
            .iter()
            .flat_map(|group| group.fields.iter())
            .filter(|coverage| coverage.percentage < ENRICHMENT_THRESHOLD)
            .cloned()
            .collect();
        enrichment_candidates.sort_by(|a, b| {
            a.percentage
                .total_cmp(&b.percentage)
                .then_with(|| a.path.cmp(&b.path))
        });
        enrichment_candidates.dedup_by(|a, b| a.path == b.path);

        CoverageReport {
            records: total,
            groups,
            overall_percentage: percentage_of(populated_sum, total_sum),
            band_summary,
            orphaned_fields,
            missing_fields,
            enrichment_candidates,
            removal_candidates: removal_candidates(&leaves),
            redundant_variants: redundant_variants(&leaves),
        }
    }
}

fn removal_candidates(leaves: &BTreeMap<FieldPath, LeafUsage>) -> Vec<RemovalCandidate> {
    let mut candidates: Vec<RemovalCandidate> = leaves
        .iter()
        .filter(|(_, usage)| usage.present > 0)
        .map(|(path, usage)| RemovalCandidate {
            path: path.clone(),
            empty: usage.empty,
            present: usage.present,
            empty_percentage: percentage_of(usage.empty, usage.present),
        })
        .filter(|candidate| candidate.empty_percentage > REMOVAL_EMPTY_THRESHOLD)
        .collect();
    candidates.sort_by(|a, b| {
        b.empty_percentage
            .total_cmp(&a.empty_percentage)
            .then_with(|| a.path.cmp(&b.path))
    });
    candidates
}

fn redundant_variants(leaves: &BTreeMap<FieldPath, LeafUsage>) -> Vec<RedundantVariants> {
    let mut by_base: BTreeMap<String, Vec<VariantUsage>> = BTreeMap::new();
    for (path, usage) in leaves {
        if usage.present == 0 {
            continue;
        }
        by_base.entry(variant_base(path)).or_default().push(VariantUsage {
            path: path.clone(),
            usage: usage.present,
        });
    }

    by_base
        .into_iter()
        .filter(|(_, variants)| variants.len() > 1)
        .filter_map(|(base, mut variants)| {
            variants.sort_by(|a, b| b.usage.cmp(&a.usage).then_with(|| a.path.cmp(&b.path)));
            let recommended = variants.first()?.path.clone();
            Some(RedundantVariants {
                base,
                variants,
                recommended,
            })
        })
        .collect()
}

/// `path` with any `_parsed`/`_chips` suffix stripped from each segment
fn variant_base(path: &FieldPath) -> String {
    path.segments()
        .map(|segment| {
            VARIANT_SUFFIXES
                .iter()
                .find_map(|suffix| segment.strip_suffix(suffix))
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn percentage_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

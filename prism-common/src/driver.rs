//! Batch mutation driver
//!
//! Walks a [`RecordStore`] record by record, applies an [`EnrichmentPlan`] and
//! saves a record only when something in it changed. Enrichers never touch a
//! populated field except to canonicalize, lowercase or prune it, and each of
//! those is a fixed point, so a second run over the same corpus saves nothing.
//!
//! A record that fails to load or save is logged and counted; the run carries on.

use crate::canonicalize::{lowercase_value, TraitCanonicalizer, TraitChangeLog, PRIMARY_TRAITS, TRAIT_FIELDS};
use crate::corpus::RecordStore;
use crate::inference::{InferenceEngine, RuleSet};
use crate::record::{self, FieldPath};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, info};

/// Derived `_parsed` / `_chips` copies pruned by the `prune` plan
const REDUNDANT_FIELDS: &[&str] = &[
    "communication_style.tone_parsed",
    "communication_style.sentence_structure_parsed",
    "values.core_values_parsed",
    "bias_awareness.primary_biases_chips",
    "bias_awareness.bias_mitigation_strategies_chips",
    "bias_awareness.decision_making_style_chips",
    "growth_motivation.learning_orientation_chips",
    "growth_motivation.intrinsic_drivers_chips",
    "growth_motivation.challenge_seeking_chips",
    "cognitive_humanism.human_centered_thinking_chips",
    "cognitive_humanism.empathy_expression_chips",
    "cognitive_humanism.ethical_framework_chips",
    "behavioral_patterns.work_style_parsed",
    "behavioral_patterns.problem_solving_approach_parsed",
    "temporal_context.career_evolution_parsed",
    "temporal_context.influence_timeline_parsed",
    "temporal_context.legacy_impact_parsed",
    "collaboration.leadership_style_parsed",
    "collaboration.team_dynamics_parsed",
    "collaboration.mentorship_approach_parsed",
    "communication.audience_adaptation_parsed",
    "cultural_context.cultural_background_parsed",
    "practical_application.decision_speed_parsed",
    "learning.learning_style_parsed",
    "self_actualization_indicators.peak_experiences_chips",
    "self_actualization_indicators.autonomy_expression_chips",
    "self_actualization_indicators.purpose_alignment_chips",
    "behavioral_growth.adaptation_patterns_chips",
    "behavioral_growth.resilience_indicators_chips",
    "behavioral_growth.feedback_integration_chips",
    "human_needs_hierarchy.belonging_expression_chips",
    "human_needs_hierarchy.esteem_sources_chips",
    "humanistic_cognition.creative_problem_solving_chips",
    "humanistic_cognition.holistic_perspective_chips",
    "humanistic_cognition.collaborative_intelligence_chips",
    "trait_constellations.constellations",
];

/// Constellations whose `name`/`traits` detail leaves are pruned
const CONSTELLATIONS: &[&str] = &[
    "analytical_thinking",
    "collaboration_mode",
    "communication_style",
    "creative_expression",
    "emotional_intelligence",
    "growth_learning",
    "impact_legacy",
    "innovation_drive",
    "intellectual_depth",
    "leadership_approach",
    "practical_execution",
    "values_ethics",
];

/// One field operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enricher {
    /// Fill an empty field from its rule table
    Infer(FieldPath),
    /// Rewrite a populated trait list in canonical form
    Canonicalize(FieldPath),
    /// Lowercase a populated free-text field
    Lowercase(FieldPath),
    /// Delete a field if present
    Remove(FieldPath),
}

impl Enricher {
    pub fn target(&self) -> &FieldPath {
        match self {
            Enricher::Infer(path)
            | Enricher::Canonicalize(path)
            | Enricher::Lowercase(path)
            | Enricher::Remove(path) => path,
        }
    }

    fn kind(&self) -> ChangeKind {
        match self {
            Enricher::Infer(_) => ChangeKind::Inferred,
            Enricher::Canonicalize(_) => ChangeKind::Canonicalized,
            Enricher::Lowercase(_) => ChangeKind::Lowercased,
            Enricher::Remove(_) => ChangeKind::Removed,
        }
    }
}

/// Named, ordered list of enrichers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentPlan {
    name: String,
    enrichers: Vec<Enricher>,
}

impl EnrichmentPlan {
    /// Preset names accepted by [`EnrichmentPlan::preset`]
    pub const PRESETS: [&'static str; 7] =
        ["tier1", "tier2", "gaps", "advanced", "traits", "prune", "all"];

    pub fn new(name: impl Into<String>, enrichers: Vec<Enricher>) -> Self {
        Self {
            name: name.into(),
            enrichers,
        }
    }

    /// Infer every field of a rule set
    pub fn inference(set: RuleSet) -> Result<Self> {
        let enrichers = set
            .specs()?
            .iter()
            .map(|spec| Enricher::Infer(spec.target().clone()))
            .collect();
        Ok(Self::new(set.as_str(), enrichers))
    }

    /// Canonicalize primary traits, lowercase the other trait-like fields
    pub fn traits() -> Self {
        let mut enrichers = vec![Enricher::Canonicalize(FieldPath::literal(PRIMARY_TRAITS))];
        enrichers.extend(
            TRAIT_FIELDS
                .iter()
                .filter(|field| **field != PRIMARY_TRAITS)
                .map(|field| Enricher::Lowercase(FieldPath::literal(field))),
        );
        Self::new("traits", enrichers)
    }

    /// Remove redundant derived fields and trait constellation details
    pub fn prune() -> Self {
        let mut enrichers: Vec<Enricher> = REDUNDANT_FIELDS
            .iter()
            .map(|field| Enricher::Remove(FieldPath::literal(field)))
            .collect();
        for constellation in CONSTELLATIONS {
            for leaf in ["name", "traits"] {
                enrichers.push(Enricher::Remove(FieldPath::literal(&format!(
                    "trait_constellations.constellation_details.{}.{}",
                    constellation, leaf
                ))));
            }
        }
        Self::new("prune", enrichers)
    }

    /// Every inference set, then trait standardization (pruning stays opt-in)
    pub fn all() -> Result<Self> {
        let mut plans = Vec::new();
        for set in RuleSet::ALL {
            plans.push(Self::inference(set)?);
        }
        plans.push(Self::traits());
        Ok(Self::combine("all", plans))
    }

    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "traits" => Ok(Self::traits()),
            "prune" => Ok(Self::prune()),
            "all" => Self::all(),
            other => match other.parse::<RuleSet>() {
                Ok(set) => Self::inference(set),
                Err(_) => Err(Error::InvalidInput(format!(
                    "unknown plan '{}' (expected one of {})",
                    name,
                    Self::PRESETS.join(", ")
                ))),
            },
        }
    }

    /// Concatenate plans, keeping the first of any repeated enricher
    pub fn combine(name: impl Into<String>, plans: Vec<EnrichmentPlan>) -> Self {
        let mut enrichers: Vec<Enricher> = Vec::new();
        for enricher in plans.into_iter().flat_map(|plan| plan.enrichers) {
            if !enrichers.contains(&enricher) {
                enrichers.push(enricher);
            }
        }
        Self::new(name, enrichers)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enrichers(&self) -> &[Enricher] {
        &self.enrichers
    }

    pub fn len(&self) -> usize {
        self.enrichers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrichers.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Inferred,
    Canonicalized,
    Lowercased,
    Removed,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ChangeKind::Inferred => "inferred",
            ChangeKind::Canonicalized => "canonicalized",
            ChangeKind::Lowercased => "lowercased",
            ChangeKind::Removed => "removed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub path: FieldPath,
    pub kind: ChangeKind,
}

/// Fields changed in one record, in enricher order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    fn push(&mut self, path: &FieldPath, kind: ChangeKind) {
        self.changes.push(FieldChange {
            path: path.clone(),
            kind,
        });
    }

    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.changes.iter().any(|change| &change.path == path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub id: String,
    pub reason: String,
}

/// Outcome of one driver pass
///
/// `processed == modified + unchanged + failed.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub plan: String,
    pub dry_run: bool,
    pub processed: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub failed: Vec<RecordFailure>,
    /// Records changed per field
    pub field_changes: BTreeMap<FieldPath, usize>,
    pub trait_changes: TraitChangeLog,
}

impl BatchSummary {
    fn fail(&mut self, id: &str, err: &Error) {
        self.failed.push(RecordFailure {
            id: id.to_string(),
            reason: err.to_string(),
        });
    }
}

/// Applies an [`EnrichmentPlan`] to every record in a store
#[derive(Debug, Clone)]
pub struct BatchDriver {
    engine: InferenceEngine,
    canonicalizer: TraitCanonicalizer,
    plan: EnrichmentPlan,
    dry_run: bool,
}

impl BatchDriver {
    pub fn new(engine: InferenceEngine, canonicalizer: TraitCanonicalizer, plan: EnrichmentPlan) -> Self {
        Self {
            engine,
            canonicalizer,
            plan,
            dry_run: false,
        }
    }

    /// Compute changes without saving anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn plan(&self) -> &EnrichmentPlan {
        &self.plan
    }

    /// Apply the plan to one record in place
    ///
    /// Trait rewrites are added to `log` only for fields actually written.
    pub fn enrich_record(&self, record: &mut Value, log: &mut TraitChangeLog) -> ChangeSet {
        let mut changes = ChangeSet::default();

        for enricher in self.plan.enrichers() {
            let path = enricher.target();
            let current = record::get(record, path);

            let replacement = match enricher {
                Enricher::Infer(_) => {
                    if !record::is_empty(current) {
                        continue;
                    }
                    match self.engine.infer(record, path) {
                        Some(value) => Some(value),
                        None => {
                            debug!("No rule table for {}, skipping", path);
                            None
                        }
                    }
                }
                Enricher::Canonicalize(_) => {
                    if record::is_empty(current) {
                        continue;
                    }
                    let mut field_log = TraitChangeLog::default();
                    // rewrites never leave a populated field empty
                    let canonical = current
                        .and_then(|value| self.canonicalizer.canonicalize_value(value, &mut field_log))
                        .filter(|value| !record::is_empty(Some(value)));
                    if canonical.is_some() && canonical.as_ref() != current {
                        log.merge(&field_log);
                    }
                    canonical
                }
                Enricher::Lowercase(_) => {
                    if record::is_empty(current) {
                        continue;
                    }
                    current
                        .and_then(lowercase_value)
                        .filter(|value| !record::is_empty(Some(value)))
                }
                Enricher::Remove(_) => {
                    if record::remove(record, path).is_some() {
                        changes.push(path, enricher.kind());
                    }
                    continue;
                }
            };

            if let Some(value) = replacement {
                if record::get(record, path) != Some(&value) {
                    record::set(record, path, value);
                    changes.push(path, enricher.kind());
                }
            }
        }

        changes
    }

    /// Enrich every record in `store`
    ///
    /// Only a failure to enumerate the store is an error; per-record failures are
    /// collected in the summary.
    pub fn run<S: RecordStore + ?Sized>(&self, store: &mut S) -> Result<BatchSummary> {
        let ids = store.list()?;
        info!(
            "Running plan '{}' ({} enrichers) over {} records{}",
            self.plan.name(),
            self.plan.len(),
            ids.len(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let mut summary = BatchSummary {
            plan: self.plan.name().to_string(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        for id in ids {
            summary.processed += 1;

            let mut record = match store.load(&id) {
                Ok(record) => record,
                Err(e) => {
                    error!("Failed to load {}: {}", id, e);
                    summary.fail(&id, &e);
                    continue;
                }
            };

            let mut log = TraitChangeLog::default();
            let changes = self.enrich_record(&mut record, &mut log);
            if changes.is_empty() {
                summary.unchanged += 1;
                continue;
            }

            if !self.dry_run {
                if let Err(e) = store.save(&id, &record) {
                    error!("Failed to save {}: {}", id, e);
                    summary.fail(&id, &e);
                    continue;
                }
            }

            info!(
                "{}: {} field(s) updated",
                record::display_name(&record, &id),
                changes.len()
            );
            for change in changes.changes() {
                debug!("  {} {}", change.kind, change.path);
                *summary.field_changes.entry(change.path.clone()).or_insert(0) += 1;
            }
            summary.trait_changes.merge(&log);
            summary.modified += 1;
        }

        info!(
            "Plan '{}' done: {} modified, {} unchanged, {} failed",
            summary.plan,
            summary.modified,
            summary.unchanged,
            summary.failed.len()
        );
        Ok(summary)
    }
}

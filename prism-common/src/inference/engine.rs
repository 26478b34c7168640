//! Inference engine
//!
//! Holds an immutable set of [`FieldSpec`]s keyed by target path. The engine is
//! built once (from the catalog or injected specs), optionally has defaults
//! overridden from configuration, and is then only read.

use super::catalog::RuleSet;
use super::spec::{FieldSpec, Inference, Resolution};
use crate::record::FieldPath;
use crate::{Error, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Rule-table driven value inference
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    specs: Vec<FieldSpec>,
    index: HashMap<FieldPath, usize>,
}

impl InferenceEngine {
    /// Build from field specs; duplicate target paths are rejected
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            if index.insert(spec.target().clone(), position).is_some() {
                return Err(Error::Config(format!(
                    "field '{}' has more than one rule table",
                    spec.target()
                )));
            }
        }
        Ok(Self { specs, index })
    }

    /// Engine over every built-in rule set
    pub fn with_catalog() -> Result<Self> {
        let mut specs = Vec::new();
        for set in RuleSet::ALL {
            specs.extend(set.specs()?);
        }
        Self::new(specs)
    }

    /// Replace field defaults (target path → value)
    ///
    /// Unknown targets and categorical values outside the vocabulary are
    /// configuration errors.
    pub fn with_default_overrides(mut self, overrides: &BTreeMap<String, String>) -> Result<Self> {
        for (raw_target, value) in overrides {
            let target = FieldPath::parse(raw_target)?;
            let position = *self.index.get(&target).ok_or_else(|| {
                Error::Config(format!(
                    "default override for unknown field '{}'",
                    raw_target
                ))
            })?;
            let spec = self.specs[position].clone().with_default(value)?;
            debug!("Default for {} overridden with '{}'", target, value);
            self.specs[position] = spec;
        }
        Ok(self)
    }

    /// Inferred value for `target`, or `None` if no rule table covers it
    pub fn infer(&self, record: &Value, target: &FieldPath) -> Option<Value> {
        self.explain(record, target).map(|inference| inference.value)
    }

    /// Inferred value plus the rules that produced it
    pub fn explain(&self, record: &Value, target: &FieldPath) -> Option<Inference> {
        let spec = self.spec(target)?;
        let inference = spec.evaluate(record);
        match &inference.resolution {
            Resolution::Matched(rules) => {
                debug!("{}: rules {:?} matched", target, rules)
            }
            Resolution::Defaulted => debug!("{}: no rule matched, using default", target),
        }
        Some(inference)
    }

    pub fn spec(&self, target: &FieldPath) -> Option<&FieldSpec> {
        self.index.get(target).map(|&position| &self.specs[position])
    }

    /// Target paths in registration order
    pub fn targets(&self) -> impl Iterator<Item = &FieldPath> {
        self.specs.iter().map(FieldSpec::target)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

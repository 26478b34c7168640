//! Categorical inference
//!
//! Derives missing field values from keyword signals found in other fields.
//! Evaluation is deterministic: rules run in table order, the first match (or
//! every match, for multi-value fields) decides, and a field with no matching rule
//! falls back to its default. Inference never fails and never mutates the record.

pub mod catalog;
pub mod engine;
pub mod rule;
pub mod spec;

pub use catalog::RuleSet;
pub use engine::InferenceEngine;
pub use rule::{Condition, Outcome, Rule};
pub use spec::{FieldKind, FieldSpec, FieldSpecBuilder, Inference, Resolution};

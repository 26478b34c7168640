//! Built-in rule tables
//!
//! Each module is pure data: an ordered list of field specs written with the rule
//! constructors from [`crate::inference::rule`]. Tables are grouped into rule sets
//! that the batch driver can run independently.

pub mod advanced;
pub mod gaps;
pub mod tier1;
pub mod tier2;

use super::FieldSpec;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named group of rule tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSet {
    /// Technology relationship, crisis response, influence style
    Tier1,
    /// Resource relationship, time orientation, collaboration enhancement
    Tier2,
    /// High-value top-level fields (era, nationality, legacy, ...)
    Gaps,
    /// Multi-value behavioural, learning and values fields
    Advanced,
}

impl RuleSet {
    pub const ALL: [RuleSet; 4] = [
        RuleSet::Tier1,
        RuleSet::Tier2,
        RuleSet::Gaps,
        RuleSet::Advanced,
    ];

    /// Build this set's field specs
    pub fn specs(self) -> Result<Vec<FieldSpec>> {
        match self {
            RuleSet::Tier1 => tier1::specs(),
            RuleSet::Tier2 => tier2::specs(),
            RuleSet::Gaps => gaps::specs(),
            RuleSet::Advanced => advanced::specs(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleSet::Tier1 => "tier1",
            RuleSet::Tier2 => "tier2",
            RuleSet::Gaps => "gaps",
            RuleSet::Advanced => "advanced",
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RuleSet::ALL
            .into_iter()
            .find(|set| set.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("unknown rule set '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::spec::FieldKind;
    use std::collections::HashSet;

    #[test]
    fn test_all_sets_build() {
        for set in RuleSet::ALL {
            let specs = set.specs().unwrap();
            assert!(!specs.is_empty(), "{} is empty", set);
        }
    }

    #[test]
    fn test_targets_unique_across_sets() {
        let mut seen = HashSet::new();
        for set in RuleSet::ALL {
            for spec in set.specs().unwrap() {
                assert!(seen.insert(spec.target().clone()), "duplicate {}", spec.target());
            }
        }
        assert_eq!(seen.len(), 15 + 15 + 8 + 13);
    }

    #[test]
    fn test_categorical_defaults_in_vocabulary() {
        for set in RuleSet::ALL {
            for spec in set.specs().unwrap() {
                if let FieldKind::Categorical { vocabulary, default } = spec.kind() {
                    assert!(vocabulary.contains(default), "{}", spec.target());
                }
            }
        }
    }

    #[test]
    fn test_parse_rule_set() {
        assert_eq!("Tier1".parse::<RuleSet>().unwrap(), RuleSet::Tier1);
        assert_eq!(" gaps ".parse::<RuleSet>().unwrap(), RuleSet::Gaps);
        assert!("tier3".parse::<RuleSet>().is_err());
    }
}

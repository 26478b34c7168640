//! Tier 2: resource relationship, time orientation, collaboration enhancement

use crate::inference::rule::{all, not, signal, within};
use crate::inference::FieldSpec;
use crate::Result;

const DOMAIN: &str = "domain";
const ARCHETYPE: &str = "archetype";
const CORE_VALUES: &str = "values.core_values";
const TRAITS: &str = "psychological_profile.primary_traits";
const TONE: &str = "communication_style.tone";
const RISK_TOLERANCE: &str = "practical_application.risk_tolerance";
const DECISION_SPEED: &str = "practical_application.decision_speed";
const CONFLICT_RESOLUTION: &str = "collaboration.conflict_resolution";
const MENTORSHIP: &str = "collaboration.mentorship_approach";
const LEADERSHIP: &str = "collaboration.leadership_style";

pub fn specs() -> Result<Vec<FieldSpec>> {
    let mut specs = resource_relationship()?;
    specs.extend(time_orientation()?);
    specs.extend(collaboration_enhancement()?);
    Ok(specs)
}

fn values(keywords: &[&str]) -> crate::inference::Condition {
    within(&[CORE_VALUES], keywords)
}

fn resource_relationship() -> Result<Vec<FieldSpec>> {
    let moralist = signal(&["philosophy", "ethics", "activist", "social justice"]);
    let commercial = signal(&["entrepreneur", "investor", "business", "ceo"]);

    Ok(vec![
        FieldSpec::categorical("resource_relationship.wealth_perspective")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&[
                "tool for impact",
                "security need",
                "status symbol",
                "corrupting force",
            ])
            .when(
                all(vec![
                    moralist.clone(),
                    values(&["altruism", "poverty", "justice", "equality"]),
                ]),
                "tool for impact",
            )
            .when(moralist, "corrupting force")
            .when(
                all(vec![commercial.clone(), values(&["impact", "innovation", "change"])]),
                "tool for impact",
            )
            .when(commercial, "status symbol")
            .when(
                signal(&["artist", "musician", "writer", "creative"]),
                "corrupting force",
            )
            .when(
                signal(&["academic", "researcher", "professor", "scientist"]),
                "security need",
            )
            .default("tool for impact")
            .build()?,
        FieldSpec::categorical("resource_relationship.resource_allocation_priority")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&[
                "long-term investment",
                "immediate needs",
                "experimentation",
                "conservation",
            ])
            .when(
                signal(&["tech", "startup", "innovation", "entrepreneur"]),
                "experimentation",
            )
            .when(
                signal(&["investor", "strategy", "visionary"]),
                "long-term investment",
            )
            .when(
                signal(&["activist", "humanitarian", "poverty", "relief"]),
                "immediate needs",
            )
            .when(
                signal(&["traditional", "classical", "preservation"]),
                "conservation",
            )
            .default("long-term investment")
            .build()?,
        FieldSpec::categorical("resource_relationship.generosity_pattern")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&[
                "proactive giver",
                "strategic philanthropist",
                "reciprocal",
                "protective",
            ])
            .when(
                all(vec![
                    values(&["altruism", "giving", "charity", "poverty"]),
                    values(&["effective"]),
                ]),
                "strategic philanthropist",
            )
            .when(
                values(&["altruism", "giving", "charity", "poverty"]),
                "proactive giver",
            )
            .when(
                signal(&["entrepreneur", "ceo", "business", "investor"]),
                "strategic philanthropist",
            )
            .when(signal(&["traditional", "conservative"]), "protective")
            .default("reciprocal")
            .build()?,
        FieldSpec::categorical("resource_relationship.financial_risk_appetite")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&[
                "high risk tolerance",
                "calculated risks",
                "risk-averse",
                "minimizes exposure",
            ])
            .when(within(&[RISK_TOLERANCE], &["high", "bold"]), "high risk tolerance")
            .when(
                within(&[RISK_TOLERANCE], &["calculated", "strategic"]),
                "calculated risks",
            )
            .when(
                within(&[RISK_TOLERANCE], &["averse", "conservative"]),
                "risk-averse",
            )
            .when(
                signal(&["entrepreneur", "startup", "innovation", "disrupt"]),
                "high risk tolerance",
            )
            .when(
                signal(&["business", "strategy", "executive"]),
                "calculated risks",
            )
            .when(
                signal(&["academic", "researcher", "traditional", "classical"]),
                "risk-averse",
            )
            .default("calculated risks")
            .build()?,
        FieldSpec::categorical("resource_relationship.resource_transparency")
            .sources(&[DOMAIN])
            .vocabulary(&[
                "fully transparent",
                "selective disclosure",
                "private",
                "secretive",
            ])
            .when(
                values(&["transparency", "openness", "accountability", "altruism"]),
                "fully transparent",
            )
            .when(signal(&["activist"]), "fully transparent")
            .when(
                signal(&["business", "entertainment", "celebrity"]),
                "private",
            )
            .default("selective disclosure")
            .build()?,
    ])
}

fn time_orientation() -> Result<Vec<FieldSpec>> {
    let long_view = signal(&["philosophy", "futurist", "visionary"]);

    Ok(vec![
        FieldSpec::categorical("time_orientation.time_horizon")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&[
                "quarterly",
                "annual",
                "decade",
                "generational",
                "civilizational",
            ])
            .when(
                all(vec![
                    long_view.clone(),
                    values(&["humanity", "civilization", "future"]),
                ]),
                "civilizational",
            )
            .when(long_view, "generational")
            .when(
                signal(&["environment", "climate", "sustainability"]),
                "generational",
            )
            .when(signal(&["investor", "strategy", "planning"]), "decade")
            .when(signal(&["ceo", "executive", "public company"]), "annual")
            .when(signal(&["startup"]), "quarterly")
            .default("decade")
            .build()?,
        FieldSpec::categorical("time_orientation.legacy_concern")
            .sources(&[DOMAIN])
            .vocabulary(&[
                "indifferent",
                "concerned with reputation",
                "focused on impact",
                "obsessed with immortality",
            ])
            .when(
                within(&[ARCHETYPE], &["visionary", "pioneer", "revolutionary"]),
                "obsessed with immortality",
            )
            .when(
                values(&["impact", "change", "justice", "altruism"]),
                "focused on impact",
            )
            .when(
                signal(&["entertainment", "politics", "media", "celebrity"]),
                "concerned with reputation",
            )
            .default("focused on impact")
            .build()?,
        FieldSpec::categorical("time_orientation.present_vs_future_balance")
            .sources(&[DOMAIN])
            .vocabulary(&[
                "live for today",
                "balanced",
                "sacrifice present for future",
                "haunted by past",
            ])
            .when(
                within(&[ARCHETYPE], &["visionary", "futurist", "pioneer"]),
                "sacrifice present for future",
            )
            .when(
                signal(&["artist", "musician", "entertainment", "performer"]),
                "live for today",
            )
            .when(
                signal(&["history", "preservation", "classical"]),
                "haunted by past",
            )
            .default("balanced")
            .build()?,
        FieldSpec::categorical("time_orientation.intergenerational_thinking")
            .sources(&[DOMAIN])
            .vocabulary(&[
                "self-focused",
                "children's generation",
                "multi-generational",
                "species-level",
            ])
            .when(
                values(&["humanity", "existential", "civilization", "species"]),
                "species-level",
            )
            .when(
                signal(&["environment", "sustainability", "climate"]),
                "multi-generational",
            )
            .when(
                signal(&["education", "parenting", "youth"]),
                "children's generation",
            )
            .when(
                signal(&["entertainment", "sports", "fashion"]),
                "self-focused",
            )
            .default("multi-generational")
            .build()?,
        FieldSpec::categorical("time_orientation.urgency_vs_patience")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&[
                "impatient",
                "strategic urgency",
                "patient",
                "overly patient",
            ])
            .when(
                within(&[DECISION_SPEED], &["fast", "quick", "immediate"]),
                "impatient",
            )
            .when(within(&[DECISION_SPEED], &["deliberate", "patient"]), "patient")
            .when(signal(&["entrepreneur", "startup"]), "strategic urgency")
            .when(
                within(&[DOMAIN], &["research", "academic", "science"]),
                "patient",
            )
            .when(
                signal(&["business", "strategy", "executive"]),
                "strategic urgency",
            )
            .default("strategic urgency")
            .build()?,
    ])
}

fn collaboration_enhancement() -> Result<Vec<FieldSpec>> {
    let conflict = |keywords: &[&str]| within(&[CONFLICT_RESOLUTION], keywords);

    Ok(vec![
        FieldSpec::categorical("collaboration_enhancement.conflict_resolution_style")
            .sources(&[TRAITS])
            .vocabulary(&["confrontational", "mediating", "avoidant", "diplomatic"])
            .when(conflict(&["direct", "confrontational"]), "confrontational")
            .when(conflict(&["diplomatic", "careful"]), "diplomatic")
            .when(conflict(&["mediat", "facilitat"]), "mediating")
            .when(conflict(&["avoid"]), "avoidant")
            .when(
                signal(&["demanding", "blunt", "aggressive", "abrasive"]),
                "confrontational",
            )
            .when(
                signal(&["empathetic", "compassionate", "facilitator"]),
                "mediating",
            )
            .when(signal(&["diplomatic", "political", "strategic"]), "diplomatic")
            .when(signal(&["withdrawn", "introverted", "shy"]), "avoidant")
            .default("diplomatic")
            .build()?,
        FieldSpec::categorical("collaboration_enhancement.credit_sharing_behavior")
            .sources(&[TRAITS])
            .vocabulary(&[
                "generous attribution",
                "balanced",
                "credit-seeking",
                "self-effacing",
            ])
            .when(
                signal(&["egotistical", "narcissistic", "demanding", "dominant"]),
                "credit-seeking",
            )
            .when(
                signal(&[
                    "humble",
                    "servant",
                    "selfless",
                    "altruistic",
                    "collaborative",
                    "team",
                    "facilitator",
                ]),
                "generous attribution",
            )
            .default("balanced")
            .build()?,
        FieldSpec::categorical("collaboration_enhancement.mentorship_inclination")
            .sources(&[MENTORSHIP])
            .vocabulary(&[
                "natural mentor",
                "selective mentor",
                "reciprocal only",
                "lone wolf",
            ])
            .when(signal(&["active", "natural"]), "natural mentor")
            .when(signal(&["selective", "chosen"]), "selective mentor")
            .when(signal(&["lone", "independent"]), "lone wolf")
            .when(
                within(&[DOMAIN], &["education", "teaching", "professor", "academic"]),
                "natural mentor",
            )
            .when(
                all(vec![
                    within(&[DOMAIN], &["artist", "writer"]),
                    not(within(&[TRAITS], &["collaborative"])),
                ]),
                "lone wolf",
            )
            .when(
                within(&[DOMAIN], &["executive", "ceo", "leader"]),
                "selective mentor",
            )
            .default("natural mentor")
            .build()?,
        FieldSpec::categorical("collaboration_enhancement.feedback_style")
            .sources(&[TRAITS, TONE])
            .vocabulary(&[
                "direct and immediate",
                "constructive and structured",
                "gentle and encouraging",
                "avoids giving feedback",
            ])
            .when(
                signal(&["blunt", "direct", "demanding", "harsh", "confrontational"]),
                "direct and immediate",
            )
            .when(
                signal(&["empathetic", "supportive", "compassionate", "gentle"]),
                "gentle and encouraging",
            )
            .when(
                within(&[TRAITS], &["analytical", "systematic", "methodical", "structured"]),
                "constructive and structured",
            )
            .when(
                within(&[TRAITS], &["avoidant", "withdrawn", "shy"]),
                "avoids giving feedback",
            )
            .default("constructive and structured")
            .build()?,
        FieldSpec::categorical("collaboration_enhancement.delegation_approach")
            .sources(&[TRAITS, LEADERSHIP])
            .vocabulary(&[
                "empowers fully",
                "structured delegation",
                "micromanages",
                "reluctant to delegate",
            ])
            .when(
                signal(&["perfectionist", "controlling", "demanding", "micromanag"]),
                "micromanages",
            )
            .when(
                within(&[LEADERSHIP], &["empowering", "autonomy", "trust"]),
                "empowers fully",
            )
            .when(
                within(&[TRAITS], &["lone", "independent", "solo"]),
                "reluctant to delegate",
            )
            .default("structured delegation")
            .build()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferenceEngine;
    use crate::record::FieldPath;
    use serde_json::{json, Value};

    fn infer(record: &Value, target: &str) -> Value {
        let engine = InferenceEngine::new(specs().unwrap()).unwrap();
        engine
            .infer(record, &FieldPath::parse(target).unwrap())
            .unwrap()
    }

    #[test]
    fn test_fifteen_fields() {
        assert_eq!(specs().unwrap().len(), 15);
    }

    #[test]
    fn test_explicit_risk_tolerance_outranks_domain() {
        let record = json!({
            "domain": "Entrepreneurship",
            "practical_application": { "risk_tolerance": "Conservative, prefers safety" }
        });
        assert_eq!(
            infer(&record, "resource_relationship.financial_risk_appetite"),
            json!("risk-averse")
        );
        assert_eq!(
            infer(&json!({}), "resource_relationship.financial_risk_appetite"),
            json!("calculated risks")
        );
    }

    #[test]
    fn test_nested_value_conditions() {
        let activist = json!({
            "domain": "Social Justice",
            "values": { "core_values": ["Equality", "Dignity"] }
        });
        assert_eq!(
            infer(&activist, "resource_relationship.wealth_perspective"),
            json!("tool for impact")
        );

        let ethicist = json!({ "domain": "Ethics" });
        assert_eq!(
            infer(&ethicist, "resource_relationship.wealth_perspective"),
            json!("corrupting force")
        );

        let giver = json!({ "values": { "core_values": "effective altruism" } });
        assert_eq!(
            infer(&giver, "resource_relationship.generosity_pattern"),
            json!("strategic philanthropist")
        );
    }

    #[test]
    fn test_time_horizon() {
        let futurist = json!({
            "archetype": "Futurist",
            "values": { "core_values": ["future of humanity"] }
        });
        assert_eq!(infer(&futurist, "time_orientation.time_horizon"), json!("civilizational"));
        assert_eq!(
            infer(&json!({ "domain": "Startup Founder" }), "time_orientation.time_horizon"),
            json!("quarterly")
        );
        assert_eq!(
            infer(&json!({}), "time_orientation.present_vs_future_balance"),
            json!("balanced")
        );
    }

    #[test]
    fn test_lone_wolf_requires_non_collaborative_artist() {
        let target = "collaboration_enhancement.mentorship_inclination";
        let solo = json!({ "domain": "Writer" });
        let team = json!({
            "domain": "Writer",
            "psychological_profile": { "primary_traits": ["Collaborative"] }
        });
        assert_eq!(infer(&solo, target), json!("lone wolf"));
        assert_eq!(infer(&team, target), json!("natural mentor"));
    }

    #[test]
    fn test_conflict_resolution_field_outranks_traits() {
        let record = json!({
            "collaboration": { "conflict_resolution": "Mediates between parties" },
            "psychological_profile": { "primary_traits": ["Blunt"] }
        });
        assert_eq!(
            infer(&record, "collaboration_enhancement.conflict_resolution_style"),
            json!("mediating")
        );
    }
}

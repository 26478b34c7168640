//! Tier 1: technology relationship, crisis response, influence style

use crate::inference::rule::{born_before, born_from, signal, within};
use crate::inference::FieldSpec;
use crate::Result;

const DOMAIN: &str = "domain";
const ARCHETYPE: &str = "archetype";
const OCCUPATION: &str = "occupation";
const TRAITS: &str = "psychological_profile.primary_traits";
const TONE: &str = "communication_style.tone";
const SENTENCES: &str = "communication_style.sentence_structure";

pub fn specs() -> Result<Vec<FieldSpec>> {
    Ok(vec![
        // technology_relationship
        FieldSpec::categorical("technology_relationship.technology_adoption")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&["early adopter", "pragmatic", "skeptical", "resistant"])
            .when(
                signal(&["tech", "digital", "software", "entrepreneur", "innovation"]),
                "early adopter",
            )
            .when(born_from(1980), "early adopter")
            .when(signal(&["business", "strategy", "modern"]), "pragmatic")
            .when(
                signal(&["philosophy", "classical", "historical", "traditional"]),
                "skeptical",
            )
            .default("pragmatic")
            .build()?,
        FieldSpec::categorical("technology_relationship.digital_fluency")
            .sources(&[DOMAIN])
            .vocabulary(&["native", "proficient", "basic", "analog-preferring"])
            .when(born_from(1980), "native")
            .when(born_from(1960), "proficient")
            .when(born_from(1940), "basic")
            .when(born_before(1940), "analog-preferring")
            .when(signal(&["tech", "digital"]), "native")
            .default("proficient")
            .build()?,
        FieldSpec::categorical("technology_relationship.ai_perspective")
            .sources(&[DOMAIN, ARCHETYPE])
            .vocabulary(&["enthusiast", "cautious optimist", "concerned", "opposed"])
            .when(within(&[DOMAIN], &["tech", "ai", "computer"]), "enthusiast")
            .when(
                signal(&["ethics", "philosophy", "psychology", "social"]),
                "concerned",
            )
            .default("cautious optimist")
            .build()?,
        FieldSpec::categorical("technology_relationship.platform_preference")
            .vocabulary(&["varies by domain", "digital-first", "in-person", "print"])
            .default("varies by domain")
            .build()?,
        FieldSpec::categorical("technology_relationship.tech_integration")
            .vocabulary(&["strategic use", "deeply integrated", "minimal use"])
            .default("strategic use")
            .build()?,
        // crisis_response
        FieldSpec::categorical("crisis_response.stress_response_pattern")
            .sources(&[TRAITS])
            .vocabulary(&[
                "calm under pressure",
                "energized by challenge",
                "maintains quality",
                "overwhelmed",
                "avoidant",
            ])
            .when(
                signal(&["calm", "zen", "mindful", "philosophical", "systematic"]),
                "calm under pressure",
            )
            .when(
                signal(&["competitive", "driven", "ambitious", "perfectionist", "demanding"]),
                "energized by challenge",
            )
            .default("maintains quality")
            .build()?,
        FieldSpec::categorical("crisis_response.failure_recovery")
            .sources(&[TRAITS])
            .vocabulary(&[
                "bounce back stronger",
                "learn and adapt",
                "prolonged recovery",
                "denial",
            ])
            .when(
                signal(&["resilient", "adaptive", "growth", "learning"]),
                "bounce back stronger",
            )
            .when(
                signal(&["analytical", "systematic", "thoughtful", "deliberate"]),
                "learn and adapt",
            )
            .default("learn and adapt")
            .build()?,
        FieldSpec::categorical("crisis_response.uncertainty_tolerance")
            .vocabulary(&["manages discomfort", "thrives in ambiguity", "seeks certainty"])
            .default("manages discomfort")
            .build()?,
        FieldSpec::categorical("crisis_response.pressure_performance")
            .vocabulary(&["maintains quality", "rises to the occasion", "declines under pressure"])
            .default("maintains quality")
            .build()?,
        FieldSpec::categorical("crisis_response.crisis_leadership")
            .vocabulary(&["provides calm guidance", "takes decisive control", "defers to others"])
            .default("provides calm guidance")
            .build()?,
        // influence_style
        FieldSpec::categorical("influence_style.persuasion_approach")
            .sources(&[TONE])
            .vocabulary(&[
                "logical argument",
                "emotional appeal",
                "social proof",
                "authority",
            ])
            .when(
                signal(&["analytical", "rational", "systematic", "research"]),
                "logical argument",
            )
            .when(
                signal(&["passionate", "charismatic", "inspirational", "visionary", "emotional"]),
                "emotional appeal",
            )
            .default("logical argument")
            .build()?,
        FieldSpec::categorical("influence_style.influence_scope")
            .sources(&[OCCUPATION, ARCHETYPE])
            .vocabulary(&["one-to-one", "small groups", "mass audience", "institutional"])
            .when(
                signal(&["author", "speaker", "ceo", "entertainer", "artist"]),
                "mass audience",
            )
            .when(
                within(&[DOMAIN, ARCHETYPE], &["academic", "research", "policy", "government"]),
                "institutional",
            )
            .when(
                within(&[OCCUPATION], &["coach", "consultant", "therapist"]),
                "one-to-one",
            )
            .default("mass audience")
            .build()?,
        FieldSpec::categorical("influence_style.rhetoric_style")
            .sources(&[TONE, SENTENCES])
            .vocabulary(&["direct", "storytelling", "socratic", "inspirational"])
            .when(
                signal(&["story", "narrative", "anecdote", "personal"]),
                "storytelling",
            )
            .when(
                signal(&["question", "socratic", "philosophical", "dialogue"]),
                "socratic",
            )
            .when(
                signal(&["inspirational", "motivational", "visionary", "uplifting"]),
                "inspirational",
            )
            .when(
                signal(&["direct", "blunt", "concise", "straightforward"]),
                "direct",
            )
            .default("storytelling")
            .build()?,
        FieldSpec::categorical("influence_style.credibility_source")
            .vocabulary(&["expertise", "track record", "authenticity", "institutional standing"])
            .default("expertise")
            .build()?,
        FieldSpec::categorical("influence_style.change_mechanism")
            .vocabulary(&["incremental progress", "disruptive change", "cultural shift"])
            .default("incremental progress")
            .build()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferenceEngine;
    use crate::record::FieldPath;
    use serde_json::{json, Value};

    fn infer(record: Value, target: &str) -> Value {
        let engine = InferenceEngine::new(specs().unwrap()).unwrap();
        engine
            .infer(&record, &FieldPath::parse(target).unwrap())
            .unwrap()
    }

    #[test]
    fn test_fifteen_fields() {
        assert_eq!(specs().unwrap().len(), 15);
    }

    #[test]
    fn test_entrepreneur_is_early_adopter() {
        let record = json!({ "domain": "Entrepreneur", "birth_year": 1985 });
        assert_eq!(
            infer(record, "technology_relationship.technology_adoption"),
            json!("early adopter")
        );
    }

    #[test]
    fn test_digital_fluency_birth_year_thresholds() {
        let target = "technology_relationship.digital_fluency";
        assert_eq!(infer(json!({ "birth_year": 1925 }), target), json!("analog-preferring"));
        assert_eq!(infer(json!({ "birth_year": 1945 }), target), json!("basic"));
        assert_eq!(infer(json!({ "birth_year": 1965 }), target), json!("proficient"));
        assert_eq!(infer(json!({ "birth_year": 1990 }), target), json!("native"));
        assert_eq!(infer(json!({ "domain": "Digital Media" }), target), json!("native"));
        assert_eq!(infer(json!({}), target), json!("proficient"));
    }

    #[test]
    fn test_ai_keyword_reads_domain_only() {
        let target = "technology_relationship.ai_perspective";
        assert_eq!(infer(json!({ "domain": "Computer Science" }), target), json!("enthusiast"));
        assert_eq!(infer(json!({ "archetype": "Social Reformer" }), target), json!("concerned"));
        assert_eq!(infer(json!({ "archetype": "Technical Lead" }), target), json!("cautious optimist"));
    }

    #[test]
    fn test_crisis_response_from_traits() {
        let record = json!({ "psychological_profile": { "primary_traits": ["Competitive", "Bold"] } });
        assert_eq!(
            infer(record.clone(), "crisis_response.stress_response_pattern"),
            json!("energized by challenge")
        );
        assert_eq!(
            infer(record, "crisis_response.pressure_performance"),
            json!("maintains quality")
        );
    }

    #[test]
    fn test_influence_scope_by_occupation() {
        let target = "influence_style.influence_scope";
        assert_eq!(infer(json!({ "occupation": "Life Coach" }), target), json!("one-to-one"));
        assert_eq!(infer(json!({ "domain": "Public Policy" }), target), json!("institutional"));
        assert_eq!(infer(json!({ "occupation": "Author" }), target), json!("mass audience"));
    }

    #[test]
    fn test_rhetoric_style_priority() {
        let record = json!({
            "communication_style": {
                "tone": "direct and inspirational",
                "sentence_structure": "short declaratives"
            }
        });
        assert_eq!(infer(record, "influence_style.rhetoric_style"), json!("inspirational"));
    }
}

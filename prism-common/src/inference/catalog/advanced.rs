//! Advanced multi-value fields: expertise depth, innovation, priorities, decision
//! making, learning, communication and ethics
//!
//! Most tables accumulate: every matching rule adds its items until the cap. Fields
//! that mirror an existing richer field copy it first and only fall back to
//! keyword rules when that field is empty.

use crate::inference::rule::{absent, all, item_count, not, present, within, Condition};
use crate::inference::FieldSpec;
use crate::Result;

const DOMAIN: &str = "domain";
const SUB_DOMAIN: &str = "sub_domain";
const TRAITS: &str = "psychological_profile.primary_traits";
const MOTIVATIONS: &str = "psychological_profile.core_motivations";
const DECISION_FRAMEWORK: &str = "psychological_profile.decision_making_framework";
const EXPERIENCE: &str = "background_context.experience_level";
const COMPETENCIES: &str = "domain_expertise.core_competencies";
const WORK_STYLE: &str = "behavioral_patterns.work_style";
const PROBLEM_SOLVING: &str = "behavioral_patterns.problem_solving_approach";
const CORE_VALUES: &str = "values.core_values";
const DECISION_STYLE: &str = "bias_awareness.decision_making_style";
const LEARNING_STYLE: &str = "learning.learning_style";
const LEARNING_ORIENTATION: &str = "growth_motivation.learning_orientation";
const MENTORSHIP: &str = "collaboration.mentorship_approach";
const TONE: &str = "communication_style.tone";
const AUDIENCE: &str = "communication.audience_adaptation";
const ADAPTATION: &str = "behavioral_growth.adaptation_patterns";
const RESILIENCE: &str = "behavioral_growth.resilience_indicators";
const ETHICAL_FRAMEWORK: &str = "cognitive_humanism.ethical_framework";

fn in_field(field: &str, keywords: &[&str]) -> Condition {
    within(&[field], keywords)
}

pub fn specs() -> Result<Vec<FieldSpec>> {
    Ok(vec![
        knowledge_depth()?,
        innovation_approach()?,
        priority_framework()?,
        decision_making()?,
        learning_preferences()?,
        knowledge_sharing()?,
        adaptation_speed()?,
        failure_response()?,
        curiosity_indicators()?,
        medium_preferences()?,
        message_framing()?,
        primary_expertise()?,
        ethical_standards()?,
    ])
}

fn knowledge_depth() -> Result<FieldSpec> {
    FieldSpec::multi_value("domain_expertise.knowledge_depth", 5)
        .add(
            in_field(EXPERIENCE, &["pioneer", "founder", "creator"]),
            &["foundational expertise"],
        )
        .add(
            in_field(EXPERIENCE, &["expert", "master", "leading"]),
            &["deep specialization"],
        )
        .add(
            in_field(EXPERIENCE, &["decades", "extensive"]),
            &["extensive practical experience"],
        )
        .add(
            in_field(EXPERIENCE, &["innovator", "thought leader"]),
            &["innovative contributions"],
        )
        .add(item_count(COMPETENCIES, Some(5), None), &["broad competency portfolio"])
        .add(item_count(COMPETENCIES, None, Some(3)), &["focused specialization"])
        .default("domain expertise")
        .build()
}

fn innovation_approach() -> Result<FieldSpec> {
    FieldSpec::multi_value("domain_expertise.innovation_approach", 3)
        .add(
            in_field(WORK_STYLE, &["experimental", "iterative"]),
            &["experimental iteration"],
        )
        .add(
            in_field(WORK_STYLE, &["systematic", "methodical"]),
            &["systematic innovation"],
        )
        .add(in_field(WORK_STYLE, &["collaborative"]), &["collaborative ideation"])
        .add(
            in_field(WORK_STYLE, &["disruptive", "unconventional"]),
            &["disruptive thinking"],
        )
        .add(
            in_field(PROBLEM_SOLVING, &["first principles"]),
            &["first principles innovation"],
        )
        .add(
            in_field(PROBLEM_SOLVING, &["creative", "novel"]),
            &["creative problem solving"],
        )
        .add(
            in_field(PROBLEM_SOLVING, &["data-driven", "analytical"]),
            &["data-informed innovation"],
        )
        .add(in_field(TRAITS, &["visionary"]), &["visionary foresight"])
        .add(in_field(TRAITS, &["pragmatic"]), &["pragmatic implementation"])
        .default("incremental improvement")
        .build()
}

fn priority_framework() -> Result<FieldSpec> {
    FieldSpec::multi_value("values.priority_framework", 3)
        .add(
            in_field(CORE_VALUES, &["impact", "results"]),
            &["impact-first prioritization"],
        )
        .add(
            in_field(CORE_VALUES, &["quality", "excellence"]),
            &["quality over quantity"],
        )
        .add(in_field(CORE_VALUES, &["innovation"]), &["innovation-driven decisions"])
        .add(
            in_field(CORE_VALUES, &["people", "relationships"]),
            &["relationship-centered priorities"],
        )
        .add(in_field(DECISION_STYLE, &["strategic"]), &["strategic alignment"])
        .add(
            in_field(DECISION_STYLE, &["data", "analytical"]),
            &["evidence-based prioritization"],
        )
        .add(in_field(DECISION_STYLE, &["intuitive"]), &["intuition-guided choices"])
        .add(
            in_field(MOTIVATIONS, &["legacy", "impact"]),
            &["long-term legacy focus"],
        )
        .add(
            in_field(MOTIVATIONS, &["growth", "learning"]),
            &["growth-oriented priorities"],
        )
        .default("value-aligned decisions")
        .build()
}

fn decision_making() -> Result<FieldSpec> {
    FieldSpec::multi_value("behavioral_patterns.decision_making", 3)
        .copy(present(DECISION_STYLE), DECISION_STYLE)
        .copy(present(DECISION_FRAMEWORK), DECISION_FRAMEWORK)
        .only(
            in_field(TRAITS, &["analytical"]),
            &["data-driven", "systematic analysis"],
        )
        .only(
            in_field(TRAITS, &["intuitive"]),
            &["intuition-based", "pattern recognition"],
        )
        .only(
            in_field(TRAITS, &["strategic"]),
            &["strategic thinking", "long-term planning"],
        )
        .default("balanced decision-making")
        .build()
}

fn learning_preferences() -> Result<FieldSpec> {
    FieldSpec::multi_value("behavioral_patterns.learning_preferences", 5)
        .only(
            absent(LEARNING_STYLE),
            &["experiential learning", "continuous development"],
        )
        .add(
            in_field(LEARNING_STYLE, &["hands-on", "practical"]),
            &["hands-on practice"],
        )
        .add(in_field(LEARNING_STYLE, &["reading", "research"]), &["deep reading"])
        .add(
            in_field(LEARNING_STYLE, &["collaborative", "discussion"]),
            &["peer discussion"],
        )
        .add(in_field(LEARNING_STYLE, &["visual"]), &["visual learning"])
        .add(
            in_field(LEARNING_STYLE, &["experiment"]),
            &["experimental exploration"],
        )
        .default("varied learning methods")
        .build()
}

fn knowledge_sharing() -> Result<FieldSpec> {
    FieldSpec::multi_value("learning.knowledge_sharing", 5)
        .add(
            in_field(MENTORSHIP, &["teaching", "educating"]),
            &["teaching and mentoring"],
        )
        .add(in_field(MENTORSHIP, &["collaborative"]), &["collaborative learning"])
        .add(
            in_field(MENTORSHIP, &["example", "modeling"]),
            &["leading by example"],
        )
        .add(
            in_field(TONE, &["accessible", "clear"]),
            &["accessible explanations"],
        )
        .add(
            in_field(TONE, &["technical", "detailed"]),
            &["detailed documentation"],
        )
        .default("knowledge transfer")
        .build()
}

fn adaptation_speed() -> Result<FieldSpec> {
    FieldSpec::multi_value("learning.adaptation_speed", 3)
        .copy(present(ADAPTATION), ADAPTATION)
        .only(
            in_field(WORK_STYLE, &["fast-paced", "agile"]),
            &["rapid adaptation", "quick learning"],
        )
        .only(
            in_field(WORK_STYLE, &["deliberate", "measured"]),
            &["thoughtful adaptation", "careful integration"],
        )
        .only(
            in_field(WORK_STYLE, &["flexible", "adaptive"]),
            &["flexible adjustment", "situational adaptation"],
        )
        .default("steady adaptation")
        .build()
}

fn failure_response() -> Result<FieldSpec> {
    FieldSpec::multi_value("learning.failure_response", 4)
        .copy(present(RESILIENCE), RESILIENCE)
        .add(
            in_field(TRAITS, &["resilient", "persistent"]),
            &["resilient recovery"],
        )
        .add(
            in_field(TRAITS, &["growth", "learning"]),
            &["learning from setbacks"],
        )
        .add(in_field(TRAITS, &["optimistic"]), &["optimistic reframing"])
        .add(in_field(TRAITS, &["analytical"]), &["systematic analysis"])
        .default("constructive response")
        .build()
}

fn curiosity_indicators() -> Result<FieldSpec> {
    FieldSpec::multi_value("growth_motivation.curiosity_indicators", 5)
        .add(
            in_field(LEARNING_STYLE, &["experiment", "hands-on"]),
            &["experimental exploration"],
        )
        .add(
            in_field(LEARNING_STYLE, &["question", "inquiry"]),
            &["questioning mindset"],
        )
        .add(
            in_field(LEARNING_STYLE, &["diverse", "interdisciplinary"]),
            &["interdisciplinary interests"],
        )
        .add(
            in_field(LEARNING_ORIENTATION, &["growth"]),
            &["growth-oriented exploration"],
        )
        .add(
            in_field(LEARNING_ORIENTATION, &["continuous"]),
            &["continuous learning drive"],
        )
        .add(
            in_field(TRAITS, &["curious", "inquisitive"]),
            &["natural curiosity"],
        )
        .add(
            in_field(TRAITS, &["innovative", "creative"]),
            &["exploratory thinking"],
        )
        .default("openness to new ideas")
        .build()
}

fn medium_preferences() -> Result<FieldSpec> {
    let technical = in_field(DOMAIN, &["technology", "software"]);
    let visual = in_field(DOMAIN, &["design", "art"]);
    let managerial = in_field(DOMAIN, &["business", "management"]);
    let scholarly = in_field(DOMAIN, &["academic", "research"]);

    FieldSpec::multi_value("communication.medium_preferences", 3)
        .add(
            technical.clone(),
            &[
                "written documentation",
                "digital communication",
                "asynchronous collaboration",
            ],
        )
        .add(
            all(vec![visual.clone(), not(technical.clone())]),
            &[
                "visual presentation",
                "in-person collaboration",
                "iterative feedback",
            ],
        )
        .add(
            all(vec![
                managerial.clone(),
                not(technical.clone()),
                not(visual.clone()),
            ]),
            &["executive briefings", "presentations", "strategic memos"],
        )
        .add(
            all(vec![
                scholarly,
                not(technical),
                not(visual),
                not(managerial),
            ]),
            &[
                "scholarly writing",
                "conference presentations",
                "peer discourse",
            ],
        )
        .add(in_field(WORK_STYLE, &["collaborative"]), &["collaborative platforms"])
        .add(in_field(WORK_STYLE, &["independent"]), &["written reports"])
        .add(in_field(WORK_STYLE, &["fast-paced"]), &["real-time communication"])
        .default("adaptable communication channels")
        .build()
}

fn message_framing() -> Result<FieldSpec> {
    FieldSpec::multi_value("communication.message_framing", 3)
        .add(
            in_field(TONE, &["analytical", "data-driven"]),
            &["evidence-based arguments"],
        )
        .add(
            in_field(TONE, &["persuasive", "inspiring"]),
            &["motivational narratives"],
        )
        .add(
            in_field(TONE, &["direct", "concise"]),
            &["clear bottom-line messaging"],
        )
        .add(
            in_field(TONE, &["technical", "precise"]),
            &["detailed technical explanations"],
        )
        .add(
            in_field(TONE, &["visionary", "big-picture"]),
            &["strategic vision framing"],
        )
        .add(in_field(AUDIENCE, &["context"]), &["context-aware messaging"])
        .default("clear purposeful messaging")
        .build()
}

fn primary_expertise() -> Result<FieldSpec> {
    FieldSpec::multi_value("domain_expertise.primary_expertise", 3)
        .copy(present(SUB_DOMAIN), SUB_DOMAIN)
        .copy(present(DOMAIN), DOMAIN)
        .copy(present(COMPETENCIES), COMPETENCIES)
        .default("domain expertise")
        .build()
}

fn ethical_standards() -> Result<FieldSpec> {
    FieldSpec::multi_value("values.ethical_standards", 4)
        .add(
            in_field(ETHICAL_FRAMEWORK, &["integrity"]),
            &["commitment to integrity"],
        )
        .add(
            in_field(ETHICAL_FRAMEWORK, &["transparency"]),
            &["transparency in operations"],
        )
        .add(
            in_field(ETHICAL_FRAMEWORK, &["fairness", "equity"]),
            &["equity and fairness"],
        )
        .add(
            in_field(ETHICAL_FRAMEWORK, &["accountability"]),
            &["personal accountability"],
        )
        .add(in_field(CORE_VALUES, &["honesty"]), &["commitment to honesty"])
        .add(in_field(CORE_VALUES, &["respect"]), &["respect for others"])
        .add(in_field(CORE_VALUES, &["excellence"]), &["pursuit of excellence"])
        .add(in_field(CORE_VALUES, &["innovation"]), &["ethical innovation"])
        .default("personal integrity")
        .build()
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
    fn test_thirteen_fields() {
        assert_eq!(specs().unwrap().len(), 13);
    }

    #[test]
    fn test_every_field_defaults_on_empty_record() {
        let engine = InferenceEngine::new(specs().unwrap()).unwrap();
        for target in engine.targets() {
            let value = engine.infer(&json!({}), target).unwrap();
            let items = value.as_array().unwrap();
            assert!(!items.is_empty(), "{} defaulted to nothing", target);
        }
    }

    #[test]
    fn test_knowledge_depth_accumulates() {
        let record = json!({
            "background_context": { "experience_level": "Pioneer with decades of work" },
            "domain_expertise": { "core_competencies": ["one", "two"] }
        });
        assert_eq!(
            infer(&record, "domain_expertise.knowledge_depth"),
            json!([
                "foundational expertise",
                "extensive practical experience",
                "focused specialization"
            ])
        );
    }

    #[test]
    fn test_priority_framework_capped_in_rule_order() {
        let record = json!({
            "values": { "core_values": ["impact", "excellence", "innovation", "people"] }
        });
        assert_eq!(
            infer(&record, "values.priority_framework"),
            json!([
                "impact-first prioritization",
                "quality over quantity",
                "innovation-driven decisions"
            ])
        );
    }

    #[test]
    fn test_decision_making_copies_existing_style() {
        let record = json!({
            "bias_awareness": { "decision_making_style": "Consensus seeking" },
            "psychological_profile": { "primary_traits": ["analytical"] }
        });
        assert_eq!(
            infer(&record, "behavioral_patterns.decision_making"),
            json!(["Consensus seeking"])
        );

        let traits_only = json!({ "psychological_profile": { "primary_traits": ["Intuitive"] } });
        assert_eq!(
            infer(&traits_only, "behavioral_patterns.decision_making"),
            json!(["intuition-based", "pattern recognition"])
        );
    }

    #[test]
    fn test_learning_preferences_without_style() {
        assert_eq!(
            infer(&json!({}), "behavioral_patterns.learning_preferences"),
            json!(["experiential learning", "continuous development"])
        );
        let record = json!({ "learning": { "learning_style": "Visual and hands-on" } });
        assert_eq!(
            infer(&record, "behavioral_patterns.learning_preferences"),
            json!(["hands-on practice", "visual learning"])
        );
        let unmatched = json!({ "learning": { "learning_style": "Osmosis" } });
        assert_eq!(
            infer(&unmatched, "behavioral_patterns.learning_preferences"),
            json!(["varied learning methods"])
        );
    }

    #[test]
    fn test_medium_preferences_domain_branches_exclusive() {
        let record = json!({
            "domain": "Software Design",
            "behavioral_patterns": { "work_style": "independent" }
        });
        assert_eq!(
            infer(&record, "communication.medium_preferences"),
            json!([
                "written documentation",
                "digital communication",
                "asynchronous collaboration"
            ])
        );

        let business = json!({
            "domain": "Business",
            "behavioral_patterns": { "work_style": "fast-paced" }
        });
        assert_eq!(
            infer(&business, "communication.medium_preferences"),
            json!(["executive briefings", "presentations", "strategic memos"])
        );
    }

    #[test]
    fn test_primary_expertise_prefers_sub_domain() {
        let record = json!({ "domain": "Science", "sub_domain": "Astrophysics" });
        assert_eq!(
            infer(&record, "domain_expertise.primary_expertise"),
            json!(["Astrophysics"])
        );
        let competencies = json!({
            "domain_expertise": { "core_competencies": ["Optics", "Lenses", "Lasers", "Mirrors"] }
        });
        assert_eq!(
            infer(&competencies, "domain_expertise.primary_expertise"),
            json!(["Optics", "Lenses", "Lasers"])
        );
    }
}

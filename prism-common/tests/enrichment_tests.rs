//! End-to-end enrichment over an on-disk corpus
//!
//! Each test builds a throwaway corpus directory, runs the batch driver through
//! the filesystem store and inspects what was written back.

use prism_common::canonicalize::{SynonymTable, TraitCanonicalizer};
use prism_common::corpus::{CorpusStore, RecordStore};
use prism_common::driver::{BatchDriver, EnrichmentPlan};
use prism_common::inference::{InferenceEngine, RuleSet};
use prism_common::{Error, FieldPath};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_record(dir: &Path, name: &str, record: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(record).unwrap()).unwrap();
}

fn read_record(dir: &Path, name: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join(name)).unwrap()).unwrap()
}

fn driver(plan: EnrichmentPlan) -> BatchDriver {
    BatchDriver::new(
        InferenceEngine::with_catalog().unwrap(),
        TraitCanonicalizer::new(SynonymTable::standard().unwrap()),
        plan,
    )
}

#[test]
fn test_entrepreneur_becomes_early_adopter() {
    let dir = TempDir::new().unwrap();
    write_record(dir.path(), "founder.json", &json!({ "domain": "Entrepreneur", "birth_year": 1985 }));

    let mut store = CorpusStore::open(dir.path()).unwrap();
    let summary = driver(EnrichmentPlan::inference(RuleSet::Tier1).unwrap())
        .run(&mut store)
        .unwrap();

    assert_eq!(summary.modified, 1);
    let record = read_record(dir.path(), "founder.json");
    assert_eq!(
        record["technology_relationship"]["technology_adoption"],
        "early adopter"
    );
    assert_eq!(record["domain"], "Entrepreneur");
    assert_eq!(record["birth_year"], 1985);
}

#[test]
fn test_birth_year_1925_is_analog_preferring() {
    let dir = TempDir::new().unwrap();
    write_record(dir.path(), "elder.json", &json!({ "birth_year": 1925 }));

    let mut store = CorpusStore::open(dir.path()).unwrap();
    driver(EnrichmentPlan::inference(RuleSet::Tier1).unwrap())
        .run(&mut store)
        .unwrap();

    let record = read_record(dir.path(), "elder.json");
    assert_eq!(
        record["technology_relationship"]["digital_fluency"],
        "analog-preferring"
    );
}

#[test]
fn test_primary_traits_canonicalized_on_disk() {
    let dir = TempDir::new().unwrap();
    write_record(
        dir.path(),
        "scientist.json",
        &json!({
            "name": "Rosalind Franklin",
            "psychological_profile": {
                "primary_traits": ["Research-Focused", "research-oriented", "Curious"]
            }
        }),
    );

    let mut store = CorpusStore::open(dir.path()).unwrap();
    let summary = driver(EnrichmentPlan::traits()).run(&mut store).unwrap();

    let record = read_record(dir.path(), "scientist.json");
    assert_eq!(
        record["psychological_profile"]["primary_traits"],
        json!(["research-oriented", "curious"])
    );
    assert_eq!(summary.trait_changes.total(), 2);
}

#[test]
fn test_populated_priority_framework_not_rewritten() {
    let dir = TempDir::new().unwrap();
    let original = "{\n  \"values\": {\n    \"priority_framework\": [\"Impact First\"]\n  }\n}";
    fs::write(dir.path().join("leader.json"), original).unwrap();

    let mut store = CorpusStore::open(dir.path()).unwrap();
    let plan = EnrichmentPlan::new(
        "priorities",
        vec![prism_common::driver::Enricher::Infer(
            FieldPath::parse("values.priority_framework").unwrap(),
        )],
    );
    let summary = driver(plan).run(&mut store).unwrap();

    assert_eq!(summary.modified, 0);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(fs::read_to_string(dir.path().join("leader.json")).unwrap(), original);
}

#[test]
fn test_second_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write_record(
        dir.path(),
        "curie.json",
        &json!({
            "name": "Marie Curie",
            "domain": "Science",
            "birth_year": 1867,
            "psychological_profile": { "primary_traits": "Persistent, Observational, persistent" }
        }),
    );
    write_record(
        dir.path(),
        "jobs.json",
        &json!({ "name": "Steve Jobs", "domain": "Technology", "birth_year": 1955 }),
    );

    let mut store = CorpusStore::open(dir.path()).unwrap();
    let driver = driver(EnrichmentPlan::all().unwrap());

    let first = driver.run(&mut store).unwrap();
    assert_eq!(first.modified, 2);
    let curie = fs::read_to_string(dir.path().join("curie.json")).unwrap();
    let jobs = fs::read_to_string(dir.path().join("jobs.json")).unwrap();

    let second = driver.run(&mut store).unwrap();
    assert_eq!(second.modified, 0);
    assert_eq!(second.unchanged, 2);
    assert!(second.field_changes.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("curie.json")).unwrap(), curie);
    assert_eq!(fs::read_to_string(dir.path().join("jobs.json")).unwrap(), jobs);

    let record = read_record(dir.path(), "curie.json");
    assert_eq!(
        record["psychological_profile"]["primary_traits"],
        "persistent, observant"
    );
    assert_eq!(record["era"], "Industrial Age");
}

#[test]
fn test_every_inferred_field_is_populated() {
    let engine = InferenceEngine::with_catalog().unwrap();
    let record = json!({});
    let targets: Vec<FieldPath> = engine.targets().cloned().collect();

    for target in targets {
        let value = engine.infer(&record, &target).unwrap();
        assert!(
            !prism_common::record::is_empty(Some(&value)),
            "{} inferred an empty value",
            target
        );
    }
}

#[test]
fn test_malformed_record_skipped_run_continues() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a-broken.json"), "{ \"name\": ").unwrap();
    write_record(dir.path(), "b-good.json", &json!({ "birth_year": 1925 }));

    let mut store = CorpusStore::open(dir.path()).unwrap();
    let summary = driver(EnrichmentPlan::inference(RuleSet::Tier1).unwrap())
        .run(&mut store)
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].id, "a-broken.json");
    assert_eq!(summary.modified, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("a-broken.json")).unwrap(),
        "{ \"name\": "
    );
}

#[test]
fn test_aggregate_file_not_enriched() {
    let dir = TempDir::new().unwrap();
    write_record(dir.path(), "a.json", &json!({ "birth_year": 1990 }));
    write_record(dir.path(), "all-profiles.json", &json!([{ "birth_year": 1990 }]));

    let mut store = CorpusStore::open(dir.path())
        .unwrap()
        .excluding("all-profiles.json");
    let summary = driver(EnrichmentPlan::inference(RuleSet::Tier1).unwrap())
        .run(&mut store)
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(store.list().unwrap(), vec!["a.json"]);
}

#[test]
fn test_missing_corpus_dir_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = CorpusStore::open(&dir.path().join("no-such-corpus")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_default_override_applies() {
    let mut overrides = BTreeMap::new();
    overrides.insert("nationality".to_string(), "American".to_string());
    let engine = InferenceEngine::with_catalog()
        .unwrap()
        .with_default_overrides(&overrides)
        .unwrap();

    let nationality = FieldPath::parse("nationality").unwrap();
    assert_eq!(engine.infer(&json!({}), &nationality), Some(json!("American")));

    let mut bad = BTreeMap::new();
    bad.insert("nationality".to_string(), "Martian".to_string());
    assert!(InferenceEngine::with_catalog()
        .unwrap()
        .with_default_overrides(&bad)
        .is_err());
}

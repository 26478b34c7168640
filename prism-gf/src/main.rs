//! prism-gf (Gap Filler) - batch enrichment of a profile corpus
//!
//! Infers missing fields from the built-in rule tables, standardizes trait
//! lists and optionally prunes redundant derived fields. Records are saved only
//! when they change, so re-running over an enriched corpus writes nothing.

use anyhow::{Context, Result};
use clap::Parser;
use prism_common::canonicalize::{SynonymTable, TraitCanonicalizer};
use prism_common::config::{self, TomlConfig};
use prism_common::corpus::{self, CorpusStore};
use prism_common::driver::{BatchDriver, EnrichmentPlan};
use prism_common::inference::InferenceEngine;
use prism_common::report::ReportSnapshot;
use std::path::PathBuf;
use tracing::info;

/// Report file name used inside the configured report directory
const REPORT_FILE: &str = "gap-filler-report.json";

/// Command-line arguments for prism-gf
#[derive(Parser, Debug)]
#[command(name = "prism-gf")]
#[command(about = "Fill missing profile fields and standardize traits")]
#[command(version)]
struct Args {
    /// Directory holding one JSON document per profile
    #[arg(short, long)]
    corpus_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enrichment plan (tier1, tier2, gaps, advanced, traits, prune, all); repeatable
    #[arg(short, long = "plan", default_value = "all")]
    plans: Vec<String>,

    /// Compute changes without saving any record
    #[arg(long)]
    dry_run: bool,

    /// Rebuild this aggregate array file after the run
    #[arg(long)]
    aggregate: Option<PathBuf>,

    /// Write the run summary here
    #[arg(long)]
    report: Option<PathBuf>,
}

fn init_tracing(level: &str) {
    let level = level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref());
    let loaded = match &config_path {
        Some(path) => TomlConfig::load_optional(path),
        None => Ok(None),
    };
    let level = match &loaded {
        Ok(Some(config)) => config.logging.level.clone(),
        _ => "info".to_string(),
    };
    init_tracing(&level);

    info!("Starting PRISM Gap Filler (prism-gf) v{}", env!("CARGO_PKG_VERSION"));

    let config = TomlConfig::or_default(
        loaded.context("Failed to load config file")?,
        config_path.as_deref(),
    );

    let corpus_dir = config::resolve_corpus_dir(args.corpus_dir.as_deref(), &config);
    info!("Corpus: {}", corpus_dir.display());

    let aggregate = args
        .aggregate
        .clone()
        .or_else(|| config.aggregate_path(&corpus_dir));

    let mut store = CorpusStore::open(&corpus_dir).context("Cannot open corpus directory")?;
    if let Some(name) = aggregate.as_ref().and_then(|path| path.file_name()) {
        store = store.excluding(&name.to_string_lossy());
    }

    let engine = InferenceEngine::with_catalog()
        .and_then(|engine| engine.with_default_overrides(&config.inference.defaults))
        .context("Failed to build inference rules")?;
    let synonyms = SynonymTable::standard()
        .and_then(|table| table.with_overrides(&config.synonyms))
        .context("Failed to build synonym table")?;

    let mut plans = Vec::with_capacity(args.plans.len());
    for name in &args.plans {
        plans.push(EnrichmentPlan::preset(name).context("Invalid --plan")?);
    }
    let plan_name = args.plans.join("+");
    let plan = EnrichmentPlan::combine(plan_name, plans);

    let driver = BatchDriver::new(engine, TraitCanonicalizer::new(synonyms), plan)
        .dry_run(args.dry_run);
    let summary = driver.run(&mut store).context("Failed to enumerate corpus")?;

    info!(
        "Processed {} records: {} modified, {} unchanged, {} failed",
        summary.processed,
        summary.modified,
        summary.unchanged,
        summary.failed.len()
    );
    for (field, count) in &summary.field_changes {
        info!("  {}: {} records", field, count);
    }
    if !summary.trait_changes.is_empty() {
        info!("Trait rewrites: {}", summary.trait_changes.total());
        for (change, count) in summary.trait_changes.top(10) {
            info!("  {} ({}x)", change, count);
        }
    }

    if let Some(path) = &aggregate {
        if args.dry_run {
            info!("Dry run, aggregate {} left untouched", path.display());
        } else {
            let (records, _) = corpus::load_all(&store).context("Failed to reload corpus")?;
            let records: Vec<_> = records.into_iter().map(|(_, record)| record).collect();
            store
                .write_aggregate(path, &records)
                .with_context(|| format!("Failed to write aggregate {}", path.display()))?;
            info!("Aggregate of {} records written to {}", records.len(), path.display());
        }
    }

    if let Some(path) = args.report.clone().or_else(|| config.report_path(REPORT_FILE)) {
        ReportSnapshot::new("prism-gf", env!("CARGO_PKG_VERSION"), &summary)
            .export_json(&path)
            .context("Failed to write report")?;
    }

    Ok(())
}

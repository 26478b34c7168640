//! prism-ca (Coverage Analyzer) - read-only field coverage report for a corpus
//!
//! Counts how many profiles populate each tracked field, buckets the results
//! into coverage bands and lists enrichment, removal and reconciliation
//! candidates. Tracked fields come from an outline CSV when one is configured.

use anyhow::{Context, Result};
use clap::Parser;
use prism_common::canonicalize::{TraitDistribution, PRIMARY_TRAITS};
use prism_common::config::{self, TomlConfig};
use prism_common::corpus::{self, CorpusStore, LoadFailure};
use prism_common::coverage::{CoverageAnalyzer, CoverageReport, TrackedFields};
use prism_common::outline::Outline;
use prism_common::report::ReportSnapshot;
use prism_common::FieldPath;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

const REPORT_FILE: &str = "coverage-report.json";

/// Traits listed in the distribution summary
const TOP_TRAITS: usize = 20;

/// Command-line arguments for prism-ca
#[derive(Parser, Debug)]
#[command(name = "prism-ca")]
#[command(about = "Analyze field coverage across a profile corpus")]
#[command(version)]
struct Args {
    /// Directory holding one JSON document per profile
    #[arg(short, long)]
    corpus_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Outline CSV replacing the built-in tracked field groups
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CorpusReport {
    coverage: CoverageReport,
    primary_traits: TraitDistribution,
    skipped: Vec<LoadFailure>,
}

fn init_tracing(level: &str) {
    let level = level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    // stdout may carry the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
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

    info!("Starting PRISM Coverage Analyzer (prism-ca) v{}", env!("CARGO_PKG_VERSION"));

    let config = TomlConfig::or_default(
        loaded.context("Failed to load config file")?,
        config_path.as_deref(),
    );

    let corpus_dir = config::resolve_corpus_dir(args.corpus_dir.as_deref(), &config);
    info!("Corpus: {}", corpus_dir.display());

    let mut store = CorpusStore::open(&corpus_dir).context("Cannot open corpus directory")?;
    if let Some(name) = config
        .aggregate_path(&corpus_dir)
        .as_ref()
        .and_then(|path| path.file_name())
    {
        store = store.excluding(&name.to_string_lossy());
    }

    let tracked = match args.outline.clone().or_else(|| config.outline_file.clone()) {
        Some(path) => {
            let outline = Outline::from_path(&path)
                .with_context(|| format!("Failed to read outline {}", path.display()))?;
            info!("Tracking {} outline fields from {}", outline.len(), path.display());
            outline.tracked_fields()
        }
        None => TrackedFields::default(),
    };

    let (records, skipped) = corpus::load_all(&store).context("Failed to enumerate corpus")?;
    info!("Loaded {} records ({} skipped)", records.len(), skipped.len());

    let coverage = CoverageAnalyzer::new(tracked).analyze(records.iter().map(|(_, record)| record));
    let primary_traits = TraitDistribution::from_records(
        records.iter().map(|(_, record)| record),
        &FieldPath::parse(PRIMARY_TRAITS)?,
        TOP_TRAITS,
    );

    log_summary(&coverage);

    let report = CorpusReport {
        coverage,
        primary_traits,
        skipped,
    };

    match args.output.clone().or_else(|| config.report_path(REPORT_FILE)) {
        Some(path) => {
            ReportSnapshot::new("prism-ca", env!("CARGO_PKG_VERSION"), &report)
                .export_json(&path)
                .context("Failed to write report")?;
        }
        None => {
            let snapshot = ReportSnapshot::new("prism-ca", env!("CARGO_PKG_VERSION"), &report);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}

fn log_summary(coverage: &CoverageReport) {
    info!(
        "Overall coverage {:.1}% across {} records",
        coverage.overall_percentage, coverage.records
    );
    for (band, count) in &coverage.band_summary {
        info!("  {}: {} fields", band, count);
    }
    for group in &coverage.groups {
        let fields = group.fields.len().max(1) as f64;
        let average: f64 = group.fields.iter().map(|f| f.percentage).sum::<f64>() / fields;
        info!("{}: {:.1}% average", group.name, average);
    }
    for candidate in coverage.enrichment_candidates.iter().take(10) {
        info!(
            "Enrichment candidate {} ({:.1}%, {})",
            candidate.path, candidate.percentage, candidate.band
        );
    }
    if !coverage.orphaned_fields.is_empty() {
        info!("{} fields present but not tracked", coverage.orphaned_fields.len());
    }
    if !coverage.missing_fields.is_empty() {
        warn!("{} tracked fields absent from every record", coverage.missing_fields.len());
    }
}

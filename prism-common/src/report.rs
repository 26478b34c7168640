//! JSON report snapshots
//!
//! Reports are rebuilt on every run; a snapshot wraps one with the time it was
//! generated and the tool that generated it.

use crate::corpus::write_json_atomic;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Generation metadata
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotInfo {
    pub generated_at: DateTime<Utc>,
    pub tool: String,
    pub version: String,
}

/// A report plus its generation metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportSnapshot<T> {
    pub snapshot: SnapshotInfo,
    pub report: T,
}

impl<T: Serialize> ReportSnapshot<T> {
    pub fn new(tool: &str, version: &str, report: T) -> Self {
        Self {
            snapshot: SnapshotInfo {
                generated_at: Utc::now(),
                tool: tool.to_string(),
                version: version.to_string(),
            },
            report,
        }
    }

    /// Write the snapshot as pretty JSON
    pub fn export_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write_json_atomic(path, self)?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_wraps_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("coverage.json");

        ReportSnapshot::new("prism-ca", "0.1.0", json!({ "records": 3 }))
            .export_json(&path)
            .unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["snapshot"]["tool"], "prism-ca");
        assert_eq!(written["snapshot"]["version"], "0.1.0");
        assert!(written["snapshot"]["generated_at"].is_string());
        assert_eq!(written["report"]["records"], 3);
    }
}

//! Record storage
//!
//! A corpus is a directory holding one JSON document per profile. Records are
//! enumerated non-recursively in file-name order and written back atomically
//! (temp file + rename) as 2-space pretty JSON, UTF-8, keys in encounter order.
//! An optional aggregate file (a JSON array of every record) lives beside them
//! and is never enumerated as a record.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const RECORD_EXTENSION: &str = "json";

/// Load/save access to records by identifier
///
/// Identifiers are storage names (file names for [`CorpusStore`]), listed in
/// processing order.
pub trait RecordStore {
    fn list(&self) -> Result<Vec<String>>;

    /// Load one record; a document that is not a JSON mapping is
    /// [`Error::MalformedRecord`]
    fn load(&self, id: &str) -> Result<Value>;

    fn save(&mut self, id: &str, record: &Value) -> Result<()>;
}

/// A record that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub id: String,
    pub reason: String,
}

/// Every loadable record in store order, plus what was skipped
pub fn load_all<S: RecordStore + ?Sized>(store: &S) -> Result<(Vec<(String, Value)>, Vec<LoadFailure>)> {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for id in store.list()? {
        match store.load(&id) {
            Ok(record) => records.push((id, record)),
            Err(e) => {
                warn!("Skipping {}: {}", id, e);
                failures.push(LoadFailure {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok((records, failures))
}

/// Directory-backed corpus
#[derive(Debug, Clone)]
pub struct CorpusStore {
    root: PathBuf,
    excluded: Vec<String>,
}

impl CorpusStore {
    /// Open an existing corpus directory
    ///
    /// A missing directory is [`Error::NotFound`]; nothing is created.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.exists() {
            return Err(Error::NotFound(format!(
                "corpus directory {}",
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(Error::InvalidInput(format!(
                "corpus path {} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
            excluded: Vec::new(),
        })
    }

    /// Leave `file_name` out of enumeration (the aggregate file)
    pub fn excluding(mut self, file_name: &str) -> Self {
        self.excluded.push(file_name.to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Write every record into one JSON array file
    pub fn write_aggregate(&self, path: &Path, records: &[Value]) -> Result<()> {
        write_json_atomic(path, &records)?;
        debug!("Wrote aggregate of {} records to {}", records.len(), path.display());
        Ok(())
    }
}

impl RecordStore for CorpusStore {
    fn list(&self) -> Result<Vec<String>> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter();

        let mut ids = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error accessing corpus entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.excluded.contains(&name) {
                continue;
            }
            ids.push(name);
        }
        Ok(ids)
    }

    fn load(&self, id: &str) -> Result<Value> {
        let path = self.path_of(id);
        let content = fs::read_to_string(&path)?;
        let record: Value =
            serde_json::from_str(&content).map_err(|e| Error::MalformedRecord {
                file: path.clone(),
                reason: e.to_string(),
            })?;
        if !record.is_object() {
            return Err(Error::MalformedRecord {
                file: path,
                reason: "top-level value is not a mapping".to_string(),
            });
        }
        Ok(record)
    }

    fn save(&mut self, id: &str, record: &Value) -> Result<()> {
        write_json_atomic(&self.path_of(id), record)
    }
}

/// Pretty-print `value` to `path` through a sibling temp file
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidInput(format!("{} has no file name", path.display())))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&temp, json)?;
    if let Err(e) = fs::rename(&temp, path) {
        if let Err(cleanup) = fs::remove_file(&temp) {
            warn!("Failed to remove {}: {}", temp.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

/// Records held in memory, counting writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self {
            records: records.into_iter().collect(),
            writes: 0,
        }
    }

    /// Saves performed since construction
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.records.get(id)
    }
}

impl RecordStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }

    fn load(&self, id: &str) -> Result<Value> {
        let record = self
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("record {}", id)))?;
        if !record.is_object() {
            return Err(Error::MalformedRecord {
                file: PathBuf::from(id),
                reason: "top-level value is not a mapping".to_string(),
            });
        }
        Ok(record)
    }

    fn save(&mut self, id: &str, record: &Value) -> Result<()> {
        self.records.insert(id.to_string(), record.clone());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_open_missing_dir_is_not_found() {
        let err = CorpusStore::open(Path::new("/nonexistent/prism/corpus")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_list_json_in_name_order_excluding_aggregate() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.json", "{}");
        write(dir.path(), "a.json", "{}");
        write(dir.path(), "all-profiles.json", "[]");
        write(dir.path(), "notes.txt", "skip");
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir.path().join("nested"), "c.json", "{}");

        let store = CorpusStore::open(dir.path())
            .unwrap()
            .excluding("all-profiles.json");
        assert_eq!(store.list().unwrap(), vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_load_rejects_non_mapping_and_bad_json() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "list.json", "[1, 2]");
        write(dir.path(), "broken.json", "{ not json");
        let store = CorpusStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.load("list.json").unwrap_err(),
            Error::MalformedRecord { .. }
        ));
        assert!(matches!(
            store.load("broken.json").unwrap_err(),
            Error::MalformedRecord { .. }
        ));
    }

    #[test]
    fn test_save_pretty_utf8_in_key_order() {
        let dir = TempDir::new().unwrap();
        let mut store = CorpusStore::open(dir.path()).unwrap();
        let record = json!({ "name": "Frédéric Chopin", "era": "Romantic", "birth_year": 1810 });

        store.save("chopin.json", &record).unwrap();

        let written = fs::read_to_string(dir.path().join("chopin.json")).unwrap();
        assert_eq!(
            written,
            "{\n  \"name\": \"Frédéric Chopin\",\n  \"era\": \"Romantic\",\n  \"birth_year\": 1810\n}"
        );
        assert_eq!(store.load("chopin.json").unwrap(), record);
        assert!(!dir.path().join(".chopin.json.tmp").exists());
    }

    #[test]
    fn test_load_all_skips_malformed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", "{\"name\": \"Ada\"}");
        write(dir.path(), "b.json", "oops");
        let store = CorpusStore::open(dir.path()).unwrap();

        let (records, failures) = load_all(&store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id, "b.json");
    }

    #[test]
    fn test_write_aggregate_array() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::open(dir.path()).unwrap();
        let path = dir.path().join("all-profiles.json");

        store
            .write_aggregate(&path, &[json!({ "name": "Ada" }), json!({ "name": "Alan" })])
            .unwrap();

        let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!([{ "name": "Ada" }, { "name": "Alan" }]));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new(vec![("a".to_string(), json!({}))]);
        assert_eq!(store.writes(), 0);
        store.save("a", &json!({ "era": "Modern" })).unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get("a"), Some(&json!({ "era": "Modern" })));
        assert!(matches!(store.load("missing").unwrap_err(), Error::NotFound(_)));
    }
}

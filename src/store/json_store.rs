use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::data_model::StoreRecord;
use crate::error::{PipelineError, Result};
use crate::store::DocumentStore;

/// Store persisted as a single JSON object (`key -> record`).
///
/// The file is rewritten through a sibling temp file and a rename after every upsert,
/// under the same lock that guards the in-memory map.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, StoreRecord>>,
}

impl JsonFileStore {
    /// Opens `path`, loading existing records if the file is there.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                PipelineError::StoreReadError(format!("Failed to read '{}': {}", path.display(), e))
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    PipelineError::StoreReadError(format!(
                        "Failed to parse '{}': {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };
        info!(
            path = %path.display(),
            records = records.len(),
            "Opened document store"
        );
        Ok(JsonFileStore {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &BTreeMap<String, StoreRecord>) -> std::result::Result<(), String> {
        let payload = serde_json::to_vec_pretty(records).map_err(|e| e.to_string())?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, payload).map_err(|e| e.to_string())?;
        fs::rename(&tmp_path, &self.path).map_err(|e| e.to_string())?;
        Ok(())
    }

    fn read_lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, StoreRecord>>> {
        self.records
            .lock()
            .map_err(|e| PipelineError::StoreReadError(e.to_string()))
    }
}

impl DocumentStore for JsonFileStore {
    fn upsert(&self, key: &str, record: &StoreRecord) -> Result<()> {
        let write_error = |reason: String| PipelineError::StoreWriteError {
            key: key.to_string(),
            reason,
        };
        let mut records = self.records.lock().map_err(|e| write_error(e.to_string()))?;

        let previous = records.insert(key.to_string(), record.clone());
        if let Err(reason) = self.persist(&records) {
            // Keep memory and disk in agreement.
            match previous {
                Some(prev) => records.insert(key.to_string(), prev),
                None => records.remove(key),
            };
            return Err(write_error(reason));
        }
        debug!(key, "Upserted record");
        Ok(())
    }

    fn count(&self, predicate: &dyn Fn(&StoreRecord) -> bool) -> Result<usize> {
        Ok(self.read_lock()?.values().filter(|r| predicate(r)).count())
    }

    fn scan(&self) -> Result<Vec<(String, StoreRecord)>> {
        Ok(self
            .read_lock()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get(&self, key: &str) -> Result<Option<StoreRecord>> {
        Ok(self.read_lock()?.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{DocumentFailure, ProcessingResult};
    use tempfile::tempdir;

    fn failure(name: &str) -> StoreRecord {
        StoreRecord::Document(ProcessingResult::Failure(DocumentFailure {
            name: name.to_string(),
            url: "http://x/a.pdf".to_string(),
            error: "boom".to_string(),
            processing_time: 0.5,
        }))
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.upsert("doc1", &failure("doc1")).unwrap();
            store.upsert("doc2", &failure("doc2")).unwrap();
        }
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.scan().unwrap().len(), 2);
        assert_eq!(reopened.get("doc1").unwrap(), Some(failure("doc1")));
    }

    #[test]
    fn test_corrupt_file_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(PipelineError::StoreReadError(_))
        ));
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let dir = tempdir().unwrap();
        // Parent directory does not exist, so the temp file cannot be created.
        let store = JsonFileStore::open(dir.path().join("missing").join("store.json")).unwrap();
        let err = store.upsert("doc1", &failure("doc1")).unwrap_err();
        assert!(matches!(err, PipelineError::StoreWriteError { .. }));
        assert!(store.get("doc1").unwrap().is_none());
    }
}

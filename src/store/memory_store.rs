use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::data_model::StoreRecord;
use crate::error::{PipelineError, Result};
use crate::store::DocumentStore;

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, StoreRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn upsert(&self, key: &str, record: &StoreRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| PipelineError::StoreWriteError {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        records.insert(key.to_string(), record.clone());
        Ok(())
    }

    fn count(&self, predicate: &dyn Fn(&StoreRecord) -> bool) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| PipelineError::StoreReadError(e.to_string()))?;
        Ok(records.values().filter(|r| predicate(r)).count())
    }

    fn scan(&self) -> Result<Vec<(String, StoreRecord)>> {
        let records = self
            .records
            .read()
            .map_err(|e| PipelineError::StoreReadError(e.to_string()))?;
        Ok(records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get(&self, key: &str) -> Result<Option<StoreRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| PipelineError::StoreReadError(e.to_string()))?;
        Ok(records.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{DocumentFailure, ProcessingResult};

    fn failure(name: &str, error: &str) -> StoreRecord {
        StoreRecord::Document(ProcessingResult::Failure(DocumentFailure {
            name: name.to_string(),
            url: format!("http://x/{}.pdf", name),
            error: error.to_string(),
            processing_time: 0.1,
        }))
    }

    #[test]
    fn test_upsert_overwrites_by_key() {
        let store = MemoryStore::new();
        store.upsert("doc1", &failure("doc1", "first")).unwrap();
        store.upsert("doc1", &failure("doc1", "second")).unwrap();
        assert_eq!(store.len(), 1);
        let stored = store.get("doc1").unwrap().unwrap();
        assert_eq!(stored.as_document().and_then(|r| r.error()), Some("second"));
    }

    #[test]
    fn test_count_and_scan() {
        let store = MemoryStore::new();
        store.upsert("b", &failure("b", "x")).unwrap();
        store.upsert("a", &failure("a", "y")).unwrap();
        let keys: Vec<String> = store.scan().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        let count = store
            .count(&|r| r.as_document().and_then(|d| d.error()) == Some("x"))
            .unwrap();
        assert_eq!(count, 1);
        assert!(store.get("missing").unwrap().is_none());
    }
}

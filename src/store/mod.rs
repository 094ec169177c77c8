// src/store/mod.rs

pub mod json_store;
pub mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;

use crate::data_model::StoreRecord;
use crate::error::Result;

/// Keyed document persistence shared by every worker.
///
/// `upsert` replaces the whole record stored under `key` and must be atomic per key;
/// the pipeline itself takes no locks around it.
pub trait DocumentStore: Send + Sync {
    fn upsert(&self, key: &str, record: &StoreRecord) -> Result<()>;

    fn count(&self, predicate: &dyn Fn(&StoreRecord) -> bool) -> Result<usize>;

    /// Every `(key, record)` pair, ordered by key.
    fn scan(&self) -> Result<Vec<(String, StoreRecord)>>;

    fn get(&self, key: &str) -> Result<Option<StoreRecord>>;
}

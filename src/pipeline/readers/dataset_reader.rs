// src/pipeline/readers/dataset_reader.rs

use crate::data_model::{DocumentTask, DEFAULT_DOMAIN};
use crate::error::{PipelineError, Result};
use crate::pipeline::readers::BaseReader;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Accepted shapes for one dataset value.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum DatasetEntry {
    Url(String),
    Pair(String, String),
    Detailed {
        url: String,
        #[serde(default)]
        domain: Option<String>,
    },
}

impl DatasetEntry {
    fn into_task(self, name: String) -> DocumentTask {
        let (url, domain) = match self {
            DatasetEntry::Url(url) => (url, None),
            DatasetEntry::Pair(url, domain) => (url, Some(domain)),
            DatasetEntry::Detailed { url, domain } => (url, domain),
        };
        DocumentTask {
            name,
            url,
            domain: domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        }
    }
}

/// Reads a JSON object mapping document names to URLs (or `[url, domain]` pairs,
/// or `{"url": ..., "domain": ...}` objects). Tasks come back ordered by name.
#[derive(Debug, Clone)]
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        DatasetReader {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load_error(&self, reason: impl Into<String>) -> PipelineError {
        PipelineError::DatasetLoadError {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Parses dataset JSON already in memory.
    pub fn parse(&self, content: &str) -> Result<Vec<DocumentTask>> {
        let entries: BTreeMap<String, DatasetEntry> =
            serde_json::from_str(content).map_err(|e| self.load_error(e.to_string()))?;

        let mut tasks = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            let task = entry.into_task(name);
            if task.name.trim().is_empty() {
                return Err(self.load_error("document name must not be empty"));
            }
            if task.url.trim().is_empty() {
                return Err(self.load_error(format!("document '{}' has an empty URL", task.name)));
            }
            tasks.push(task);
        }
        Ok(tasks)
    }
}

impl BaseReader for DatasetReader {
    fn read_tasks(&self) -> Result<Vec<DocumentTask>> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.load_error(e.to_string()))?;
        let tasks = self.parse(&content)?;
        info!(
            count = tasks.len(),
            "Dataset loaded successfully from {}",
            self.path.display()
        );
        Ok(tasks)
    }
}

// Shared test doubles for the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use PdfDigest::config::pipeline::{default_analysis_steps, CleanupPolicy};
use PdfDigest::data_model::{DocumentTask, StoreRecord};
use PdfDigest::error::{PipelineError, Result};
use PdfDigest::executor::PipelineExecutor;
use PdfDigest::pipeline::analysis::build_pipeline_from_config;
use PdfDigest::pipeline::downloader::Fetcher;
use PdfDigest::pipeline::extractor::TextExtractor;
use PdfDigest::pipeline::DocumentProcessor;
use PdfDigest::store::{DocumentStore, MemoryStore};

pub enum Response {
    Body(String),
    Transport(String),
    Tls(String),
}

/// Serves canned responses by URL. Unknown URLs are transport errors.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Response>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Response::Body(body.to_string()));
        self
    }

    pub fn with_transport_error(mut self, url: &str, reason: &str) -> Self {
        self.responses
            .insert(url.to_string(), Response::Transport(reason.to_string()));
        self
    }

    pub fn with_tls_error(mut self, url: &str, reason: &str) -> Self {
        self.responses
            .insert(url.to_string(), Response::Tls(reason.to_string()));
        self
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        match self.responses.get(url) {
            Some(Response::Body(body)) => Ok(body.as_bytes().to_vec()),
            Some(Response::Transport(reason)) => Err(PipelineError::TransportError {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            Some(Response::Tls(reason)) => Err(PipelineError::TlsVerificationError {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(PipelineError::TransportError {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            }),
        }
    }
}

pub const CORRUPT_MARKER: &str = "%CORRUPT";
pub const PANIC_MARKER: &str = "%PANIC";

/// Treats the downloaded bytes as the document text.
/// Bodies starting with [`CORRUPT_MARKER`] fail, [`PANIC_MARKER`] panics.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::ExtractionError(e.to_string()))?;
        if text.starts_with(PANIC_MARKER) {
            panic!("decoder blew up on {}", path.display());
        }
        if text.starts_with(CORRUPT_MARKER) {
            return Err(PipelineError::ExtractionError(format!(
                "Error extracting text from {}: invalid xref table",
                path.display()
            )));
        }
        Ok(text)
    }
}

/// Memory store that refuses writes for selected keys.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    rejected: HashSet<String>,
}

impl FlakyStore {
    pub fn rejecting(keys: &[&str]) -> Self {
        FlakyStore {
            inner: MemoryStore::new(),
            rejected: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl DocumentStore for FlakyStore {
    fn upsert(&self, key: &str, record: &StoreRecord) -> Result<()> {
        if self.rejected.contains(key) {
            return Err(PipelineError::StoreWriteError {
                key: key.to_string(),
                reason: "disk full".to_string(),
            });
        }
        self.inner.upsert(key, record)
    }

    fn count(&self, predicate: &dyn Fn(&StoreRecord) -> bool) -> Result<usize> {
        self.inner.count(predicate)
    }

    fn scan(&self) -> Result<Vec<(String, StoreRecord)>> {
        self.inner.scan()
    }

    fn get(&self, key: &str) -> Result<Option<StoreRecord>> {
        self.inner.get(key)
    }
}

pub fn task(name: &str) -> DocumentTask {
    DocumentTask::new(name, format!("https://docs.example.org/{}.pdf", name))
}

pub fn processor(
    fetcher: MockFetcher,
    store: Arc<dyn DocumentStore>,
    temp_dir: &Path,
    cleanup: CleanupPolicy,
) -> DocumentProcessor {
    let executor = PipelineExecutor::new(build_pipeline_from_config(&default_analysis_steps()));
    DocumentProcessor::new(Arc::new(fetcher), Arc::new(PlainTextExtractor), store, executor)
        .with_temp_dir(temp_dir)
        .with_cleanup_policy(cleanup)
}

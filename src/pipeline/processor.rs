// src/pipeline/processor.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, info_span, warn};

use crate::config::pipeline::{CleanupPolicy, PipelineConfig};
use crate::data_model::{
    DocumentFailure, DocumentSummary, DocumentTask, ProcessingResult, StoreRecord, TextDocument,
};
use crate::error::{PipelineError, Result};
use crate::executor::PipelineExecutor;
use crate::pipeline::analysis::{build_pipeline_from_config, classify};
use crate::pipeline::downloader::{download_to, temp_path_for, Fetcher};
use crate::pipeline::extractor::TextExtractor;
use crate::store::DocumentStore;
use crate::utils::prometheus_metrics::*;

/// Where a document is in its lifecycle. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Pending,
    Downloading,
    Extracting,
    Analyzing,
    Persisting,
    Done,
    Failed,
}

// Keeps the gauge honest even if processing unwinds.
struct ActiveDocumentGuard;

impl ActiveDocumentGuard {
    fn new() -> Self {
        ACTIVE_DOCUMENTS.inc();
        ActiveDocumentGuard
    }
}

impl Drop for ActiveDocumentGuard {
    fn drop(&mut self) {
        ACTIVE_DOCUMENTS.dec();
    }
}

/// Download -> extract -> analyze -> persist for a single document.
///
/// `process` never fails: every error becomes a [`DocumentFailure`] that is persisted
/// (best effort) and returned, so one bad document cannot affect its siblings.
pub struct DocumentProcessor {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn TextExtractor>,
    store: Arc<dyn DocumentStore>,
    executor: PipelineExecutor,
    temp_dir: PathBuf,
    cleanup: CleanupPolicy,
}

impl DocumentProcessor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn TextExtractor>,
        store: Arc<dyn DocumentStore>,
        executor: PipelineExecutor,
    ) -> Self {
        DocumentProcessor {
            fetcher,
            extractor,
            store,
            executor,
            temp_dir: PathBuf::from("."),
            cleanup: CleanupPolicy::default(),
        }
    }

    /// Processor whose analysis steps, temp dir and cleanup policy come from `config`.
    pub fn from_config(
        config: &PipelineConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn TextExtractor>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let executor = PipelineExecutor::new(build_pipeline_from_config(&config.analysis));
        DocumentProcessor::new(fetcher, extractor, store, executor)
            .with_temp_dir(config.temp_dir.clone())
            .with_cleanup_policy(config.cleanup)
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    pub fn with_cleanup_policy(mut self, cleanup: CleanupPolicy) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn temp_path(&self, task: &DocumentTask) -> PathBuf {
        temp_path_for(&self.temp_dir, &task.name)
    }

    pub fn process(&self, task: &DocumentTask) -> ProcessingResult {
        let span = info_span!("process_document", doc = %task.name);
        let _enter = span.enter();
        let _active = ActiveDocumentGuard::new();
        let _timer = DOCUMENT_PROCESSING_DURATION_SECONDS.start_timer();
        DOCUMENTS_PROCESSED_TOTAL.inc();

        let start = Instant::now();
        let pdf_path = self.temp_path(task);
        let mut stage = ProcessingStage::Pending;

        match self.run_stages(task, &pdf_path, start, &mut stage) {
            Ok(summary) => {
                advance(&mut stage, ProcessingStage::Done);
                DOCUMENTS_SUCCEEDED_TOTAL.inc();
                info!(
                    "Document {} processed and stored in {:.2} seconds.",
                    task.name,
                    start.elapsed().as_secs_f64()
                );
                if self.cleanup != CleanupPolicy::Never {
                    remove_temp_file(&pdf_path);
                }
                ProcessingResult::Success(summary)
            }
            Err(e) => {
                let failed_in = stage;
                advance(&mut stage, ProcessingStage::Failed);
                log_failure(task, failed_in, &e);
                if self.cleanup == CleanupPolicy::Always {
                    remove_temp_file(&pdf_path);
                }
                self.record_failure(task, &e.to_string(), start.elapsed().as_secs_f64())
            }
        }
    }

    /// Builds, persists (best effort) and returns a failure record.
    pub fn record_failure(
        &self,
        task: &DocumentTask,
        error: &str,
        processing_time: f64,
    ) -> ProcessingResult {
        DOCUMENTS_FAILED_TOTAL.inc();
        let failure = ProcessingResult::Failure(DocumentFailure {
            name: task.name.clone(),
            url: task.url.clone(),
            error: error.to_string(),
            processing_time,
        });
        if let Err(e) = self.store.upsert(&task.name, &StoreRecord::Document(failure.clone())) {
            STORE_WRITE_ERRORS_TOTAL.inc();
            error!(doc = %task.name, error = %e, "Failed to persist failure record");
        }
        failure
    }

    fn run_stages(
        &self,
        task: &DocumentTask,
        pdf_path: &Path,
        start: Instant,
        stage: &mut ProcessingStage,
    ) -> Result<DocumentSummary> {
        advance(stage, ProcessingStage::Downloading);
        download_to(self.fetcher.as_ref(), &task.url, pdf_path)?;

        advance(stage, ProcessingStage::Extracting);
        let text = self.extractor.extract(pdf_path)?;

        advance(stage, ProcessingStage::Analyzing);
        let document = self.executor.run_single(TextDocument::from_task(task, text))?;

        let length_category = document
            .length_category
            .unwrap_or_else(|| classify(&document.content));
        let summary = DocumentSummary {
            name: task.name.clone(),
            url: task.url.clone(),
            length_category,
            summary: document.summary.unwrap_or_default(),
            keywords: document.keywords,
            domain_specific_keywords: document.domain_specific_keywords,
            processing_time: start.elapsed().as_secs_f64(),
        };

        advance(stage, ProcessingStage::Persisting);
        self.store
            .upsert(
                &task.name,
                &StoreRecord::Document(ProcessingResult::Success(summary.clone())),
            )
            .inspect_err(|_| STORE_WRITE_ERRORS_TOTAL.inc())?;

        Ok(summary)
    }
}

fn advance(stage: &mut ProcessingStage, next: ProcessingStage) {
    let from = *stage;
    debug!(?from, to = ?next, "Stage transition");
    *stage = next;
}

fn log_failure(task: &DocumentTask, stage: ProcessingStage, err: &PipelineError) {
    let cause = err.root_cause();
    if cause.is_transport() {
        TRANSPORT_ERRORS_TOTAL.inc();
    }
    match cause {
        PipelineError::TlsVerificationError { .. } => {
            TLS_ERRORS_TOTAL.inc();
            error!(?stage, "SSL Error when downloading {}: {}", task.url, err);
        }
        PipelineError::TransportError { .. } => {
            error!(?stage, "Error downloading {}: {}", task.url, err);
        }
        PipelineError::ExtractionError(_) => {
            EXTRACTION_ERRORS_TOTAL.inc();
            error!(?stage, "Error extracting text for {}: {}", task.name, err);
        }
        _ => {}
    }
    error!(?stage, error = %err, "Error processing document {}", task.name);
}

fn remove_temp_file(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "Failed to remove temporary file");
    }
}

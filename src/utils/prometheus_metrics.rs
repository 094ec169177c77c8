// src/utils/prometheus_metrics.rs

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use prometheus::{
    gather, register_counter, register_gauge, register_histogram, Counter, Encoder, Gauge,
    Histogram, TextEncoder,
};

use crate::error::{PipelineError, Result};

pub static DOCUMENTS_PROCESSED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "pipeline_documents_processed_total",
        "Total number of documents that went through the pipeline."
    )
    .expect("Failed to register DOCUMENTS_PROCESSED_TOTAL counter")
});

pub static DOCUMENTS_SUCCEEDED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "pipeline_documents_succeeded_total",
        "Total number of documents summarized and stored."
    )
    .expect("Failed to register DOCUMENTS_SUCCEEDED_TOTAL counter")
});

pub static DOCUMENTS_FAILED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "pipeline_documents_failed_total",
        "Total number of documents recorded as failures."
    )
    .expect("Failed to register DOCUMENTS_FAILED_TOTAL counter")
});

pub static TRANSPORT_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "pipeline_transport_errors_total",
        "Total number of document downloads that failed."
    )
    .expect("Failed to register TRANSPORT_ERRORS_TOTAL counter")
});

pub static TLS_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "pipeline_tls_errors_total",
        "Total number of downloads rejected during TLS verification."
    )
    .expect("Failed to register TLS_ERRORS_TOTAL counter")
});

pub static EXTRACTION_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "pipeline_extraction_errors_total",
        "Total number of documents whose text could not be extracted."
    )
    .expect("Failed to register EXTRACTION_ERRORS_TOTAL counter")
});

pub static STORE_WRITE_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "pipeline_store_write_errors_total",
        "Total number of failed document store writes."
    )
    .expect("Failed to register STORE_WRITE_ERRORS_TOTAL counter")
});

pub static DOCUMENT_PROCESSING_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "pipeline_document_processing_duration_seconds",
        "Histogram of per-document processing durations (download to persisted record)."
    )
    .expect("Failed to register DOCUMENT_PROCESSING_DURATION_SECONDS histogram")
});

pub static ACTIVE_DOCUMENTS: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "pipeline_active_documents",
        "Number of documents currently being processed."
    )
    .expect("Failed to register ACTIVE_DOCUMENTS gauge")
});

/// Dumps the default registry in the Prometheus text exposition format.
pub fn write_metrics<P: AsRef<Path>>(path: P) -> Result<()> {
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    encoder
        .encode(&gather(), &mut buffer)
        .map_err(|e| PipelineError::Unexpected(format!("Could not encode prometheus metrics: {}", e)))?;
    fs::write(path.as_ref(), buffer)?;
    Ok(())
}

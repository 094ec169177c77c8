// src/bin/pdf_digest.rs

//! # PDF Digest Binary
//!
//! Runs one batch over a dataset of named PDF URLs:
//!
//! 1.  **Reading the dataset**: a JSON object mapping document names to URLs (optionally
//!     with a domain per document).
//!
//! 2.  **Processing**: every document is downloaded, its text extracted and passed through
//!     the configured analysis steps on a fixed-size worker pool. Each outcome, success or
//!     failure, is upserted into the JSON document store under the document's name.
//!
//! 3.  **Reporting**: once every document has a result, an aggregate performance report is
//!     recomputed from the store and written back under `performance_report`.
//!
//! A failing document never stops the batch. Only configuration, dataset or store errors
//! abort the run.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use indicatif::HumanDuration;
use tracing::{error, info, warn};
use PdfDigest::config::cli::{load_effective_config, Args};
use PdfDigest::error::Result;
use PdfDigest::pipeline::downloader::HttpFetcher;
use PdfDigest::pipeline::extractor::PdfTextExtractor;
use PdfDigest::pipeline::readers::{BaseReader, DatasetReader};
use PdfDigest::pipeline::{DocumentProcessor, PipelineRunner, ReportGenerator};
use PdfDigest::store::{DocumentStore, JsonFileStore};
use PdfDigest::utils::logging::init_tracing;
use PdfDigest::utils::prometheus_metrics::write_metrics;

fn main() -> Result<()> {
    let args = Args::parse();

    // Held until exit so buffered file logs are flushed.
    let _log_guard = init_tracing(args.log_json, args.log_dir.as_deref())?;

    if let Err(e) = run(&args) {
        error!("Pipeline aborted: {}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = load_effective_config(args)?;
    if args.validate_config {
        info!(
            steps = config.analysis.len(),
            workers = config.effective_workers(),
            "Configuration is valid."
        );
        return Ok(());
    }

    info!("PDF digest started.");
    info!("Dataset: {}", args.dataset.display());
    info!("Store: {}", args.store.display());
    info!("Temp directory: {}", config.temp_dir.display());

    fs::create_dir_all(&config.temp_dir)?;

    let tasks = DatasetReader::new(&args.dataset).read_tasks()?;
    if tasks.is_empty() {
        warn!("Dataset contains no documents.");
    }

    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::open(&args.store)?);
    let fetcher = Arc::new(HttpFetcher::new(&config.download)?);
    let processor = Arc::new(DocumentProcessor::from_config(
        &config,
        fetcher,
        Arc::new(PdfTextExtractor),
        Arc::clone(&store),
    ));

    let runner = PipelineRunner::new(processor, config.effective_workers())?
        .with_progress(!args.no_progress);
    let run = runner.run(&tasks);

    info!("--------------------");
    info!("Processing Summary:");
    info!("  Documents: {}", run.results.len());
    info!("    - Succeeded: {}", run.succeeded());
    info!("    - Failed: {}", run.failed());
    info!("  Elapsed: {}", HumanDuration(run.elapsed));
    info!("--------------------");

    // The report is a summary of what was stored. Losing it does not lose any document.
    match ReportGenerator::new(Arc::clone(&store)).generate() {
        Ok(report) => info!(
            "Report: {} documents, {} successful, {} failed, {:.2}s average.",
            report.total_documents,
            report.successful_documents,
            report.failed_documents,
            report.average_processing_time
        ),
        Err(e) => error!("Failed to generate performance report: {}", e),
    }

    if let Some(path) = &args.metrics_file {
        if let Err(e) = write_metrics(path) {
            error!("Failed to write metrics to {}: {}", path.display(), e);
        }
    }

    info!(
        "Pipeline completed. Total processing time: {:.2} seconds.",
        run.elapsed.as_secs_f64()
    );
    Ok(())
}

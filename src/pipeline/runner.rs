// src/pipeline/runner.rs

use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{error, info};

use crate::data_model::{DocumentTask, ProcessingResult};
use crate::error::{PipelineError, Result};
use crate::pipeline::processor::DocumentProcessor;
use crate::utils::common::panic_message;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {msg} {pos}/{len} ({percent}%) (ETA: {eta})";

/// What one run produced. `results` is ordered by document name.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub elapsed: Duration,
    pub results: Vec<ProcessingResult>,
}

impl PipelineRun {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Creates a progress bar for `total_items` documents, or a spinner when the total is 0.
fn create_progress_bar(total_items: u64, message: &str) -> ProgressBar {
    let pb = if total_items == 0 {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::new(total_items)
    };
    pb.set_message(message.to_string());
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()) // Fallback style
            .progress_chars("=> "),
    );
    pb
}

/// Fans tasks out over a fixed-size thread pool, one job per document, and waits
/// for all of them before returning.
pub struct PipelineRunner {
    processor: Arc<DocumentProcessor>,
    pool: ThreadPool,
    show_progress: bool,
}

impl PipelineRunner {
    pub fn new(processor: Arc<DocumentProcessor>, workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pdf-worker-{}", i))
            .build()
            .map_err(|e| PipelineError::Unexpected(format!("Failed to build worker pool: {}", e)))?;
        Ok(PipelineRunner {
            processor,
            pool,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Processes every task. Returns only once all of them have a result.
    pub fn run(&self, tasks: &[DocumentTask]) -> PipelineRun {
        let start = Instant::now();
        info!(
            documents = tasks.len(),
            workers = self.workers(),
            "Dispatching documents"
        );

        let pb = if self.show_progress {
            create_progress_bar(tasks.len() as u64, "Processing documents")
        } else {
            ProgressBar::hidden()
        };

        let (tx, rx) = mpsc::channel();
        self.pool.scope(|scope| {
            for task in tasks {
                let tx = tx.clone();
                let processor = &self.processor;
                let pb = &pb;
                scope.spawn(move |_| {
                    let result = process_isolated(processor, task);
                    pb.inc(1);
                    // The receiver lives past the scope, so this cannot fail.
                    let _ = tx.send(result);
                });
            }
        });
        drop(tx);

        let mut results: Vec<ProcessingResult> = rx.into_iter().collect();
        results.sort_by(|a, b| a.name().cmp(b.name()));
        pb.finish_with_message("Done");

        let elapsed = start.elapsed();
        info!(
            "All documents processed in {:.2} seconds.",
            elapsed.as_secs_f64()
        );
        PipelineRun { elapsed, results }
    }
}

// A panic inside one document's processing is recorded as that document's failure.
fn process_isolated(processor: &DocumentProcessor, task: &DocumentTask) -> ProcessingResult {
    let start = Instant::now();
    match panic::catch_unwind(AssertUnwindSafe(|| processor.process(task))) {
        Ok(result) => result,
        Err(payload) => {
            let message = format!("worker panicked: {}", panic_message(payload.as_ref()));
            error!(doc = %task.name, "{}", message);
            processor.record_failure(task, &message, start.elapsed().as_secs_f64())
        }
    }
}

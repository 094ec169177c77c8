use crate::data_model::TextDocument;
use crate::error::{PipelineError, Result};
use tracing::{debug, warn};

/// One analysis stage. Steps are shared across worker threads, hence `Send + Sync`.
pub trait ProcessingStep: Send + Sync {
    fn name(&self) -> &'static str; // For logging/error reporting

    fn process(&self, document: TextDocument) -> Result<TextDocument>;
}

pub struct PipelineExecutor {
    steps: Vec<Box<dyn ProcessingStep>>, // Holds the ordered steps
}

impl PipelineExecutor {
    pub fn new(steps: Vec<Box<dyn ProcessingStep>>) -> Self {
        if steps.is_empty() {
            warn!("Pipeline created with no steps.");
        }
        PipelineExecutor { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Runs every step in order, stopping at the first failure.
    pub fn run_single(&self, initial_document: TextDocument) -> Result<TextDocument> {
        let mut current_doc = initial_document;
        for step in &self.steps {
            debug!(doc = %current_doc.id, "Running step: {}", step.name());
            current_doc = step
                .process(current_doc)
                .map_err(|e| PipelineError::StepError {
                    step_name: step.name().to_string(),
                    source: Box::new(e),
                })?;
        }
        Ok(current_doc)
    }
}

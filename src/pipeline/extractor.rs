use std::fs;
use std::panic;
use std::path::Path;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::utils::common::panic_message;

/// Turns a downloaded document into plain text. No retries at this layer.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// `pdf-extract` backed extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|e| {
            PipelineError::ExtractionError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() == 0 {
            return Err(PipelineError::ExtractionError(format!(
                "'{}' is empty",
                path.display()
            )));
        }

        // The decoder panics on some malformed inputs; treat that like any other decode failure.
        match panic::catch_unwind(|| pdf_extract::extract_text(path)) {
            Ok(Ok(text)) => {
                debug!(path = %path.display(), chars = text.len(), "Extracted text");
                Ok(text)
            }
            Ok(Err(e)) => Err(PipelineError::ExtractionError(format!(
                "Error extracting text from {}: {}",
                path.display(),
                e
            ))),
            Err(payload) => Err(PipelineError::ExtractionError(format!(
                "PDF decoder panicked on {}: {}",
                path.display(),
                panic_message(payload.as_ref())
            ))),
        }
    }
}

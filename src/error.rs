use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The Error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("Failed to load dataset from '{path}': {reason}")]
    DatasetLoadError { path: String, reason: String },

    #[error("Transport error fetching '{url}': {reason}")]
    TransportError { url: String, reason: String },

    // Subtype of TransportError; only the logging differs.
    #[error("TLS verification failed for '{url}': {reason}")]
    TlsVerificationError { url: String, reason: String },

    #[error("Text extraction error: {0}")]
    ExtractionError(String),

    #[error("Failed to write record '{key}' to document store: {reason}")]
    StoreWriteError { key: String, reason: String },

    #[error("Failed to read from document store: {0}")]
    StoreReadError(String),

    #[error("Error in processing step '{step_name}': {source}")]
    StepError {
        step_name: String,
        source: Box<PipelineError>,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization/Deserialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// True for every network retrieval failure, TLS failures included.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PipelineError::TransportError { .. } | PipelineError::TlsVerificationError { .. }
        )
    }

    /// Unwraps `StepError` layers down to the error a step actually raised.
    pub fn root_cause(&self) -> &PipelineError {
        match self {
            PipelineError::StepError { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

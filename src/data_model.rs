use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store key reserved for the aggregate report. Must never be used as a document name.
pub const REPORT_KEY: &str = "performance_report";

pub const DEFAULT_DOMAIN: &str = "general";

/// One input unit, created once from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTask {
    pub name: String, // Unique within one run
    pub url: String,
    pub domain: String,
}

impl DocumentTask {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        DocumentTask {
            name: name.into(),
            url: url.into(),
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthCategory {
    Short,
    Medium,
    Long,
}

impl LengthCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthCategory::Short => "short",
            LengthCategory::Medium => "medium",
            LengthCategory::Long => "long",
        }
    }

    /// Divisor applied to the sentence count when sizing a summary.
    pub fn summary_divisor(&self) -> usize {
        match self {
            LengthCategory::Short => 3,
            LengthCategory::Medium => 4,
            LengthCategory::Long => 5,
        }
    }
}

impl fmt::Display for LengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document travelling through the analysis steps. Each step fills in its own field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDocument {
    pub id: String,
    pub domain: String,
    pub content: String,
    pub length_category: Option<LengthCategory>,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    pub domain_specific_keywords: Vec<String>,
}

impl TextDocument {
    pub fn from_task(task: &DocumentTask, content: String) -> Self {
        TextDocument {
            id: task.name.clone(),
            domain: task.domain.clone(),
            content,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub url: String,
    pub length_category: LengthCategory,
    pub summary: String,
    pub keywords: Vec<String>,
    pub domain_specific_keywords: Vec<String>,
    pub processing_time: f64, // seconds
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub name: String,
    pub url: String,
    pub error: String,
    pub processing_time: f64, // seconds
}

/// Outcome of processing one document. Exactly one is stored per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessingResult {
    Success(DocumentSummary),
    Failure(DocumentFailure),
}

impl ProcessingResult {
    pub fn name(&self) -> &str {
        match self {
            ProcessingResult::Success(s) => &s.name,
            ProcessingResult::Failure(f) => &f.name,
        }
    }

    pub fn processing_time(&self) -> f64 {
        match self {
            ProcessingResult::Success(s) => s.processing_time,
            ProcessingResult::Failure(f) => f.processing_time,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ProcessingResult::Success(_) => None,
            ProcessingResult::Failure(f) => Some(&f.error),
        }
    }
}

/// Corpus-wide statistics, stored under [`REPORT_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub name: String,
    pub total_documents: usize,
    pub successful_documents: usize,
    pub failed_documents: usize,
    pub total_processing_time: f64,
    pub average_processing_time: f64,
    pub generated_at: DateTime<Utc>,
}

/// Everything the document store holds: per-document results plus the report singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreRecord {
    // Report first: a document record never carries `total_documents`.
    Report(AggregateReport),
    Document(ProcessingResult),
}

impl StoreRecord {
    pub fn as_document(&self) -> Option<&ProcessingResult> {
        match self {
            StoreRecord::Document(result) => Some(result),
            StoreRecord::Report(_) => None,
        }
    }

    pub fn as_report(&self) -> Option<&AggregateReport> {
        match self {
            StoreRecord::Report(report) => Some(report),
            StoreRecord::Document(_) => None,
        }
    }
}

impl From<ProcessingResult> for StoreRecord {
    fn from(result: ProcessingResult) -> Self {
        StoreRecord::Document(result)
    }
}

impl From<AggregateReport> for StoreRecord {
    fn from(report: AggregateReport) -> Self {
        StoreRecord::Report(report)
    }
}

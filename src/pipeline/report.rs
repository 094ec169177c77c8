// src/pipeline/report.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::data_model::{AggregateReport, StoreRecord, REPORT_KEY};
use crate::error::Result;
use crate::store::DocumentStore;

/// Aggregates over every document record in `records`. The report record (by key or
/// by shape) is never counted, so reruns do not skew the figures.
pub fn compute_report(records: &[(String, StoreRecord)]) -> AggregateReport {
    let mut total_documents = 0usize;
    let mut successful_documents = 0usize;
    let mut total_processing_time = 0.0f64;

    for (key, record) in records {
        if key == REPORT_KEY {
            continue;
        }
        let Some(result) = record.as_document() else {
            continue;
        };
        total_documents += 1;
        if result.is_success() {
            successful_documents += 1;
        }
        total_processing_time += result.processing_time();
    }

    let average_processing_time = if total_documents > 0 {
        total_processing_time / total_documents as f64
    } else {
        0.0
    };

    AggregateReport {
        name: REPORT_KEY.to_string(),
        total_documents,
        successful_documents,
        failed_documents: total_documents - successful_documents,
        total_processing_time,
        average_processing_time,
        generated_at: Utc::now(),
    }
}

/// Recomputes the aggregate report from the store and upserts it under [`REPORT_KEY`].
/// Must only run after the pipeline runner has returned.
pub struct ReportGenerator {
    store: Arc<dyn DocumentStore>,
}

impl ReportGenerator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ReportGenerator { store }
    }

    pub fn generate(&self) -> Result<AggregateReport> {
        let records = self.store.scan()?;
        let report = compute_report(&records);
        self.store
            .upsert(REPORT_KEY, &StoreRecord::Report(report.clone()))?;
        info!(
            total = report.total_documents,
            successful = report.successful_documents,
            failed = report.failed_documents,
            average_seconds = report.average_processing_time,
            "Performance report generated and stored."
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{
        DocumentFailure, DocumentSummary, LengthCategory, ProcessingResult,
    };

    fn success(name: &str, time: f64) -> (String, StoreRecord) {
        (
            name.to_string(),
            StoreRecord::Document(ProcessingResult::Success(DocumentSummary {
                name: name.to_string(),
                url: "http://x/a.pdf".to_string(),
                length_category: LengthCategory::Short,
                summary: String::new(),
                keywords: vec![],
                domain_specific_keywords: vec![],
                processing_time: time,
            })),
        )
    }

    fn failure(name: &str, time: f64) -> (String, StoreRecord) {
        (
            name.to_string(),
            StoreRecord::Document(ProcessingResult::Failure(DocumentFailure {
                name: name.to_string(),
                url: "http://x/b.pdf".to_string(),
                error: "boom".to_string(),
                processing_time: time,
            })),
        )
    }

    #[test]
    fn test_counts_and_timings() {
        let records = vec![success("a", 1.0), success("b", 2.0), failure("c", 3.0)];
        let report = compute_report(&records);
        assert_eq!(report.total_documents, 3);
        assert_eq!(report.successful_documents, 2);
        assert_eq!(report.failed_documents, 1);
        assert_eq!(report.total_processing_time, 6.0);
        assert_eq!(report.average_processing_time, 2.0);
        assert_eq!(report.name, REPORT_KEY);
    }

    #[test]
    fn test_empty_store_average_is_zero() {
        let report = compute_report(&[]);
        assert_eq!(report.total_documents, 0);
        assert_eq!(report.average_processing_time, 0.0);
    }

    #[test]
    fn test_previous_report_is_excluded() {
        let previous = compute_report(&[success("a", 1.0)]);
        let records = vec![
            success("a", 1.0),
            (REPORT_KEY.to_string(), StoreRecord::Report(previous)),
        ];
        let report = compute_report(&records);
        assert_eq!(report.total_documents, 1);
        assert_eq!(report.successful_documents + report.failed_documents, 1);
    }
}

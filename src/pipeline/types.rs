//! Errors and batch summaries for the ingestion triggers.

use serde::Serialize;
use thiserror::Error;

use crate::extract::ExtractionError;
use crate::knowledge_base::KnowledgeBaseError;
use crate::storage::StorageError;

/// Errors raised while processing one object.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The object body could not be read.
    #[error("Failed to read object: {0}")]
    Storage(#[from] StorageError),
    /// The object body is not a readable PDF.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// The knowledge base rejected the document.
    #[error("Failed to ingest document: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),
}

/// One object that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedObject {
    /// Object key.
    pub key: String,
    /// Rendered failure.
    pub error: String,
}

/// Outcome of one trigger invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Objects the pipeline attempted to process.
    pub attempted: usize,
    /// Document identifiers submitted successfully, in processing order.
    pub ingested: Vec<String>,
    /// Objects that failed, in processing order.
    pub failed: Vec<FailedObject>,
    /// Keys seen during a listing but rejected by the filter.
    pub skipped: usize,
    /// Listing failure that ended enumeration early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,
}

impl BatchReport {
    /// Record the result of processing one object.
    pub(crate) fn record(&mut self, key: &str, result: Result<String, PipelineError>) {
        self.attempted += 1;
        match result {
            Ok(document_id) => self.ingested.push(document_id),
            Err(error) => self.failed.push(FailedObject {
                key: key.to_string(),
                error: error.to_string(),
            }),
        }
    }

    /// True when every attempted object was ingested and enumeration completed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.listing_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionError;

    #[test]
    fn record_tracks_successes_and_failures() {
        let mut report = BatchReport::default();
        report.record("a.pdf", Ok("a.pdf".into()));
        report.record("b.pdf", Err(ExtractionError::NotPdf.into()));

        assert_eq!(report.attempted, 2);
        assert_eq!(report.ingested, vec!["a.pdf".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].key, "b.pdf");
        assert!(report.failed[0].error.contains("not a PDF"));
        assert!(!report.is_clean());
    }

    #[test]
    fn listing_error_is_omitted_from_json_when_absent() {
        let json = serde_json::to_value(BatchReport::default()).expect("json");
        assert!(json.get("listing_error").is_none());
        assert_eq!(json["attempted"], 0);
    }
}

//! Ingestion pipeline shared by the upload trigger, the rescan, and the manual trigger.

use futures_util::StreamExt;
use std::sync::Arc;

use crate::extract::{self, ExtractionError};
use crate::ingest::{DocumentIngestor, PDF_DOCUMENT_TYPE};
use crate::pipeline::event::{S3Notification, UploadEvent};
use crate::pipeline::filter::matches_rescan_filter;
use crate::pipeline::types::{BatchReport, PipelineError};
use crate::storage::ObjectStore;

/// Function turning a PDF payload into text.
pub type Extractor = fn(&[u8]) -> Result<String, ExtractionError>;

/// Fetches objects, extracts their text, and submits one document per object.
///
/// Every object is handled to completion before the next one starts. The document identifier
/// is always the object key, so processing the same key again replaces the earlier record.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn ObjectStore>,
    ingestor: Arc<DocumentIngestor>,
    bucket: String,
    rescan_marker: String,
    extractor: Extractor,
}

impl IngestionPipeline {
    /// Build a pipeline reading from `bucket` through `store`.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        ingestor: Arc<DocumentIngestor>,
        bucket: impl Into<String>,
        rescan_marker: impl Into<String>,
    ) -> Self {
        Self {
            store,
            ingestor,
            bucket: bucket.into(),
            rescan_marker: rescan_marker.into().to_lowercase(),
            extractor: extract::extract_text,
        }
    }

    /// Replace the PDF extractor.
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Same ingestor and filter, reading from another store and bucket.
    pub fn with_store(&self, store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            ..self.clone()
        }
    }

    /// Bucket read by rescans and used when a record names none.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Fetch, extract, and ingest one object. Returns the submitted document identifier.
    ///
    /// Extraction failures return before any ingestion call is made.
    pub async fn process_object(&self, bucket: &str, key: &str) -> Result<String, PipelineError> {
        tracing::debug!(bucket, key, "Processing object");
        let bytes = self.store.get_object(bucket, key).await?;
        let text = (self.extractor)(&bytes)?;
        let document_id = key;
        self.ingestor
            .ingest(&text, document_id, key, Some(PDF_DOCUMENT_TYPE))
            .await?;
        Ok(document_id.to_string())
    }

    /// Process every record of an object-created notification.
    ///
    /// A failing record is logged and recorded; the remaining records are still processed.
    pub async fn handle_upload_event(&self, notification: &S3Notification) -> BatchReport {
        let events = notification.upload_events(&self.bucket);
        tracing::info!(records = events.len(), "Handling upload notification");

        let mut report = BatchReport::default();
        for UploadEvent { bucket, key } in events {
            let result = self.process_object(&bucket, &key).await;
            log_outcome(&bucket, &key, &result);
            report.record(&key, result);
        }

        log_report("upload", &report);
        report
    }

    /// Enumerate the configured bucket and ingest every key passing the rescan filter.
    pub async fn rescan(&self) -> BatchReport {
        self.rescan_bucket(&self.bucket).await
    }

    /// Enumerate `bucket` and ingest every key passing the rescan filter.
    ///
    /// A listing failure stops enumeration; objects processed before it stay in the report.
    pub async fn rescan_bucket(&self, bucket: &str) -> BatchReport {
        tracing::info!(bucket, marker = %self.rescan_marker, "Starting rescan");
        let mut report = BatchReport::default();
        let mut keys = self.store.list_keys(bucket);

        while let Some(next) = keys.next().await {
            let key = match next {
                Ok(key) => key,
                Err(error) => {
                    tracing::error!(bucket, error = %error, "Listing failed; stopping rescan");
                    report.listing_error = Some(error.to_string());
                    break;
                }
            };

            if !matches_rescan_filter(&key, &self.rescan_marker) {
                tracing::trace!(bucket, key = %key, "Key rejected by rescan filter");
                report.skipped += 1;
                continue;
            }

            let result = self.process_object(bucket, &key).await;
            log_outcome(bucket, &key, &result);
            report.record(&key, result);
        }

        log_report("rescan", &report);
        report
    }
}

fn log_outcome(bucket: &str, key: &str, result: &Result<String, PipelineError>) {
    match result {
        Ok(document_id) => tracing::info!(bucket, key, document_id = %document_id, "Ingested object"),
        Err(error) => tracing::error!(bucket, key, error = %error, "Failed to ingest object"),
    }
}

fn log_report(trigger: &str, report: &BatchReport) {
    tracing::info!(
        trigger,
        attempted = report.attempted,
        ingested = report.ingested.len(),
        failed = report.failed.len(),
        skipped = report.skipped,
        listing_error = ?report.listing_error,
        "Trigger finished"
    );
}

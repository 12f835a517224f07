//! Document construction and submission to the knowledge base.

use std::sync::Arc;

use crate::knowledge_base::payload::current_timestamp_rfc3339;
use crate::knowledge_base::{
    Document, IngestReceipt, KnowledgeBase, KnowledgeBaseError, KnowledgeBaseHandle,
};

/// Maximum number of characters submitted per document; longer text is cut, not chunked.
pub const MAX_DOCUMENT_CHARS: usize = 10_000;

/// Type tag attached to documents extracted from PDF uploads.
pub const PDF_DOCUMENT_TYPE: &str = "pdf";

/// Return the first `max_chars` characters of `text` (the whole text when shorter).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Builds document records and submits them one per call.
pub struct DocumentIngestor {
    knowledge_base: Arc<dyn KnowledgeBase>,
    handle: KnowledgeBaseHandle,
}

impl DocumentIngestor {
    /// Bind an ingestor to a knowledge base client and target handle.
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>, handle: KnowledgeBaseHandle) -> Self {
        Self {
            knowledge_base,
            handle,
        }
    }

    /// Knowledge base receiving documents.
    pub fn handle(&self) -> &KnowledgeBaseHandle {
        &self.handle
    }

    /// Build the record submitted for `text`, truncated to [`MAX_DOCUMENT_CHARS`].
    pub fn build_document(
        text: &str,
        document_id: &str,
        source: &str,
        doc_type: Option<&str>,
    ) -> Document {
        Document {
            id: document_id.to_string(),
            text: truncate_chars(text, MAX_DOCUMENT_CHARS).to_string(),
            source: source.to_string(),
            doc_type: doc_type.map(str::to_string),
            ingested_at: current_timestamp_rfc3339(),
        }
    }

    /// Submit exactly one document. Failures are returned to the caller and never retried.
    pub async fn ingest(
        &self,
        text: &str,
        document_id: &str,
        source: &str,
        doc_type: Option<&str>,
    ) -> Result<IngestReceipt, KnowledgeBaseError> {
        let document = Self::build_document(text, document_id, source, doc_type);
        let submitted_chars = document.text.chars().count();
        let truncated = submitted_chars < text.chars().count();

        let receipts = self
            .knowledge_base
            .ingest_documents(&self.handle, vec![document])
            .await?;
        let receipt = receipts.into_iter().next().unwrap_or_else(|| IngestReceipt {
            document_id: document_id.to_string(),
            status: None,
        });

        tracing::info!(
            knowledge_base = %self.handle.id,
            document_id,
            source,
            chars = submitted_chars,
            truncated,
            status = ?receipt.status,
            "Document submitted for ingestion"
        );
        Ok(receipt)
    }
}

//! Shared types used by the knowledge base seam and its adapters.

use serde::Serialize;
use thiserror::Error;

/// Errors returned while interacting with the knowledge base.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    /// The remote call failed or was rejected.
    #[error("Knowledge base request failed: {0}")]
    Request(String),
    /// The document could not be expressed as an ingestion request.
    #[error("Invalid knowledge base document: {0}")]
    InvalidDocument(String),
}

/// Opaque reference to the managed knowledge base and the custom data source fed by ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseHandle {
    /// Knowledge base identifier.
    pub id: String,
    /// Custom data source identifier receiving direct ingestion.
    pub data_source_id: String,
}

impl KnowledgeBaseHandle {
    /// Build a handle from its identifiers.
    pub fn new(id: impl Into<String>, data_source_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_source_id: data_source_id.into(),
        }
    }
}

/// Document record submitted for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Key under which the record is stored or replaced.
    pub id: String,
    /// Extracted text, already truncated.
    pub text: String,
    /// Originating object key.
    pub source: String,
    /// Optional type tag (`pdf` for extracted uploads).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// RFC 3339 timestamp of the ingestion call.
    pub ingested_at: String,
}

/// Acknowledgement returned for one submitted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    /// Identifier of the document the acknowledgement refers to.
    pub document_id: String,
    /// Status reported by the service (for example `STARTING` or `IN_PROGRESS`).
    pub status: Option<String>,
}

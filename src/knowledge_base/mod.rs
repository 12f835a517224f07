//! Managed knowledge base integration.

pub mod bedrock;
pub mod payload;
pub mod types;

use async_trait::async_trait;

pub use bedrock::BedrockKnowledgeBase;
pub use types::{Document, IngestReceipt, KnowledgeBaseError, KnowledgeBaseHandle};

/// Remote operations the ingestion pipeline and the front end need from the knowledge base.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Submit documents for indexing in a single call.
    async fn ingest_documents(
        &self,
        handle: &KnowledgeBaseHandle,
        documents: Vec<Document>,
    ) -> Result<Vec<IngestReceipt>, KnowledgeBaseError>;

    /// Count the data sources registered on the knowledge base.
    async fn count_data_sources(&self, knowledge_base_id: &str)
    -> Result<usize, KnowledgeBaseError>;
}

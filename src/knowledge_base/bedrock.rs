//! Bedrock Agent client wrapper for knowledge base ingestion and data source listing.

use async_trait::async_trait;
use aws_sdk_bedrockagent::Client;
use aws_sdk_bedrockagent::error::DisplayErrorContext;
use aws_sdk_bedrockagent::types::KnowledgeBaseDocumentDetail;

use super::KnowledgeBase;
use super::payload::build_document;
use super::types::{Document, IngestReceipt, KnowledgeBaseError, KnowledgeBaseHandle};

/// Knowledge base backed by the Bedrock Agent control-plane API.
#[derive(Clone)]
pub struct BedrockKnowledgeBase {
    client: Client,
}

impl BedrockKnowledgeBase {
    /// Wrap an SDK client built from the shared AWS configuration.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from a loaded AWS configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl KnowledgeBase for BedrockKnowledgeBase {
    async fn ingest_documents(
        &self,
        handle: &KnowledgeBaseHandle,
        documents: Vec<Document>,
    ) -> Result<Vec<IngestReceipt>, KnowledgeBaseError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self
            .client
            .ingest_knowledge_base_documents()
            .knowledge_base_id(&handle.id)
            .data_source_id(&handle.data_source_id);
        for document in &documents {
            request = request.documents(build_document(document)?);
        }

        let output = request.send().await.map_err(|err| {
            let error = KnowledgeBaseError::Request(DisplayErrorContext(&err).to_string());
            tracing::error!(
                knowledge_base = %handle.id,
                data_source = %handle.data_source_id,
                error = %error,
                "Failed to ingest documents"
            );
            error
        })?;

        let details = output.document_details();
        let receipts = match_receipts(&documents, details);

        tracing::debug!(
            knowledge_base = %handle.id,
            documents = documents.len(),
            acknowledged = details.len(),
            "Documents submitted"
        );
        Ok(receipts)
    }

    async fn count_data_sources(
        &self,
        knowledge_base_id: &str,
    ) -> Result<usize, KnowledgeBaseError> {
        let output = self
            .client
            .list_data_sources()
            .knowledge_base_id(knowledge_base_id)
            .send()
            .await
            .map_err(|err| KnowledgeBaseError::Request(DisplayErrorContext(&err).to_string()))?;
        Ok(output.data_source_summaries().len())
    }
}

/// Pair each submitted document with the service's acknowledgement.
///
/// Details are matched by custom identifier, falling back to submission order.
fn match_receipts(
    documents: &[Document],
    details: &[KnowledgeBaseDocumentDetail],
) -> Vec<IngestReceipt> {
    documents
        .iter()
        .enumerate()
        .map(|(index, document)| {
            let detail = details
                .iter()
                .find(|detail| {
                    detail
                        .identifier()
                        .and_then(|identifier| identifier.custom())
                        .is_some_and(|custom| custom.id() == document.id)
                })
                .or_else(|| details.get(index));
            IngestReceipt {
                document_id: document.id.clone(),
                status: detail.map(|detail| detail.status().as_str().to_string()),
            }
        })
        .collect()
}

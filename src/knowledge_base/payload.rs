//! Helpers for expressing [`Document`] records as Bedrock ingestion payloads.

use aws_sdk_bedrockagent::types::{
    ContentDataSourceType, CustomContent, CustomDocumentIdentifier, CustomSourceType,
    DocumentContent, DocumentMetadata, InlineContent, InlineContentType, KnowledgeBaseDocument,
    MetadataAttribute, MetadataAttributeValue, MetadataSourceType, MetadataValueType,
    TextContentDoc,
};
use time::OffsetDateTime;

use super::types::{Document, KnowledgeBaseError};

/// Current UTC time formatted as RFC 3339.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Metadata attributes attached to each document, in a stable order.
pub(crate) fn metadata_pairs(document: &Document) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("source", document.source.clone())];
    if let Some(doc_type) = document
        .doc_type
        .as_ref()
        .filter(|value| !value.is_empty())
    {
        pairs.push(("type", doc_type.clone()));
    }
    pairs.push(("ingested_at", document.ingested_at.clone()));
    pairs
}

/// Build the inline, custom-source ingestion payload for one document.
pub(crate) fn build_document(
    document: &Document,
) -> Result<KnowledgeBaseDocument, KnowledgeBaseError> {
    let identifier = CustomDocumentIdentifier::builder()
        .id(&document.id)
        .build()
        .map_err(invalid)?;
    let text = TextContentDoc::builder()
        .data(&document.text)
        .build()
        .map_err(invalid)?;
    let inline = InlineContent::builder()
        .r#type(InlineContentType::Text)
        .text_content(text)
        .build()
        .map_err(invalid)?;
    let custom = CustomContent::builder()
        .custom_document_identifier(identifier)
        .source_type(CustomSourceType::InLine)
        .inline_content(inline)
        .build()
        .map_err(invalid)?;
    let content = DocumentContent::builder()
        .data_source_type(ContentDataSourceType::Custom)
        .custom(custom)
        .build()
        .map_err(invalid)?;

    let mut metadata = DocumentMetadata::builder().r#type(MetadataSourceType::InLineAttribute);
    for (key, value) in metadata_pairs(document) {
        let value = MetadataAttributeValue::builder()
            .r#type(MetadataValueType::String)
            .string_value(value)
            .build()
            .map_err(invalid)?;
        let attribute = MetadataAttribute::builder()
            .key(key)
            .value(value)
            .build()
            .map_err(invalid)?;
        metadata = metadata.inline_attributes(attribute);
    }
    let metadata = metadata.build().map_err(invalid)?;

    Ok(KnowledgeBaseDocument::builder()
        .content(content)
        .metadata(metadata)
        .build())
}

fn invalid(err: impl std::fmt::Display) -> KnowledgeBaseError {
    KnowledgeBaseError::InvalidDocument(err.to_string())
}

//! Lambda entry point for the PDF upload trigger.
//!
//! Object-created notifications are processed record by record. An invocation without records
//! (a manual test invoke) walks `LOCAL_DOCS_DIR` instead and ingests the matching files found
//! there. The batch report is returned as the invocation result.
use anyhow::Context;
use devgenius::{
    aws,
    config::{self, IngestConfig},
    ingest::DocumentIngestor,
    knowledge_base::{BedrockKnowledgeBase, KnowledgeBaseHandle},
    logging,
    pipeline::{BatchReport, IngestionPipeline, S3Notification},
    storage::{LocalDirStore, S3ObjectStore},
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init_tracing();
    let config = config::init_ingest_config().context("failed to load ingestion config")?;
    let pipeline = build_pipeline(&config).await;
    let local_dir = config.local_docs_dir.clone();

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let pipeline = pipeline.clone();
        let local_dir = local_dir.clone();
        async move {
            let (payload, context) = event.into_parts();
            tracing::info!(request_id = %context.request_id, "Invocation received");
            let report = handle(&pipeline, &local_dir, payload).await?;
            Ok::<Value, Error>(serde_json::to_value(report)?)
        }
    }))
    .await
}

async fn build_pipeline(config: &IngestConfig) -> IngestionPipeline {
    let sdk_config = aws::load_sdk_config(config.aws_region.as_deref(), None).await;
    let ingestor = DocumentIngestor::new(
        Arc::new(BedrockKnowledgeBase::from_conf(&sdk_config)),
        KnowledgeBaseHandle::new(&config.knowledge_base_id, &config.data_source_id),
    );
    IngestionPipeline::new(
        Arc::new(S3ObjectStore::from_conf(&sdk_config)),
        Arc::new(ingestor),
        &config.pdf_bucket,
        &config.rescan_marker,
    )
}

async fn handle(
    pipeline: &IngestionPipeline,
    local_dir: &std::path::Path,
    payload: Value,
) -> Result<BatchReport, Error> {
    let notification = S3Notification::from_value(payload).context("malformed notification")?;
    if notification.is_manual_invocation() {
        tracing::info!(dir = %local_dir.display(), "No records; processing local directory");
        let local = pipeline.with_store(
            Arc::new(LocalDirStore::new(local_dir)),
            local_dir.display().to_string(),
        );
        return Ok(local.rescan().await);
    }
    Ok(pipeline.handle_upload_event(&notification).await)
}

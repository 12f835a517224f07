use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use devgenius::{
    aws,
    config::{self, IngestConfig},
    ingest::DocumentIngestor,
    knowledge_base::{BedrockKnowledgeBase, KnowledgeBaseHandle},
    logging,
    pipeline::{BatchReport, IngestionPipeline, S3Notification},
    storage::{LocalDirStore, S3ObjectStore},
};

#[derive(Parser)]
#[command(
    name = "kb-rescan",
    about = "Re-ingest PDFs into the Bedrock knowledge base outside the upload trigger"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enumerate a bucket and ingest every matching PDF.
    Bucket {
        /// Bucket to scan (defaults to `PDF_BUCKET`).
        #[arg(long)]
        bucket: Option<String>,
        /// Lowercase substring keys must contain (defaults to `RESCAN_KEY_MARKER`).
        #[arg(long)]
        marker: Option<String>,
    },
    /// Ingest matching PDFs from a local directory.
    Local {
        /// Directory to walk (defaults to `LOCAL_DOCS_DIR`).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replay an object-created notification stored as JSON.
    Event {
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    logging::init_tracing();
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_ingest_config().context("failed to load ingestion config")?;
    let sdk_config = aws::load_sdk_config(config.aws_region.as_deref(), None).await;
    let ingestor = Arc::new(DocumentIngestor::new(
        Arc::new(BedrockKnowledgeBase::from_conf(&sdk_config)),
        KnowledgeBaseHandle::new(&config.knowledge_base_id, &config.data_source_id),
    ));
    let s3 = Arc::new(S3ObjectStore::from_conf(&sdk_config));

    let report = match cli.command {
        Command::Bucket { bucket, marker } => {
            let pipeline = IngestionPipeline::new(
                s3,
                ingestor,
                bucket.unwrap_or_else(|| config.pdf_bucket.clone()),
                marker.unwrap_or_else(|| config.rescan_marker.clone()),
            );
            pipeline.rescan().await
        }
        Command::Local { dir } => {
            let dir = dir.unwrap_or_else(|| config.local_docs_dir.clone());
            local_pipeline(&config, ingestor, dir).rescan().await
        }
        Command::Event { input } => {
            let raw = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("failed to read notification at {}", input.display()))?;
            let value = serde_json::from_str(&raw).context("failed to parse notification json")?;
            let notification = S3Notification::from_value(value)
                .context("notification does not match the expected shape")?;
            if notification.is_manual_invocation() {
                bail!("notification at {} has no records", input.display());
            }
            IngestionPipeline::new(s3, ingestor, &config.pdf_bucket, &config.rescan_marker)
                .handle_upload_event(&notification)
                .await
        }
    };

    print_report(&report)?;
    if !report.is_clean() {
        bail!(
            "{} object(s) failed{}",
            report.failed.len(),
            if report.listing_error.is_some() {
                " and listing stopped early"
            } else {
                ""
            }
        );
    }
    Ok(())
}

fn local_pipeline(
    config: &IngestConfig,
    ingestor: Arc<DocumentIngestor>,
    dir: PathBuf,
) -> IngestionPipeline {
    let label = dir.display().to_string();
    IngestionPipeline::new(
        Arc::new(LocalDirStore::new(dir)),
        ingestor,
        label,
        &config.rescan_marker,
    )
}

fn print_report(report: &BatchReport) -> Result<()> {
    let rendered = serde_json::to_string_pretty(report).context("failed to render report")?;
    println!("{rendered}");
    Ok(())
}

//! Upload and rescan triggers: object fetch, text extraction, and knowledge base ingestion.

pub mod event;
pub mod filter;
mod service;
pub mod types;

pub use event::{S3Notification, UploadEvent};
pub use filter::matches_rescan_filter;
pub use service::{Extractor, IngestionPipeline};
pub use types::{BatchReport, FailedObject, PipelineError};

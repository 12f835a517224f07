#![deny(missing_docs)]

//! Core library for the DevGenius PDF ingestion triggers and query front end.

/// Conversational agent client.
pub mod agent;
/// AWS SDK configuration loading.
pub mod aws;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extract;
/// HTTP query front end.
pub mod frontend;
/// Document construction and submission.
pub mod ingest;
/// Managed knowledge base integration.
pub mod knowledge_base;
/// Structured logging and tracing setup.
pub mod logging;
/// Upload and rescan triggers.
pub mod pipeline;
/// Object storage backends.
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

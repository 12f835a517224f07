//! Object storage seam: fetching uploaded PDFs and enumerating bucket contents.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use futures_core::Stream;
use std::pin::Pin;
use thiserror::Error;

pub use local::LocalDirStore;
pub use s3::S3ObjectStore;

/// Errors raised by object storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Fetching an object body failed.
    #[error("Failed to fetch s3://{bucket}/{key}: {message}")]
    Fetch {
        /// Bucket addressed by the request.
        bucket: String,
        /// Key addressed by the request.
        key: String,
        /// Provider error rendered for logs.
        message: String,
    },
    /// Listing a bucket failed part-way through.
    #[error("Failed to list bucket {bucket}: {message}")]
    List {
        /// Bucket being enumerated.
        bucket: String,
        /// Provider error rendered for logs.
        message: String,
    },
    /// Local filesystem access failed.
    #[error("Local storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lazily produced object keys; pages are fetched as the stream is polled.
pub type KeyStream<'a> = Pin<Box<dyn Stream<Item = Result<String, StorageError>> + Send + 'a>>;

/// Read access to a bucket of uploaded documents.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full body of one object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Enumerate every key in the bucket, page by page.
    ///
    /// Dropping the stream stops enumeration; calling again restarts from the first page.
    fn list_keys<'a>(&'a self, bucket: &'a str) -> KeyStream<'a>;
}

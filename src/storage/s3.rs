//! Amazon S3 backed object store.

use async_stream::try_stream;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use futures_core::Stream;

use super::{KeyStream, ObjectStore, StorageError};

/// Object store talking to Amazon S3 through the AWS SDK.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
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
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let fetch_error = |message: String| StorageError::Fetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| fetch_error(DisplayErrorContext(&err).to_string()))?;
        let body = output
            .body
            .collect()
            .await
            .map_err(|err| fetch_error(err.to_string()))?;
        let bytes = body.into_bytes().to_vec();
        tracing::debug!(bucket, key, bytes = bytes.len(), "Fetched object");
        Ok(bytes)
    }

    fn list_keys<'a>(&'a self, bucket: &'a str) -> KeyStream<'a> {
        Box::pin(stream_keys(&self.client, bucket))
    }
}

/// Stream every key of a bucket using the `ListObjectsV2` paginator.
fn stream_keys<'a>(
    client: &'a Client,
    bucket: &'a str,
) -> impl Stream<Item = Result<String, StorageError>> + Send + 'a {
    try_stream! {
        let mut pages = client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();
        let mut page_count = 0usize;

        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                tracing::error!(bucket, page = page_count, "Failed to list objects");
                StorageError::List {
                    bucket: bucket.to_string(),
                    message: DisplayErrorContext(&err).to_string(),
                }
            })?;
            page_count += 1;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    yield key.to_string();
                }
            }
        }
        tracing::debug!(bucket, pages = page_count, "Finished listing bucket");
    }
}

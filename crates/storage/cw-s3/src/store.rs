//! Listing and ranged reads.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use cw_error::{Result, StoreError};
use cw_traits::{ObjectStore, RangedBytes};
use cw_types::{FileDescriptor, S3Config};
use std::time::Instant;
use tracing::{debug, trace};

/// Object-store adapter over a shared S3 client.
///
/// Constructed once at startup and shared; the SDK client is safe for
/// concurrent use. Every operation records its wall-clock time into the
/// object-store counter, success or failure. No retries are attempted.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Create a store from configuration.
    pub async fn new(config: &S3Config) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(config).await,
        })
    }

    /// Wrap an already-built client (integration tests).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn list_inner(&self, bucket: &str, prefix: &str) -> Result<Vec<FileDescriptor>> {
        let mut files = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_bucket()) {
                    StoreError::NoSuchBucket(bucket.to_string())
                } else {
                    StoreError::List(format!("s3://{}/{}: {}", bucket, prefix, e))
                }
            })?;

            if let Some(contents) = response.contents {
                for object in contents {
                    let key = object.key.unwrap_or_default();

                    // Skip directory markers and empty keys
                    if key.is_empty() || key.ends_with('/') {
                        continue;
                    }

                    files.push(FileDescriptor {
                        key,
                        size: object.size.unwrap_or(0),
                    });
                }
            }

            if response.is_truncated == Some(true) {
                continuation_token = response.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!(bucket = bucket, prefix = prefix, count = files.len(), "Listed objects");
        Ok(files)
    }

    async fn get_range_inner(
        &self,
        bucket: &str,
        key: &str,
        start: i64,
        end: i64,
    ) -> Result<RangedBytes> {
        let range = format!("bytes={}-{}", start, end);

        trace!(bucket = bucket, key = key, range = %range, "Downloading byte range");

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .range(&range)
            .send()
            .await
            .map_err(|e| {
                StoreError::GetRange(format!("s3://{}/{} {}: {}", bucket, key, range, e))
            })?;

        // Verbatim, quotes included, as the store returned it.
        let etag = response.e_tag.clone().unwrap_or_default();

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| {
                StoreError::GetRange(format!(
                    "s3://{}/{} {}: failed to read body: {}",
                    bucket, key, range, e
                ))
            })?
            .into_bytes();

        Ok(RangedBytes { data, etag, range })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<FileDescriptor>> {
        let started = Instant::now();
        let result = self.list_inner(bucket, prefix).await;
        cw_metrics::record_object_store(started.elapsed());
        result
    }

    async fn get_range(
        &self,
        bucket: &str,
        key: &str,
        start: i64,
        end: i64,
    ) -> Result<RangedBytes> {
        let started = Instant::now();
        let result = self.get_range_inner(bucket, key, start, end).await;
        cw_metrics::record_object_store(started.elapsed());
        result
    }
}

//! End-to-end prefetch pipeline against LocalStack S3.

use crate::common::{generate_test_parquet, LocalStackTestContext};
use async_trait::async_trait;
use cw_engine::PrefetchEngine;
use cw_error::{Error, StoreError};
use cw_s3::S3Store;
use cw_traits::{ColumnCache, ObjectStore};
use cw_types::{ColumnBytes, PrefetchRequest, PrefetchingConfig};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Cache stand-in that records every SET (no Valkey cluster in LocalStack).
#[derive(Default)]
struct RecordingCache {
    puts: Mutex<Vec<ColumnBytes>>,
}

#[async_trait]
impl ColumnCache for RecordingCache {
    async fn put(&self, column: ColumnBytes) -> cw_error::Result<()> {
        self.puts.lock().push(column);
        Ok(())
    }
}

fn parse_range(range: &str) -> (usize, usize) {
    let (start, end) = range
        .strip_prefix("bytes=")
        .unwrap()
        .split_once('-')
        .unwrap();
    (start.parse().unwrap(), end.parse().unwrap())
}

#[tokio::test]
async fn test_prefetch_pipeline_end_to_end() {
    let ctx = LocalStackTestContext::new().await;
    if !ctx.is_available().await {
        eprintln!("LocalStack not available at {}, skipping", ctx.endpoint);
        return;
    }

    let bucket = "cw-it-prefetch";
    ctx.create_bucket(bucket).await.unwrap();

    let parquet = generate_test_parquet(500, 2);
    let etag = ctx
        .upload_object(bucket, "data/part-0.parquet", parquet.clone())
        .await
        .unwrap();
    ctx.upload_object(bucket, "data/manifest.txt", b"not parquet".to_vec())
        .await
        .unwrap();

    let store = Arc::new(S3Store::from_client(ctx.s3.clone()));
    let cache = Arc::new(RecordingCache::default());
    let engine = PrefetchEngine::new(
        store,
        cache.clone(),
        &PrefetchingConfig {
            concurrency_limit: 4,
        },
    );

    engine
        .prefetch(
            PrefetchRequest {
                bucket: bucket.to_string(),
                prefix: "data/".to_string(),
                columns: vec!["id".to_string(), "name".to_string()],
            },
            CancellationToken::new(),
        )
        .await
        .unwrap();

    let puts = cache.puts.lock();
    // Two requested columns in each of two row groups
    assert_eq!(puts.len(), 4);

    let column_names: HashSet<&str> = puts.iter().map(|p| p.column_name.as_str()).collect();
    assert_eq!(column_names, HashSet::from(["id", "name"]));
    for name in ["id", "name"] {
        assert_eq!(puts.iter().filter(|p| p.column_name == name).count(), 2);
    }

    for put in puts.iter() {
        // Only the parquet object was processed
        assert_eq!(put.key, "data/part-0.parquet");
        // The cached bytes are bound to the uploaded object version
        assert_eq!(put.etag, etag);

        let (start, end) = parse_range(&put.range);
        assert_eq!(put.data.len(), end - start + 1);
        assert_eq!(put.data.as_ref(), &parquet[start..=end]);
        assert_eq!(
            put.cache_key(),
            format!("s3://{}/data/part-0.parquet#{}#bytes={}-{}", bucket, etag, start, end)
        );
    }

    ctx.delete_object(bucket, "data/part-0.parquet").await.unwrap();
    ctx.delete_object(bucket, "data/manifest.txt").await.unwrap();
}

#[tokio::test]
async fn test_listing_missing_bucket_surfaces_error() {
    let ctx = LocalStackTestContext::new().await;
    if !ctx.is_available().await {
        eprintln!("LocalStack not available at {}, skipping", ctx.endpoint);
        return;
    }

    let store = S3Store::from_client(ctx.s3.clone());
    let error = store
        .list("cw-it-no-such-bucket", "data/")
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        Error::Store(StoreError::NoSuchBucket(_))
    ));
}

//! LocalStack test context and utilities.

use aws_sdk_s3::Client as S3Client;

/// LocalStack test context providing an S3 client.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let config = cw_types::S3Config {
            region: region.clone(),
            endpoint_url: Some(endpoint.clone()),
        };

        Self {
            s3: cw_s3::build_client(&config).await,
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        // Listing buckets fails quickly if LocalStack isn't running
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create an S3 bucket for testing.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Upload an object and return the ETag the store assigned it.
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
    ) -> Result<String, aws_sdk_s3::Error> {
        let result = self
            .s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(data.into())
            .content_type("application/octet-stream")
            .send()
            .await?;
        Ok(result.e_tag.unwrap_or_default())
    }

    /// Delete an S3 object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}

/// Generate Parquet data shaped like the datasets the prefetcher targets:
/// `row_groups` row groups so a requested column yields one chunk per group,
/// and a low-cardinality nullable `name` column that the writer
/// dictionary-encodes, giving its chunks a dictionary page ahead of the data
/// pages.
pub fn generate_test_parquet(num_records: usize, row_groups: usize) -> Vec<u8> {
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
    ]));

    let per_group = num_records.div_ceil(row_groups);

    let mut buf = Vec::new();
    {
        let mut writer =
            ArrowWriter::try_new(&mut buf, schema.clone(), None).expect("Failed to create parquet writer");

        for group in 0..row_groups {
            let base = (group * per_group) as i64;
            let rows = per_group.min(num_records - group * per_group);

            let ids: Vec<i64> = (base..base + rows as i64).collect();
            // Few distinct values plus nulls keep the column dictionary-encoded
            let names: Vec<Option<String>> = (0..rows)
                .map(|i| {
                    if i % 5 == 0 {
                        None
                    } else {
                        Some(format!("shard_{}", i % 3))
                    }
                })
                .collect();

            let batch = RecordBatch::try_new(
                schema.clone(),
                vec![
                    Arc::new(Int64Array::from(ids)),
                    Arc::new(StringArray::from(names)),
                ],
            )
            .expect("Failed to create record batch");

            writer.write(&batch).expect("Failed to write batch");
            if group + 1 < row_groups {
                // Force a row-group boundary between batches
                writer.flush().expect("Failed to flush row group");
            }
        }

        writer.close().expect("Failed to close writer");
    }

    buf
}

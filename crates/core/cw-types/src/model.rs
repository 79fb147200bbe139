//! Pipeline data model.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A request to warm the cache with column chunks for a dataset location.
///
/// Deserialized straight from the HTTP request body; defaults keep missing
/// fields from failing extraction so [`validate`](Self::validate) can name
/// the offending field instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefetchRequest {
    /// Bucket holding the dataset
    pub bucket: String,

    /// Key prefix of the dataset's columnar files
    pub prefix: String,

    /// Column names to prefetch, in request order
    pub columns: Vec<String>,
}

impl PrefetchRequest {
    /// Require all three fields to be non-empty.
    ///
    /// The error message names the missing field and is returned verbatim to
    /// the client.
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err("bucket field is missing".to_string());
        }
        if self.prefix.is_empty() {
            return Err("prefix field is missing".to_string());
        }
        if self.columns.is_empty() {
            return Err("columns field is missing".to_string());
        }
        Ok(())
    }
}

/// One object discovered under the requested prefix.
///
/// The size is required to locate the footer without a HEAD round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Object key (full path within the bucket)
    pub key: String,

    /// Object size in bytes
    pub size: i64,
}

/// One column chunk's byte range within one file, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedColumn {
    /// Leaf column name as it appeared in the request
    pub column_name: String,

    /// First byte of the chunk
    pub start: i64,

    /// Last byte of the chunk (inclusive)
    pub end: i64,
}

/// Column-chunk bytes read from the object store, ready for the cache.
///
/// `etag` is the object version the bytes were read from, verbatim as the
/// store returned it (quotes included). `range` is the `bytes=S-E` header
/// value that produced `data`.
#[derive(Debug, Clone)]
pub struct ColumnBytes {
    pub bucket: String,
    pub key: String,
    pub column_name: String,
    pub data: Bytes,
    pub etag: String,
    pub range: String,
}

impl ColumnBytes {
    /// The cache key this chunk is stored under.
    ///
    /// Format is normative for downstream readers:
    /// `s3://{bucket}/{key}#{etag}#bytes={start}-{end}`. Embedding the ETag
    /// binds the cached bytes to the exact object version; a re-uploaded
    /// object gets a new ETag and therefore a new key.
    pub fn cache_key(&self) -> String {
        format!("s3://{}/{}#{}#{}", self.bucket, self.key, self.etag, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> PrefetchRequest {
        PrefetchRequest {
            bucket: "b".to_string(),
            prefix: "p/".to_string(),
            columns: vec!["x".to_string()],
        }
    }

    #[test]
    fn test_request_validate_ok() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_request_validate_names_missing_field() {
        let mut request = valid_request();
        request.bucket.clear();
        assert_eq!(request.validate().unwrap_err(), "bucket field is missing");

        let mut request = valid_request();
        request.prefix.clear();
        assert_eq!(request.validate().unwrap_err(), "prefix field is missing");

        let mut request = valid_request();
        request.columns.clear();
        assert_eq!(request.validate().unwrap_err(), "columns field is missing");
    }

    #[test]
    fn test_request_deserialize_with_missing_fields() {
        let request: PrefetchRequest = serde_json::from_str(r#"{"bucket": "b"}"#).unwrap();
        assert_eq!(request.bucket, "b");
        assert!(request.prefix.is_empty());
        assert!(request.columns.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_cache_key_format() {
        let column = ColumnBytes {
            bucket: "b".to_string(),
            key: "p/a.parquet".to_string(),
            column_name: "x".to_string(),
            data: Bytes::from_static(b"abc"),
            etag: "\"etagA\"".to_string(),
            range: "bytes=1000-1499".to_string(),
        };
        assert_eq!(
            column.cache_key(),
            "s3://b/p/a.parquet#\"etagA\"#bytes=1000-1499"
        );
    }

    #[test]
    fn test_cache_key_deterministic() {
        let column = ColumnBytes {
            bucket: "bucket".to_string(),
            key: "k.parquet".to_string(),
            column_name: "col".to_string(),
            data: Bytes::new(),
            etag: "\"e\"".to_string(),
            range: "bytes=0-9".to_string(),
        };
        assert_eq!(column.cache_key(), column.cache_key());
        assert_eq!(column.clone().cache_key(), column.cache_key());
    }
}

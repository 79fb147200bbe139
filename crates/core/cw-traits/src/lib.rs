//! Seams between the prefetch engine and its external collaborators.
//!
//! The engine only ever sees these traits; the real adapters live in their
//! own crates and tests substitute mocks.

use async_trait::async_trait;
use bytes::Bytes;
use cw_error::Result;
use cw_types::{ColumnBytes, FileDescriptor};

/// The result of a ranged read: the bytes, the object version they came
/// from, and the `bytes=S-E` range that produced them.
#[derive(Debug, Clone)]
pub struct RangedBytes {
    pub data: Bytes,
    pub etag: String,
    pub range: String,
}

/// Read-side view of the object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object under the prefix. Keys are not filtered by
    /// extension here; the engine does that.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<FileDescriptor>>;

    /// Read the inclusive byte range `[start, end]` of one object.
    async fn get_range(&self, bucket: &str, key: &str, start: i64, end: i64)
        -> Result<RangedBytes>;
}

/// Write-side view of the shared column cache.
#[async_trait]
pub trait ColumnCache: Send + Sync {
    /// Store one column chunk under its cache key, consuming the buffer.
    async fn put(&self, column: ColumnBytes) -> Result<()>;
}

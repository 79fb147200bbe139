//! S3 object-store adapter.
//!
//! This crate provides the read-side S3 operations the pipeline needs:
//! - Client construction with LocalStack support
//! - Paginated object listing under a prefix
//! - Ranged reads that surface the object's ETag

mod client;
mod store;

pub use client::build_client;
pub use store::S3Store;

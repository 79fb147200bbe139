//! Core data types for colwarm.
//!
//! The model follows the pipeline end to end: a [`PrefetchRequest`] names a
//! dataset location and columns, listing yields [`FileDescriptor`]s, footer
//! parsing yields [`RequestedColumn`] byte ranges, and a ranged read plus the
//! object version it came from make a [`ColumnBytes`] ready for the cache.

pub mod config;
mod model;

pub use config::{CacheConfig, Config, PrefetchingConfig, S3Config, ServerConfig};
pub use model::{ColumnBytes, FileDescriptor, PrefetchRequest, RequestedColumn};

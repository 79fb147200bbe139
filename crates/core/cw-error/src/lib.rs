//! Error types for colwarm.
//!
//! This crate provides:
//! - [`Error`] - Top-level error enum for the prefetch pipeline
//! - Domain-specific errors ([`StoreError`], [`FooterError`], [`CacheError`])
//!
//! Per-file and per-column errors are swallowed by the engine after logging;
//! only listing and configuration errors abort anything, so the taxonomy stays
//! shallow. There is no transient/permanent classification because the service
//! never retries.

use thiserror::Error;

/// Top-level error type for the prefetch pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Object-store errors (listing, ranged reads)
    #[error("Object store error: {0}")]
    Store(#[from] StoreError),

    /// Footer errors (tail fetch, magic, length, decode)
    #[error("Footer error: {0}")]
    Footer(#[from] FooterError),

    /// Cache errors (connection, SET)
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Object-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested bucket does not exist
    #[error("Bucket {0} does not exist")]
    NoSuchBucket(String),

    /// A listing page failed
    #[error("Listing failed: {0}")]
    List(String),

    /// A ranged GET failed
    #[error("Ranged get failed: {0}")]
    GetRange(String),
}

/// Footer errors for a single columnar file.
#[derive(Error, Debug)]
pub enum FooterError {
    /// File is smaller than the fixed footer suffix
    #[error("File of {size} bytes is too small to hold a footer")]
    TooSmall { size: i64 },

    /// Trailing four bytes are not the expected magic
    #[error("Invalid magic at end of {key}: expected {expected:02x?}, got {actual:02x?}")]
    BadMagic {
        key: String,
        expected: [u8; 4],
        actual: [u8; 4],
    },

    /// Declared footer length does not fit the file
    #[error("Invalid footer length {length} for file of {size} bytes")]
    BadLength { length: i64, size: i64 },

    /// Footer metadata failed to decode
    #[error("Footer decode failed: {0}")]
    Decode(String),
}

/// Cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to connect to the cache cluster
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A SET failed
    #[error("Set failed: {0}")]
    Set(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

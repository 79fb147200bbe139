//! Service configuration, loaded from a JSON file.
//!
//! The file path comes from the command line (default `config.json`). All
//! sections except `server` are required; there are no environment-variable
//! overrides.

use cw_error::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefetch engine settings
    pub prefetching: PrefetchingConfig,

    /// Cache cluster settings
    pub cache: CacheConfig,

    /// Object-store settings
    pub s3: S3Config,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Prefetch engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefetchingConfig {
    /// Maximum parallel workers per pipeline stage.
    ///
    /// The file and column stages nest, so peak column workers is the square
    /// of this value.
    pub concurrency_limit: usize,
}

/// Cache cluster settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied to every cached chunk, in seconds
    pub time_to_live: u64,

    /// Cluster configuration endpoint hostname
    pub elasticache_endpoint: String,

    /// Cluster port
    pub elasticache_port: u16,

    /// Connect over TLS. Production ElastiCache is TLS-only; disable for
    /// local test clusters.
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

/// Object-store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region
    pub region: String,

    /// Custom endpoint URL (for LocalStack); forces path-style addressing
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the prefetch API listens on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_use_tls() -> bool {
    true
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    /// Load and validate configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.prefetching.concurrency_limit == 0 {
            return Err("prefetching.concurrency_limit must be at least 1".to_string());
        }
        if self.cache.time_to_live == 0 {
            return Err("cache.time_to_live must be at least 1 second".to_string());
        }
        if self.cache.elasticache_endpoint.is_empty() {
            return Err("cache.elasticache_endpoint must not be empty".to_string());
        }
        if self.cache.elasticache_port == 0 {
            return Err("cache.elasticache_port must not be 0".to_string());
        }
        if self.s3.region.is_empty() {
            return Err("s3.region must not be empty".to_string());
        }
        if self.server.listen_addr.is_empty() {
            return Err("server.listen_addr must not be empty".to_string());
        }
        Ok(())
    }
}

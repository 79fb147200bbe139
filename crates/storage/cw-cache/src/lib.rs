//! Cache adapter for a clustered Valkey/Redis-compatible store.
//!
//! Chunks are written with an unconditional `SET key value EX ttl`; the TTL
//! is the only lifetime control the service has over cached data. The
//! cluster connection is established once at startup (fatal on failure) and
//! cloned per call.

use async_trait::async_trait;
use cw_error::{CacheError, Result};
use cw_traits::ColumnCache;
use cw_types::{CacheConfig, ColumnBytes};
use redis::cluster::ClusterClient;
use redis::cluster_async::ClusterConnection;
use redis::AsyncCommands;
use std::time::{Duration, Instant};
use tracing::trace;

/// Per-request timeout against the cluster.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cache adapter over a shared cluster connection.
pub struct ValkeyCache {
    connection: ClusterConnection,
    ttl_secs: u64,
}

impl ValkeyCache {
    /// Connect to the configured cluster endpoint.
    ///
    /// Uses `rediss://` (TLS) unless the configuration opts out for local
    /// test clusters.
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let scheme = if config.use_tls { "rediss" } else { "redis" };
        let node = format!(
            "{}://{}:{}",
            scheme, config.elasticache_endpoint, config.elasticache_port
        );

        let client = ClusterClient::builder(vec![node.clone()])
            .response_timeout(RESPONSE_TIMEOUT)
            .build()
            .map_err(|e| CacheError::Connection(format!("{}: {}", node, e)))?;

        let connection = client
            .get_async_connection()
            .await
            .map_err(|e| CacheError::Connection(format!("{}: {}", node, e)))?;

        Ok(Self {
            connection,
            ttl_secs: config.time_to_live,
        })
    }
}

#[async_trait]
impl ColumnCache for ValkeyCache {
    async fn put(&self, column: ColumnBytes) -> Result<()> {
        let cache_key = column.cache_key();
        let mut connection = self.connection.clone();

        let started = Instant::now();
        let result: redis::RedisResult<()> = connection
            .set_ex(&cache_key, column.data.as_ref(), self.ttl_secs)
            .await;
        cw_metrics::record_cache(started.elapsed());

        result.map_err(|e| CacheError::Set(format!("{}: {}", cache_key, e)))?;

        trace!(key = %cache_key, bytes = column.data.len(), "Cached column chunk");
        Ok(())
    }
}

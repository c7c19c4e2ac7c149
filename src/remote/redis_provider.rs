// Redis-protocol provider (Redis itself or any server speaking RESP).

use std::sync::Arc;

use bytes::Bytes;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::RedisConfig;
use crate::error::CacheError;
use crate::provider::{Destination, Provider};

/// Provider backed by a Redis-protocol server.
///
/// The connection is established on first use and shared by every call;
/// `ConnectionManager` reconnects on its own after failures.
pub struct RedisProvider {
    name: String,
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisProvider {
    /// Validates the URL. No connection is made until the first operation.
    pub fn new(cfg: &RedisConfig) -> Result<Arc<Self>, CacheError> {
        let client = redis::Client::open(cfg.url.as_str())
            .map_err(|e| CacheError::InvalidProvider(format!("redis provider {}: {e}", cfg.name)))?;
        Ok(Arc::new(Self {
            name: cfg.name.clone(),
            client,
            conn: OnceCell::new(),
        }))
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let conn = ConnectionManager::new(self.client.clone()).await?;
                info!(component = "redis", event = "connected", provider = %self.name, "redis connection established");
                Ok::<_, redis::RedisError>(conn)
            })
            .await
            .map_err(|e| CacheError::backend(&self.name, e))?;
        Ok(conn.clone())
    }
}

/// Maps a GET reply to the shared vocabulary: nil means the key is missing.
fn expect_value(key: &str, raw: Option<Vec<u8>>) -> Result<Vec<u8>, CacheError> {
    raw.ok_or_else(|| CacheError::not_found(key))
}

/// Maps the affected-key count of DEL / EXPIRE to the shared vocabulary.
fn expect_touched(key: &str, touched: i64) -> Result<(), CacheError> {
    if touched > 0 {
        Ok(())
    } else {
        Err(CacheError::not_found(key))
    }
}

#[async_trait::async_trait]
impl Provider for RedisProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str, dst: &mut dyn Destination) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::backend(&self.name, e))?;
        dst.fill(&expect_value(key, raw)?)
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value.as_ref())
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::backend(&self.name, e))?;
        Ok(())
    }

    async fn set_ttl(&self, key: &str, ttl: u64) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let touched: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::backend(&self.name, e))?;
        expect_touched(key, touched)
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let touched: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::backend(&self.name, e))?;
        expect_touched(key, touched)
    }
}

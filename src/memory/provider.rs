//! In-memory provider.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::clock;
use super::table::Table;
use crate::config::MemoryConfig;
use crate::error::CacheError;
use crate::provider::{Destination, Provider};

/// Process-local provider with tick-based expiry.
///
/// Owns a background clock task that lives until the shutdown token passed
/// to [`MemoryProvider::new`] is cancelled or the provider is dropped,
/// whichever comes first.
pub struct MemoryProvider {
    name: String,
    table: Arc<Mutex<Table>>,
    clock: CancellationToken,
}

impl MemoryProvider {
    /// Creates the provider and starts its expiry clock.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(shutdown: &CancellationToken, cfg: &MemoryConfig) -> Result<Arc<Self>, CacheError> {
        if cfg.tick.is_zero() {
            return Err(CacheError::InvalidProvider(format!(
                "memory provider {} has a zero tick interval",
                cfg.name
            )));
        }
        let handle = Handle::try_current().map_err(|e| {
            CacheError::InvalidProvider(format!(
                "memory provider {} needs a tokio runtime: {e}",
                cfg.name
            ))
        })?;

        let table = Arc::new(Mutex::new(Table::default()));
        let clock = shutdown.child_token();
        handle.spawn(clock::run(
            clock.clone(),
            cfg.name.clone(),
            table.clone(),
            cfg.tick,
        ));

        Ok(Arc::new(Self {
            name: cfg.name.clone(),
            table,
            clock,
        }))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for MemoryProvider {
    fn drop(&mut self) {
        self.clock.cancel();
    }
}

#[async_trait::async_trait]
impl Provider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str, dst: &mut dyn Destination) -> Result<(), CacheError> {
        let raw = self.table.lock().get(key);
        match raw {
            Some(raw) => dst.fill(&raw),
            None => Err(CacheError::not_found(key)),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError> {
        self.table.lock().set(key, value);
        Ok(())
    }

    async fn set_ttl(&self, key: &str, ttl: u64) -> Result<(), CacheError> {
        if self.table.lock().expire_in(key, ttl) {
            Ok(())
        } else {
            Err(CacheError::not_found(key))
        }
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        if self.table.lock().remove(key) {
            Ok(())
        } else {
            Err(CacheError::not_found(key))
        }
    }
}

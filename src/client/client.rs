//! Aggregating client: fans cache operations out across registered providers.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::registration::Registration;
use crate::error::CacheError;
use crate::metrics;
use crate::provider::{Destination, Provider};

const DEFAULT_NAME: &str = "client";

/// Composite provider over an ordered, append-only provider registry.
///
/// * `get` races every provider and keeps the first success to arrive.
/// * `set` writes to every provider concurrently and waits for all of them.
/// * `remove` sweeps providers in registration order, skipping `NotFound`.
/// * `set_ttl` walks providers in registration order and stops at the first
///   error, `NotFound` included.
///
/// A client is itself a [`Provider`], so clients can be nested. No operation
/// imposes a timeout or retries; a slow provider stalls the whole call.
/// Fan-out branches run as detached tasks: a caller that stops waiting does
/// not cancel reads or writes already started.
pub struct Client {
    name: String,
    providers: RwLock<Vec<Arc<dyn Provider>>>,
}

impl Client {
    pub fn new() -> Self {
        Self::named(DEFAULT_NAME)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            providers: RwLock::new(Vec::new()),
        }
    }

    /// Appends a provider to the registry. Operations already in flight keep
    /// the registry they started with.
    pub fn add_provider(&self, registration: Registration) -> Result<(), CacheError> {
        let provider = registration.resolve()?;
        debug!(
            component = "client",
            event = "provider_added",
            client = %self.name,
            provider = %provider.name(),
            "provider registered"
        );
        self.providers.write().push(provider);
        Ok(())
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Result<Vec<Arc<dyn Provider>>, CacheError> {
        let providers = self.providers.read();
        if providers.is_empty() {
            return Err(CacheError::NoProviders);
        }
        Ok(providers.clone())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Provider for Client {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str, dst: &mut dyn Destination) -> Result<(), CacheError> {
        let providers = self.snapshot()?;

        let mut branches: FuturesUnordered<JoinHandle<_>> = providers
            .into_iter()
            .map(|provider| {
                let key = key.to_owned();
                let mut copy = dst.blank();
                tokio::spawn(async move {
                    let outcome = provider.get(&key, copy.as_mut()).await;
                    (provider.name().to_owned(), outcome.map(|()| copy))
                })
            })
            .collect();

        let mut winner: Option<Box<dyn Destination>> = None;
        let mut last_err = None;
        while let Some(joined) = branches.next().await {
            match joined {
                Ok((provider, Ok(copy))) => {
                    if winner.is_none() {
                        debug!(component = "client", event = "race_read_hit", client = %self.name, provider = %provider, key, "read answered");
                        winner = Some(copy);
                    }
                }
                Ok((provider, Err(e))) => {
                    debug!(component = "client", event = "race_read_miss", client = %self.name, provider = %provider, key, error = %e, "read failed");
                    last_err = Some(e);
                }
                Err(e) => last_err = Some(CacheError::from(e)),
            }
        }

        match winner {
            Some(copy) => {
                metrics::add_hits(&self.name, 1);
                dst.absorb(copy)
            }
            None => {
                metrics::add_misses(&self.name, 1);
                Err(last_err.unwrap_or(CacheError::NoProviders))
            }
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError> {
        let providers = self.snapshot()?;

        let mut branches: FuturesUnordered<JoinHandle<_>> = providers
            .into_iter()
            .map(|provider| {
                let key = key.to_owned();
                let value = value.clone();
                tokio::spawn(async move {
                    let outcome = provider.set(&key, value).await;
                    (provider.name().to_owned(), outcome)
                })
            })
            .collect();

        let mut first_err = None;
        while let Some(joined) = branches.next().await {
            let (provider, outcome) = match joined {
                Ok(result) => result,
                Err(e) => (String::from("unknown"), Err(CacheError::from(e))),
            };
            let Err(e) = outcome else {
                continue;
            };
            metrics::add_write_errors(&self.name, &provider, 1);
            if first_err.is_none() {
                debug!(component = "client", event = "broadcast_write_failed", client = %self.name, provider = %provider, key, error = %e, "write failed");
                first_err = Some(e);
            } else {
                warn!(
                    component = "client",
                    event = "broadcast_write_failed",
                    client = %self.name,
                    provider = %provider,
                    key,
                    error = %e,
                    "write failed after an earlier failure was already reported"
                );
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn set_ttl(&self, key: &str, ttl: u64) -> Result<(), CacheError> {
        for provider in self.snapshot()? {
            provider.set_ttl(key, ttl).await?;
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut missing = None;
        let mut removed = false;
        for provider in self.snapshot()? {
            match provider.remove(key).await {
                Ok(()) => removed = true,
                Err(e) if e.is_not_found() => missing = Some(e),
                Err(e) => return Err(e),
            }
        }
        match missing {
            Some(e) if !removed => Err(e),
            _ => Ok(()),
        }
    }
}

// Builds a client tree from configuration.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::client::Client;
use super::registration::Registration;
use crate::config::{ClientConfig, ProviderConfig, RedisConfig};
use crate::error::CacheError;
use crate::memory::MemoryProvider;

/// Builds a client with every configured provider registered in order.
///
/// Providers are constructed through registration factories, so a provider
/// that cannot be built fails the call with [`CacheError::InvalidProvider`].
/// Background tasks of built providers stop when `shutdown` is cancelled.
pub fn build_client(
    shutdown: &CancellationToken,
    cfg: &ClientConfig,
) -> Result<Arc<Client>, CacheError> {
    if cfg.providers.is_empty() {
        return Err(CacheError::InvalidProvider(format!(
            "client {} has no providers configured",
            cfg.name
        )));
    }

    let client = Client::named(cfg.name.clone());
    for provider in &cfg.providers {
        client.add_provider(registration(shutdown, provider))?;
    }

    info!(
        component = "client",
        event = "client_built",
        client = %cfg.name,
        providers = client.len(),
        "client built"
    );
    Ok(Arc::new(client))
}

fn registration(shutdown: &CancellationToken, cfg: &ProviderConfig) -> Registration {
    let shutdown = shutdown.clone();
    match cfg.clone() {
        ProviderConfig::Memory(memory) => {
            Registration::factory(move || MemoryProvider::new(&shutdown, &memory))
        }
        ProviderConfig::Redis(redis) => redis_registration(redis),
        ProviderConfig::Client(nested) => {
            Registration::factory(move || build_client(&shutdown, &nested))
        }
    }
}

#[cfg(feature = "redis")]
fn redis_registration(cfg: RedisConfig) -> Registration {
    Registration::factory(move || crate::remote::RedisProvider::new(&cfg))
}

#[cfg(not(feature = "redis"))]
fn redis_registration(cfg: RedisConfig) -> Registration {
    Registration::Factory(Box::new(move || {
        Err(CacheError::InvalidProvider(format!(
            "redis provider {} requested but redis support is not compiled in",
            cfg.name
        )))
    }))
}

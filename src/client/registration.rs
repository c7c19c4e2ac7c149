// Provider registration for the aggregating client.

use std::sync::Arc;

use crate::error::CacheError;
use crate::provider::Provider;

/// Deferred constructor producing a provider at registration time.
pub type ProviderFactory = Box<dyn FnOnce() -> Result<Arc<dyn Provider>, CacheError> + Send>;

/// What [`Client::add_provider`](super::Client::add_provider) accepts: a ready
/// provider or a zero-argument factory that builds one.
pub enum Registration {
    Instance(Arc<dyn Provider>),
    Factory(ProviderFactory),
}

impl Registration {
    pub fn instance<P>(provider: Arc<P>) -> Self
    where
        P: Provider + 'static,
    {
        Registration::Instance(provider)
    }

    pub fn factory<P, F>(factory: F) -> Self
    where
        P: Provider + 'static,
        F: FnOnce() -> Result<Arc<P>, CacheError> + Send + 'static,
    {
        Registration::Factory(Box::new(move || {
            factory().map(|provider| provider as Arc<dyn Provider>)
        }))
    }

    /// Runs the factory, if any. A factory failure becomes
    /// [`CacheError::InvalidProvider`].
    pub(crate) fn resolve(self) -> Result<Arc<dyn Provider>, CacheError> {
        match self {
            Registration::Instance(provider) => Ok(provider),
            Registration::Factory(factory) => factory().map_err(|e| match e {
                CacheError::InvalidProvider(_) => e,
                other => CacheError::InvalidProvider(other.to_string()),
            }),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Registration::Instance(provider) => {
                f.debug_tuple("Instance").field(&provider.name()).finish()
            }
            Registration::Factory(_) => f.write_str("Factory"),
        }
    }
}

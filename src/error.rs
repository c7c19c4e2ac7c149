//! Shared error vocabulary for every provider and for the aggregating client.

use thiserror::Error;

/// Errors returned by cache providers.
///
/// `NotFound` is the only kind the client ever suppresses (during a remove
/// sweep and when another provider answers a read). Everything else is
/// surfaced to the caller unchanged.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Key has no entry on the queried provider.
    #[error("key not exists: {key}")]
    NotFound { key: String },

    /// Stored value cannot be decoded into the requested destination type.
    #[error("unable to set value: invalid type ({0})")]
    TypeMismatch(String),

    /// Destination cannot accept the result it was handed.
    #[error("destination cannot accept the value")]
    InvalidDestination,

    /// Client has no registered providers.
    #[error("no cache backends")]
    NoProviders,

    /// Registration did not yield a usable provider.
    #[error("invalid provider: {0}")]
    InvalidProvider(String),

    /// Value could not be serialized; nothing was written.
    #[error("unable to encode value: {0}")]
    Encode(String),

    /// Backend-native failure (connection, protocol), passed through as is.
    #[error("provider {provider} failed: {source}")]
    Backend {
        provider: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A fan-out branch panicked or was aborted.
    #[error("provider task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CacheError {
    pub fn not_found(key: &str) -> Self {
        CacheError::NotFound {
            key: key.to_owned(),
        }
    }

    pub fn backend<E>(provider: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CacheError::Backend {
            provider: provider.to_owned(),
            source: Box::new(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

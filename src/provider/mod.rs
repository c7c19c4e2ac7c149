//! Provider capability: the contract every cache backend implements.

pub mod codec;
pub mod destination;

pub use codec::{Codec, JsonCodec};
pub use destination::{Destination, Slot};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// A single cache backend.
///
/// Values cross this boundary already encoded, so an in-process map, a
/// remote server and a client wrapping other providers all look the same
/// to their callers. Every provider reports a missing key as
/// [`CacheError::NotFound`].
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Name used in logs and error attribution.
    fn name(&self) -> &str;

    /// Fills `dst` with the value stored under `key`.
    async fn get(&self, key: &str, dst: &mut dyn Destination) -> Result<(), CacheError>;

    /// Stores `value` under `key`, replacing any previous entry and its expiry.
    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError>;

    /// Expires an existing entry after `ttl` seconds.
    async fn set_ttl(&self, key: &str, ttl: u64) -> Result<(), CacheError>;

    /// Deletes the entry under `key`.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Typed reads and writes on top of any [`Provider`], using [`JsonCodec`].
///
/// The destination is a `&mut T` bound at the call site, so handing over a
/// value instead of a writable reference does not compile:
///
/// ```compile_fail
/// use polycache::{Client, ProviderExt};
///
/// async fn read(client: &Client) {
///     let name = String::new();
///     client.fetch_into("user:1", name).await.unwrap();
/// }
/// ```
#[async_trait::async_trait]
pub trait ProviderExt: Provider {
    /// Reads and decodes the value under `key`.
    async fn fetch<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned + Send + 'static;

    /// Reads the value under `key` into `dst`. `dst` is untouched on error.
    async fn fetch_into<T>(&self, key: &str, dst: &mut T) -> Result<(), CacheError>
    where
        T: DeserializeOwned + Send + 'static;

    /// Encodes `value` and stores it under `key`. Encoding happens before any
    /// backend is touched.
    async fn store<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + Sync + ?Sized;
}

#[async_trait::async_trait]
impl<P> ProviderExt for P
where
    P: Provider + ?Sized,
{
    async fn fetch<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut slot: Slot<T> = Slot::new();
        self.get(key, &mut slot).await?;
        slot.into_inner().ok_or(CacheError::InvalidDestination)
    }

    async fn fetch_into<T>(&self, key: &str, dst: &mut T) -> Result<(), CacheError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        *dst = self.fetch(key).await?;
        Ok(())
    }

    async fn store<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw = JsonCodec::encode(value)?;
        self.set(key, raw).await
    }
}

//! Remote providers. Each translates the provider contract into calls on a
//! remote key-value server and maps its "missing key" replies to `NotFound`.

#[cfg(feature = "redis")]
pub mod redis_provider;

#[cfg(feature = "redis")]
pub use redis_provider::RedisProvider;

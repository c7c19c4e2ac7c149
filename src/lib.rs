//! Multi-backend cache client.
//!
//! Every backend implements [`Provider`]. A [`Client`] aggregates providers
//! and is a provider itself: reads race all backends, writes go to all of
//! them, removals and expiry walk them in registration order.
//!
//! ```
//! use polycache::config::MemoryConfig;
//! use polycache::{CacheError, Client, MemoryProvider, Provider, ProviderExt, Registration};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), CacheError> {
//! let shutdown = CancellationToken::new();
//! let client = Client::new();
//! client.add_provider(Registration::factory({
//!     let shutdown = shutdown.clone();
//!     move || MemoryProvider::new(&shutdown, &MemoryConfig::default())
//! }))?;
//!
//! client.store("user:1", "alice").await?;
//! let name: String = client.fetch("user:1").await?;
//! assert_eq!(name, "alice");
//!
//! client.remove("user:1").await?;
//! let gone: Result<String, CacheError> = client.fetch("user:1").await;
//! assert!(gone.unwrap_err().is_not_found());
//! shutdown.cancel();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod provider;
pub mod remote;
pub mod shell;
pub mod shutdown;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub use client::{build_client, Client, Registration};
pub use error::CacheError;
pub use memory::MemoryProvider;
pub use provider::{Codec, Destination, JsonCodec, Provider, ProviderExt, Slot};
#[cfg(feature = "redis")]
pub use remote::RedisProvider;

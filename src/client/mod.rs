//! Aggregating client and its registration / construction helpers.

pub mod build;
pub mod client;
pub mod registration;


pub use build::build_client;
pub use client::Client;
pub use registration::{ProviderFactory, Registration};

//! In-memory provider and its expiry engine.

mod clock;
mod entry;
mod table;

pub mod provider;


pub use provider::MemoryProvider;

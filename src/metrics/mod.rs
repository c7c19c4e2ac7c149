//! Cache metrics, recorded through the `metrics` facade.
//!
//! No exporter is installed here; whatever recorder the host process
//! registers receives these series.

pub const CLIENT_HITS: &str = "cache_client_hits";
pub const CLIENT_MISSES: &str = "cache_client_misses";
pub const CLIENT_WRITE_ERRORS: &str = "cache_client_write_errors";
pub const MEMORY_EVICTIONS: &str = "cache_memory_evictions";
pub const MEMORY_LENGTH: &str = "cache_memory_length";

/// Adds race-read hits.
pub fn add_hits(client: &str, value: u64) {
    metrics::counter!(CLIENT_HITS, "client" => client.to_string()).increment(value);
}

/// Adds race-read misses (no provider answered).
pub fn add_misses(client: &str, value: u64) {
    metrics::counter!(CLIENT_MISSES, "client" => client.to_string()).increment(value);
}

/// Adds failed broadcast-write branches.
pub fn add_write_errors(client: &str, provider: &str, value: u64) {
    metrics::counter!(
        CLIENT_WRITE_ERRORS,
        "client" => client.to_string(),
        "provider" => provider.to_string()
    )
    .increment(value);
}

/// Adds entries evicted by an expiry clock.
pub fn add_memory_evictions(provider: &str, value: u64) {
    metrics::counter!(MEMORY_EVICTIONS, "provider" => provider.to_string()).increment(value);
}

/// Sets the live entry count of a memory provider.
pub fn set_memory_length(provider: &str, len: usize) {
    metrics::gauge!(MEMORY_LENGTH, "provider" => provider.to_string()).set(len as f64);
}

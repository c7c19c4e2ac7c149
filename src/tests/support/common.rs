// Common test utilities for integration tests.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{Client, Registration};
use crate::config::MemoryConfig;
use crate::memory::MemoryProvider;
use crate::provider::Provider;

/// Expiry clock interval used by memory providers in tests.
pub const TEST_TICK: Duration = Duration::from_millis(10);

/// Asserts that the result is Ok and returns the value.
pub fn assert_ok<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| panic!("unexpected error: {}", e))
}

/// Asserts that two values are equal.
pub fn assert_equal<T: PartialEq + std::fmt::Debug>(want: T, got: T) {
    if want != got {
        panic!("want={:?} got={:?}", want, got);
    }
}

/// Memory provider with the fast test clock.
pub fn new_memory(shutdown: &CancellationToken, name: &str) -> Arc<MemoryProvider> {
    assert_ok(MemoryProvider::new(
        shutdown,
        &MemoryConfig {
            name: name.to_string(),
            tick: TEST_TICK,
        },
    ))
}

/// Client with `providers` registered in the given order.
pub fn client_over<P: Provider + 'static>(providers: &[Arc<P>]) -> Client {
    let client = Client::named("test-client");
    for provider in providers {
        assert_ok(client.add_provider(Registration::instance(provider.clone())));
    }
    client
}

use super::{CacheBox, ClientConfig, Config, Logs, MemoryConfig, ProviderConfig};
use std::time::Duration;

/// Creates a new test configuration: one memory provider with a fast clock.
pub fn new_test_config() -> Config {
    Config {
        cache: CacheBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            client: ClientConfig {
                name: "test-client".to_string(),
                providers: vec![ProviderConfig::Memory(MemoryConfig {
                    name: "test-memory".to_string(),
                    tick: Duration::from_millis(10),
                })],
            },
        },
    }
}

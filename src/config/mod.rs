// Configuration loading and management.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
#[allow(dead_code)]
pub const DEV: &str = "dev";
pub const TEST: &str = "test";

const DEFAULT_CLIENT_NAME: &str = "client";
const DEFAULT_MEMORY_NAME: &str = "memory";
const DEFAULT_REDIS_NAME: &str = "redis";
const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(rename = "cache")]
    pub cache: CacheBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

/// Aggregating client: providers in registration order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_name")]
    pub name: String,
    pub providers: Vec<ProviderConfig>,
}

/// One registered provider, tagged by `kind`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    Memory(MemoryConfig),
    Redis(RedisConfig),
    /// Nested client, registered as a single provider.
    Client(ClientConfig),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_name")]
    pub name: String,
    /// Expiry clock interval; one TTL second is one tick.
    #[serde(default = "default_tick", with = "humantime_serde")]
    pub tick: Duration,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_name")]
    pub name: String,
    /// Connection URL, e.g. `redis://:password@127.0.0.1:6379/0`.
    pub url: String,
}

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

fn default_memory_name() -> String {
    DEFAULT_MEMORY_NAME.to_string()
}

fn default_redis_name() -> String {
    DEFAULT_REDIS_NAME.to_string()
}

fn default_tick() -> Duration {
    DEFAULT_TICK
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            name: default_memory_name(),
            tick: DEFAULT_TICK,
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        let cfg = Self::parse(&data).with_context(|| format!("load config from {:?}", abs_path))?;
        Ok(cfg)
    }

    /// Parses and validates configuration from YAML text.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.cache.client.validate()?;
        Ok(cfg)
    }

    pub fn logs(&self) -> Option<&Logs> {
        self.cache.logs.as_ref()
    }

    pub fn is_prod(&self) -> bool {
        self.cache.env == PROD
    }

    pub fn client(&self) -> &ClientConfig {
        &self.cache.client
    }
}

impl ClientConfig {
    fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            bail!("client {:?} has no providers configured", self.name);
        }
        for provider in &self.providers {
            match provider {
                ProviderConfig::Memory(memory) if memory.tick.is_zero() => {
                    bail!("memory provider {:?} has a zero tick", memory.name);
                }
                ProviderConfig::Redis(redis) if redis.url.is_empty() => {
                    bail!("redis provider {:?} has an empty url", redis.name);
                }
                ProviderConfig::Client(nested) => nested.validate()?,
                _ => {}
            }
        }
        Ok(())
    }
}

mod test_config;
#[allow(dead_code)]
pub use test_config::new_test_config;

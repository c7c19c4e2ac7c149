//! Scripted provider doubles.
//!
//! A [`ScriptedProvider`] keeps values in a plain map, sleeps for a fixed
//! latency before answering and can be switched into a failing mode where
//! every operation returns a backend error. Every call is recorded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::CacheError;
use crate::provider::{Codec, Destination, JsonCodec, Provider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get,
    Set,
    SetTtl(u64),
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub key: String,
}

#[derive(Debug, thiserror::Error)]
#[error("injected failure in {0}")]
pub struct InjectedFault(String);

pub struct ScriptedProvider {
    name: String,
    latency: Duration,
    failing: AtomicBool,
    answered: AtomicUsize,
    values: Mutex<HashMap<String, Bytes>>,
    ttls: Mutex<HashMap<String, u64>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            latency: Duration::ZERO,
            failing: AtomicBool::new(false),
            answered: AtomicUsize::new(0),
            values: Mutex::new(HashMap::new()),
            ttls: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_value<T: Serialize + ?Sized>(self, key: &str, value: &T) -> Self {
        let raw = JsonCodec::encode(value).expect("encode test value");
        self.values.lock().insert(key.to_string(), raw);
        self
    }

    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn holds(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<Bytes> {
        self.values.lock().get(key).cloned()
    }

    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.ttls.lock().get(key).copied()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Calls that got past the injected latency.
    pub fn answered(&self) -> usize {
        self.answered.load(Ordering::SeqCst)
    }

    pub fn ops(&self) -> Vec<Op> {
        self.calls.lock().iter().map(|call| call.op).collect()
    }

    async fn enter(&self, op: Op, key: &str) -> Result<(), CacheError> {
        self.calls.lock().push(Call {
            op,
            key: key.to_string(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.answered.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::backend(
                &self.name,
                InjectedFault(format!("{op:?}")),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str, dst: &mut dyn Destination) -> Result<(), CacheError> {
        self.enter(Op::Get, key).await?;
        let raw = self.values.lock().get(key).cloned();
        match raw {
            Some(raw) => dst.fill(&raw),
            None => Err(CacheError::not_found(key)),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError> {
        self.enter(Op::Set, key).await?;
        self.values.lock().insert(key.to_string(), value);
        self.ttls.lock().remove(key);
        Ok(())
    }

    async fn set_ttl(&self, key: &str, ttl: u64) -> Result<(), CacheError> {
        self.enter(Op::SetTtl(ttl), key).await?;
        if !self.holds(key) {
            return Err(CacheError::not_found(key));
        }
        self.ttls.lock().insert(key.to_string(), ttl);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.enter(Op::Remove, key).await?;
        match self.values.lock().remove(key) {
            Some(_) => {
                self.ttls.lock().remove(key);
                Ok(())
            }
            None => Err(CacheError::not_found(key)),
        }
    }
}

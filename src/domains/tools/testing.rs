//! Test doubles for the tool collaborators.

use std::sync::Arc;

use async_trait::async_trait;

use super::ToolContext;
use crate::core::randomness::{RandomnessError, RandomnessSource};
use crate::core::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

/// Randomness source returning a fixed hex string.
pub struct StaticRandomness(pub String);

#[async_trait]
impl RandomnessSource for StaticRandomness {
    async fn fetch_hex(&self) -> Result<String, RandomnessError> {
        Ok(self.0.clone())
    }
}

/// Randomness source that is always down.
pub struct FailingRandomness;

#[async_trait]
impl RandomnessSource for FailingRandomness {
    async fn fetch_hex(&self) -> Result<String, RandomnessError> {
        Err(RandomnessError::Status(503))
    }
}

/// Store rejecting every operation.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn put(&self, _key: &str, _value: String) -> StoreResult<()> {
        Err(StoreError::unavailable("write quota exceeded"))
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::unavailable("read quota exceeded"))
    }

    async fn list(&self, _prefix: &str) -> StoreResult<Vec<String>> {
        Err(StoreError::unavailable("list quota exceeded"))
    }
}

/// Context with an empty in-memory store and a failing randomness source.
pub fn test_context() -> ToolContext {
    ToolContext::new(Arc::new(MemoryStore::new()), Arc::new(FailingRandomness))
}

/// Context whose store always fails.
pub fn failing_store_context() -> ToolContext {
    ToolContext::new(Arc::new(FailingStore), Arc::new(FailingRandomness))
}

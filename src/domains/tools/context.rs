//! Collaborators injected into tool handlers.

use std::sync::Arc;

use tracing::info;

use crate::core::config::Config;
use crate::core::randomness::{DrandClient, RandomnessSource};
use crate::core::store::{FileStore, KeyValueStore, MemoryStore};
use crate::core::Result;

/// Everything a tool handler may touch outside of its own arguments.
#[derive(Clone)]
pub struct ToolContext {
    /// Backing key-value store for `storeValue` and the todo tools.
    pub store: Arc<dyn KeyValueStore>,

    /// Entropy source for `randomNumber`.
    pub randomness: Arc<dyn RandomnessSource>,
}

impl ToolContext {
    pub fn new(store: Arc<dyn KeyValueStore>, randomness: Arc<dyn RandomnessSource>) -> Self {
        Self { store, randomness }
    }

    /// Build the production collaborators described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.store.path {
            Some(path) => Arc::new(FileStore::open(path).await?),
            None => {
                info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let randomness = Arc::new(DrandClient::new(&config.randomness)?);
        info!("Randomness source: {}", randomness.url());

        Ok(Self::new(store, randomness))
    }
}

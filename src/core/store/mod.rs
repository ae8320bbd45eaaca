//! Key-value store collaborator.
//!
//! Tools never own their data: they talk to an injected [`KeyValueStore`].
//! Two backends are provided:
//! - [`MemoryStore`]: process-local map (default)
//! - [`FileStore`]: map persisted as a JSON snapshot on every write
//!
//! The store offers no compare-and-swap or transactions. Two writers racing
//! on the same key resolve as last-write-wins.

mod error;
mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Associative storage with string keys and string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: String) -> StoreResult<()>;

    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Fetch several keys at once, preserving the order of `keys`.
    async fn get_many(&self, keys: &[String]) -> StoreResult<Vec<(String, Option<String>)>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push((key.clone(), self.get(key).await?));
        }
        Ok(values)
    }

    /// List all keys starting with `prefix`, in lexicographic order.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

/// A prefixed view over a shared store.
///
/// Todo records and raw stored values live side by side in one store; each
/// gets its own prefix so a raw value can never overwrite a todo record.
#[derive(Clone)]
pub struct Namespace {
    store: Arc<dyn KeyValueStore>,
    prefix: &'static str,
}

impl Namespace {
    /// Prefix used for todo records.
    pub const TODOS: &'static str = "todo:";

    /// Prefix used for values written by `storeValue`.
    pub const VALUES: &'static str = "kv:";

    pub fn new(store: Arc<dyn KeyValueStore>, prefix: &'static str) -> Self {
        Self { store, prefix }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub async fn put(&self, key: &str, value: String) -> StoreResult<()> {
        self.store.put(&self.full_key(key), value).await
    }

    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.store.get(&self.full_key(key)).await
    }

    /// List keys in this namespace, with the prefix stripped.
    pub async fn list(&self) -> StoreResult<Vec<String>> {
        let keys = self.store.list(self.prefix).await?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(self.prefix).map(str::to_string))
            .collect())
    }

    /// Bulk fetch by unprefixed keys.
    pub async fn get_many(&self, keys: &[String]) -> StoreResult<Vec<(String, Option<String>)>> {
        let full: Vec<String> = keys.iter().map(|k| self.full_key(k)).collect();
        let values = self.store.get_many(&full).await?;
        Ok(keys
            .iter()
            .cloned()
            .zip(values.into_iter().map(|(_, v)| v))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_namespaces_do_not_collide() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let todos = Namespace::new(store.clone(), Namespace::TODOS);
        let values = Namespace::new(store.clone(), Namespace::VALUES);

        todos.put("groceries", "todo".to_string()).await.unwrap();
        values.put("groceries", "raw".to_string()).await.unwrap();

        assert_eq!(todos.get("groceries").await.unwrap().as_deref(), Some("todo"));
        assert_eq!(values.get("groceries").await.unwrap().as_deref(), Some("raw"));
        assert_eq!(todos.list().await.unwrap(), vec!["groceries".to_string()]);
    }

    #[tokio::test]
    async fn test_namespace_get_many_strips_prefix() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let todos = Namespace::new(store, Namespace::TODOS);
        todos.put("a", "1".to_string()).await.unwrap();

        let values = todos
            .get_many(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(
            values,
            vec![
                ("a".to_string(), Some("1".to_string())),
                ("missing".to_string(), None)
            ]
        );
    }
}

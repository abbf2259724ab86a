use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::r#trait::{KeyValueStore, KvError};

/// In-memory key-value store.
///
/// Intended for tests/dev. Values are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let map = self
            .inner
            .read()
            .map_err(|_| KvError::backend("in-memory store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| KvError::backend("in-memory store lock poisoned"))?;
        map.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| KvError::backend("in-memory store lock poisoned"))?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("@k").await.unwrap(), None);

        store.set("@k", b"[]".to_vec()).await.unwrap();
        assert_eq!(store.get("@k").await.unwrap(), Some(b"[]".to_vec()));

        store.remove("@k").await.unwrap();
        store.remove("@k").await.unwrap();
        assert!(store.is_empty());
    }
}

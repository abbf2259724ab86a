//! Typed JSON collections over the key-value boundary.
//!
//! A collection is an ordered `Vec<T>` persisted as one JSON array under one
//! key. Mutations are whole-collection read-modify-write cycles, serialized
//! per collection by an async mutex.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::kv::{KeyValueStore, KvError};

/// Store operation error (the persistence-failure category).
///
/// Malformed stored data is not an error: it reads as an empty collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence failed: {0}")]
    Persistence(#[from] KvError),

    #[error("failed to encode collection '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A persisted, strongly-typed collection.
pub struct JsonCollection<T> {
    key: String,
    storage: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> core::fmt::Debug for JsonCollection<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JsonCollection").field("key", &self.key).finish()
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(key: impl Into<String>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            storage,
            write_lock: Mutex::new(()),
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the whole collection.
    ///
    /// Absent or malformed data reads as empty; only storage failures error.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let raw = match self.storage.get(&self.key).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to read collection");
                return Err(err.into());
            }
        };

        let Some(bytes) = raw else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(items) => Ok(items),
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "stored collection is malformed; treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Whether anything is stored under the key (malformed data counts).
    #[cfg(test)]
    pub(crate) async fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.storage.get(&self.key).await?.is_some())
    }

    /// Run one read-modify-write cycle.
    ///
    /// The closure returns `(result, changed)`; the collection is written back
    /// only when `changed` is true. Concurrent cycles on the same collection
    /// run one after another.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> (R, bool) + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;

        let mut items = self.load().await?;
        let (result, changed) = f(&mut items);
        if changed {
            self.write(&items).await?;
        }
        Ok(result)
    }

    /// Replace the whole collection.
    #[cfg(test)]
    pub(crate) async fn replace(&self, items: &[T]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(items).await
    }

    /// Delete the persisted collection entirely.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.storage.remove(&self.key).await.map_err(|err| {
            tracing::error!(key = %self.key, error = %err, "failed to clear collection");
            StoreError::from(err)
        })
    }

    async fn write(&self, items: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(items).map_err(|source| StoreError::Encode {
            key: self.key.clone(),
            source,
        })?;

        self.storage.set(&self.key, bytes).await.map_err(|err| {
            tracing::error!(key = %self.key, error = %err, "failed to write collection");
            StoreError::from(err)
        })
    }
}

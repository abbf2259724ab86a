use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Key-value persistence error.
///
/// These are **infrastructure errors** (storage unavailable, IO failures), as
/// opposed to domain errors (validation, availability).
#[derive(Debug, Error)]
pub enum KvError {
    #[error("storage io failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl KvError {
    pub fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Whole-value key-value storage.
///
/// Every call reads or replaces the complete value for a key; there is no
/// partial update and no multi-key atomicity.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw bytes stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), KvError>;
}

#[async_trait]
impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        (**self).remove(key).await
    }
}

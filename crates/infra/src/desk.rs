//! `LendingDesk`: the stores and flows wired over one storage backend.

use std::sync::Arc;

use anyhow::Context;

use lendkit_core::{Clock, SystemClock};
use lendkit_lending::{BorrowRecord, DepartmentSummary, history};

use crate::collection::StoreError;
use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
use crate::saga::BorrowSaga;
use crate::store::{ItemStore, RecordStore};

/// Handle to the item catalog, the borrow log and the flows across them.
///
/// Build one per process and pass clones around; clones share storage and
/// write locks.
#[derive(Debug, Clone)]
pub struct LendingDesk {
    items: ItemStore,
    records: RecordStore,
    saga: BorrowSaga,
}

impl LendingDesk {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: &StorageConfig) -> Self {
        let items = ItemStore::new(config.items_key.clone(), storage.clone());
        let records = RecordStore::new(config.records_key.clone(), storage, clock);
        let saga = BorrowSaga::new(items.clone(), records.clone());
        Self { items, records, saga }
    }

    /// In-memory desk with default keys and the system clock.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(SystemClock),
            &StorageConfig::default(),
        )
    }

    /// Build the desk described by `config` and make sure the item catalog
    /// exists.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
            StorageBackend::File => {
                let dir = config.storage.resolved_data_dir()?;
                let store = FileKeyValueStore::open(&dir)
                    .await
                    .with_context(|| format!("failed to open storage directory at {:?}", dir))?;
                tracing::info!(dir = %dir.display(), "using file storage");
                Arc::new(store)
            }
        };

        let desk = Self::new(storage, Arc::new(SystemClock), &config.storage);
        desk.items
            .init()
            .await
            .context("failed to initialize item catalog")?;
        Ok(desk)
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn saga(&self) -> &BorrowSaga {
        &self.saga
    }

    /// Returned records grouped by department, in first-seen order.
    pub async fn history(&self) -> Result<Vec<(String, Vec<BorrowRecord>)>, StoreError> {
        let records = self.records.list().await?;
        Ok(history::group_returned_by_department(&records))
    }

    /// Returned records for one department.
    pub async fn department_history(&self, department: &str) -> Result<Vec<BorrowRecord>, StoreError> {
        let records = self.records.list().await?;
        Ok(history::filter_by_department(&records, department))
    }

    pub async fn department_summaries(&self) -> Result<Vec<DepartmentSummary>, StoreError> {
        let records = self.records.list().await?;
        Ok(history::department_summaries(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendkit_inventory::NewItem;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_backed_desk_persists_across_instances() {
        let dir = tempdir().expect("tempdir");
        let config = AppConfig {
            storage: StorageConfig {
                data_dir: Some(dir.path().to_path_buf()),
                ..StorageConfig::default()
            },
            ..AppConfig::default()
        };

        let desk = LendingDesk::from_config(&config).await.unwrap();
        let item = desk
            .items()
            .add(NewItem::new("Caliper", "file:///caliper.jpg", 4))
            .await
            .unwrap();

        let reopened = LendingDesk::from_config(&config).await.unwrap();
        assert_eq!(reopened.items().list().await.unwrap(), vec![item]);
        assert!(dir.path().join("borrowed_items.json").exists());
    }

    #[tokio::test]
    async fn memory_desk_starts_with_empty_catalog() {
        let config = AppConfig {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                ..StorageConfig::default()
            },
            ..AppConfig::default()
        };
        let desk = LendingDesk::from_config(&config).await.unwrap();
        assert!(desk.items().list().await.unwrap().is_empty());
        assert!(desk.history().await.unwrap().is_empty());
    }
}

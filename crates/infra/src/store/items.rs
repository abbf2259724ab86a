use std::collections::HashMap;
use std::sync::Arc;

use lendkit_core::entity::{find_by_id, find_by_id_mut, position_of};
use lendkit_inventory::{Item, ItemChanges, ItemId, NewItem, next_item_id};

use crate::collection::{JsonCollection, StoreError};
use crate::kv::KeyValueStore;

/// Outcome of trying to take one unit of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitTake {
    /// One unit was taken; the item as persisted afterwards.
    Taken(Item),
    /// The item has no units left; nothing was written.
    Exhausted(Item),
    NotFound,
}

/// Catalog of borrowable items with unit accounting.
///
/// Cheap to clone; clones share the same collection and write lock.
#[derive(Debug, Clone)]
pub struct ItemStore {
    items: Arc<JsonCollection<Item>>,
}

impl ItemStore {
    pub fn new(key: impl Into<String>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: Arc::new(JsonCollection::new(key, storage)),
        }
    }

    /// Write an empty catalog if none is stored yet.
    ///
    /// Returns `true` when the catalog was (re)initialized.
    pub async fn init(&self) -> Result<bool, StoreError> {
        let initialized = self
            .items
            .mutate(|items| {
                let empty = items.is_empty();
                (empty, empty)
            })
            .await?;
        if initialized {
            tracing::info!(key = self.items.key(), "initialized empty item catalog");
        }
        Ok(initialized)
    }

    /// All items, in insertion order.
    pub async fn list(&self) -> Result<Vec<Item>, StoreError> {
        self.items.load().await
    }

    pub async fn get(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let items = self.list().await?;
        Ok(find_by_id(&items, id).cloned())
    }

    /// Add an item under the next free numeric id, with status `Available`.
    pub async fn add(&self, new: NewItem) -> Result<Item, StoreError> {
        let item = self
            .items
            .mutate(move |items| {
                let item = Item::create(next_item_id(items), new);
                items.push(item.clone());
                (item, true)
            })
            .await?;

        tracing::debug!(item_id = %item.id, units = item.available_units, "item added");
        Ok(item)
    }

    /// Merge `changes` into the item with `id`. `None` if there is no such item.
    pub async fn update(&self, id: &ItemId, changes: ItemChanges) -> Result<Option<Item>, StoreError> {
        let updated = self
            .items
            .mutate(|items| match find_by_id_mut(items, id) {
                Some(item) => {
                    item.apply(changes);
                    (Some(item.clone()), true)
                }
                None => (None, false),
            })
            .await?;

        match &updated {
            Some(item) => tracing::debug!(item_id = %item.id, "item updated"),
            None => tracing::debug!(item_id = %id, "update skipped: item not found"),
        }
        Ok(updated)
    }

    /// Add `delta` to the item's available units, clamped at zero.
    ///
    /// Negative on borrow, positive on return or cancel.
    pub async fn adjust_units(&self, id: &ItemId, delta: i64) -> Result<Option<Item>, StoreError> {
        let adjusted = self
            .items
            .mutate(|items| match find_by_id_mut(items, id) {
                Some(item) => {
                    item.adjust_units(delta);
                    (Some(item.clone()), true)
                }
                None => (None, false),
            })
            .await?;

        match &adjusted {
            Some(item) => tracing::debug!(
                item_id = %item.id,
                delta,
                units = item.available_units,
                "item units adjusted"
            ),
            None => tracing::debug!(item_id = %id, delta, "adjust skipped: item not found"),
        }
        Ok(adjusted)
    }

    /// Take one unit if any is left.
    ///
    /// The availability check and the decrement happen in the same
    /// read-modify-write cycle, so two overlapping borrows cannot both take
    /// the last unit.
    pub async fn take_unit(&self, id: &ItemId) -> Result<UnitTake, StoreError> {
        let outcome = self
            .items
            .mutate(|items| match find_by_id_mut(items, id) {
                Some(item) if item.is_available() => {
                    item.adjust_units(-1);
                    (UnitTake::Taken(item.clone()), true)
                }
                Some(item) => (UnitTake::Exhausted(item.clone()), false),
                None => (UnitTake::NotFound, false),
            })
            .await?;

        if let UnitTake::Taken(item) = &outcome {
            tracing::debug!(item_id = %item.id, units = item.available_units, "unit taken");
        }
        Ok(outcome)
    }

    /// Remove the item permanently. Returns whether an item was removed.
    ///
    /// Borrow records that reference the item are left untouched.
    pub async fn delete(&self, id: &ItemId) -> Result<bool, StoreError> {
        let removed = self
            .items
            .mutate(|items| match position_of(items, id) {
                Some(idx) => {
                    items.remove(idx);
                    (true, true)
                }
                None => (false, false),
            })
            .await?;

        tracing::debug!(item_id = %id, removed, "item delete");
        Ok(removed)
    }

    /// Current image reference for every item, keyed by id.
    pub async fn image_index(&self) -> Result<HashMap<ItemId, String>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|item| (item.id, item.image_url))
            .collect())
    }
}

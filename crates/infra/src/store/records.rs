use std::sync::Arc;

use lendkit_core::Clock;
use lendkit_core::entity::{find_by_id, find_by_id_mut};
use lendkit_lending::{BorrowRecord, Borrower, ItemSnapshot, RecordId, next_record_id};

use crate::collection::{JsonCollection, StoreError};
use crate::kv::KeyValueStore;

/// Log of borrow/return events.
///
/// Records are appended on borrow and mutated in place on return; they are
/// never deleted one at a time.
#[derive(Clone)]
pub struct RecordStore {
    records: Arc<JsonCollection<BorrowRecord>>,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn new(key: impl Into<String>, storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(JsonCollection::new(key, storage)),
            clock,
        }
    }

    /// All records, in insertion order.
    pub async fn list(&self) -> Result<Vec<BorrowRecord>, StoreError> {
        self.records.load().await
    }

    pub async fn get(&self, id: &RecordId) -> Result<Option<BorrowRecord>, StoreError> {
        let records = self.list().await?;
        Ok(find_by_id(&records, id).cloned())
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    /// Append a new `Borrowed` record dated today.
    ///
    /// Does not touch the item's unit counter; pair it with a prior
    /// `ItemStore::adjust_units(item_id, -1)` (see [`crate::saga::BorrowSaga`]).
    pub async fn create(
        &self,
        borrower: Borrower,
        item: ItemSnapshot,
        requested_return: impl Into<String>,
    ) -> Result<BorrowRecord, StoreError> {
        let now = self.clock.now();
        let requested_return = requested_return.into();

        let record = self
            .records
            .mutate(move |records| {
                let id = next_record_id(records, now.timestamp_millis());
                let record = BorrowRecord::open(id, borrower, item, requested_return, now.date_naive());
                records.push(record.clone());
                (record, true)
            })
            .await?;

        tracing::debug!(
            record_id = %record.id,
            item_id = %record.item_id(),
            department = %record.department(),
            "borrow record created"
        );
        Ok(record)
    }

    /// Mark the record returned today. `None` if there is no such record.
    pub async fn mark_returned(&self, id: &RecordId) -> Result<Option<BorrowRecord>, StoreError> {
        Ok(self.return_record(id).await?.map(|(_, returned)| returned))
    }

    /// Mark the record returned and hand back `(before, after)`.
    ///
    /// `before` lets callers tell a first return from a repeated one, and
    /// undo the return with [`RecordStore::restore`].
    pub async fn return_record(
        &self,
        id: &RecordId,
    ) -> Result<Option<(BorrowRecord, BorrowRecord)>, StoreError> {
        let today = self.clock.today();

        let returned = self
            .records
            .mutate(|records| match find_by_id_mut(records, id) {
                Some(record) => {
                    let before = record.clone();
                    record.mark_returned(today);
                    (Some((before, record.clone())), true)
                }
                None => (None, false),
            })
            .await?;

        match &returned {
            Some((before, record)) => tracing::debug!(
                record_id = %record.id,
                prior = %before.status,
                return_date = %record.return_date,
                "borrow record returned"
            ),
            None => tracing::debug!(record_id = %id, "return skipped: record not found"),
        }
        Ok(returned)
    }

    /// Put a record back to an earlier version of itself.
    ///
    /// Returns `false` if the record is gone.
    pub async fn restore(&self, previous: BorrowRecord) -> Result<bool, StoreError> {
        let record_id = previous.id.clone();
        let restored = self
            .records
            .mutate(move |records| match find_by_id_mut(records, &previous.id) {
                Some(record) => {
                    *record = previous;
                    (true, true)
                }
                None => (false, false),
            })
            .await?;

        tracing::debug!(record_id = %record_id, restored, "borrow record restored");
        Ok(restored)
    }

    /// Delete the whole borrow log (reset flow).
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.records.clear().await?;
        tracing::info!(key = self.records.key(), "borrow log cleared");
        Ok(())
    }
}

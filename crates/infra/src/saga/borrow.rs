//! Borrow and return flows.
//!
//! Borrow:
//! 1. `reserve` → take one unit if any is left (`take_unit`)
//! 2. `confirm` → append the borrow record
//!    - on failure: compensate with `adjust_units(+1)`
//! 3. `cancel` → the borrower backed out; compensate with `adjust_units(+1)`
//!
//! Return:
//! 1. mark the record returned
//! 2. give the unit back (`adjust_units(+1)`), only on the first return
//!    - on failure: put the record back the way it was, so the return can be retried

use thiserror::Error;

use lendkit_core::DomainError;
use lendkit_inventory::ItemId;
use lendkit_lending::{BorrowRecord, BorrowRequest, BorrowStatus, ItemSnapshot, RecordId};

use crate::collection::StoreError;
use crate::store::{ItemStore, RecordStore, UnitTake};

/// Borrow/return flow error.
#[derive(Debug, Error)]
pub enum BorrowError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("borrow record not found: {0}")]
    RecordNotFound(RecordId),

    /// A step failed and undoing the earlier step failed too. After a borrow
    /// the item's counter is one lower than it should be; after a return the
    /// record stays `Returned` without its unit.
    #[error("{cause}; compensation for item {item_id} also failed: {compensation}")]
    CompensationFailed {
        item_id: ItemId,
        cause: Box<BorrowError>,
        compensation: StoreError,
    },
}

/// Where a borrow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowState {
    /// One unit has been taken; no record exists yet.
    Reserved,
    /// The record was written; the borrow is complete.
    Recorded,
    /// The earlier step was undone.
    Compensated,
}

/// A unit taken from an item, waiting for the borrower to confirm.
///
/// Must be consumed by [`BorrowSaga::confirm`] or [`BorrowSaga::cancel`];
/// dropping it leaves the unit taken.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a reservation holds a unit until it is confirmed or cancelled"]
pub struct Reservation {
    item: ItemSnapshot,
    units_left: u32,
}

impl Reservation {
    pub fn item(&self) -> &ItemSnapshot {
        &self.item
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item.item_id
    }

    /// Units left on the item right after this reservation.
    pub fn units_left(&self) -> u32 {
        self.units_left
    }
}

/// Result of a return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub record: BorrowRecord,
    /// Whether this call moved the record out of `Borrowed`.
    pub newly_returned: bool,
    /// Units on the item after the unit was given back; `None` if no unit was
    /// given back or the item no longer exists.
    pub units_available: Option<u32>,
}

/// Orchestrates the borrow and return flows over both stores.
#[derive(Debug, Clone)]
pub struct BorrowSaga {
    items: ItemStore,
    records: RecordStore,
}

impl BorrowSaga {
    pub fn new(items: ItemStore, records: RecordStore) -> Self {
        Self { items, records }
    }

    /// Take one unit of the item for a pending borrow.
    ///
    /// Rejects items with no units left before touching the counter.
    pub async fn reserve(&self, item_id: &ItemId) -> Result<Reservation, BorrowError> {
        let taken = match self.items.take_unit(item_id).await? {
            UnitTake::Taken(item) => item,
            UnitTake::Exhausted(item) => {
                return Err(DomainError::unavailable(format!(
                    "no units of '{}' left to borrow",
                    item.name
                ))
                .into());
            }
            UnitTake::NotFound => return Err(BorrowError::ItemNotFound(item_id.clone())),
        };

        tracing::debug!(
            item_id = %item_id,
            units_left = taken.available_units,
            state = ?BorrowState::Reserved,
            "unit reserved"
        );
        Ok(Reservation {
            item: ItemSnapshot::from(&taken),
            units_left: taken.available_units,
        })
    }

    /// Write the borrow record for a reservation.
    ///
    /// If the request is invalid or the record cannot be persisted, the unit
    /// is given back before the error is returned.
    pub async fn confirm(
        &self,
        reservation: Reservation,
        request: &BorrowRequest,
    ) -> Result<BorrowRecord, BorrowError> {
        let created = match request.validate() {
            Ok(()) => self
                .records
                .create(request.borrower(), reservation.item.clone(), request.requested_return())
                .await
                .map_err(BorrowError::from),
            Err(err) => Err(BorrowError::from(err)),
        };

        match created {
            Ok(record) => {
                tracing::info!(
                    record_id = %record.id,
                    item_id = %record.item_id(),
                    state = ?BorrowState::Recorded,
                    "borrow recorded"
                );
                Ok(record)
            }
            Err(cause) => Err(self.compensate(reservation.item.item_id, cause).await),
        }
    }

    /// Give back the unit of a reservation the borrower declined.
    pub async fn cancel(&self, reservation: Reservation) -> Result<(), BorrowError> {
        let item_id = reservation.item.item_id;
        let restored = self.items.adjust_units(&item_id, 1).await?;
        tracing::info!(
            item_id = %item_id,
            units = ?restored.as_ref().map(|i| i.available_units),
            state = ?BorrowState::Compensated,
            "reservation cancelled"
        );
        Ok(())
    }

    /// Reserve and confirm in one call.
    ///
    /// The request is validated before any unit is taken.
    pub async fn borrow(
        &self,
        item_id: &ItemId,
        request: &BorrowRequest,
    ) -> Result<BorrowRecord, BorrowError> {
        request.validate()?;
        let reservation = self.reserve(item_id).await?;
        self.confirm(reservation, request).await
    }

    /// Mark a record returned and give its unit back.
    ///
    /// A record that was already returned keeps `Returned` (with today's
    /// date) but does not give a second unit back. A deleted item is logged
    /// and skipped. If the unit cannot be given back, the record is restored
    /// to its previous state before the error is returned.
    pub async fn return_item(&self, record_id: &RecordId) -> Result<ReturnOutcome, BorrowError> {
        let (before, record) = self
            .records
            .return_record(record_id)
            .await?
            .ok_or_else(|| BorrowError::RecordNotFound(record_id.clone()))?;

        let newly_returned = before.status != BorrowStatus::Returned;
        if !newly_returned {
            tracing::debug!(record_id = %record.id, "record already returned; units unchanged");
            return Ok(ReturnOutcome {
                record,
                newly_returned,
                units_available: None,
            });
        }

        let restored = match self.items.adjust_units(record.item_id(), 1).await {
            Ok(restored) => restored,
            Err(cause) => return Err(self.reopen(before, cause.into()).await),
        };
        if restored.is_none() {
            tracing::warn!(
                record_id = %record.id,
                item_id = %record.item_id(),
                "returned item no longer exists in the catalog"
            );
        }

        tracing::info!(record_id = %record.id, item_id = %record.item_id(), "item returned");
        Ok(ReturnOutcome {
            units_available: restored.map(|i| i.available_units),
            record,
            newly_returned,
        })
    }

    async fn reopen(&self, before: BorrowRecord, cause: BorrowError) -> BorrowError {
        let item_id = before.item_id().clone();
        tracing::warn!(
            record_id = %before.id,
            item_id = %item_id,
            error = %cause,
            "return failed; restoring the record"
        );

        match self.records.restore(before).await {
            Ok(_) => {
                tracing::debug!(item_id = %item_id, state = ?BorrowState::Compensated, "record restored");
                cause
            }
            Err(compensation) => {
                tracing::error!(
                    item_id = %item_id,
                    error = %compensation,
                    "compensation failed; record is returned without its unit"
                );
                BorrowError::CompensationFailed {
                    item_id,
                    cause: Box::new(cause),
                    compensation,
                }
            }
        }
    }

    async fn compensate(&self, item_id: ItemId, cause: BorrowError) -> BorrowError {
        tracing::warn!(item_id = %item_id, error = %cause, "borrow failed; giving the unit back");

        match self.items.adjust_units(&item_id, 1).await {
            Ok(_) => {
                tracing::debug!(item_id = %item_id, state = ?BorrowState::Compensated, "unit restored");
                cause
            }
            Err(compensation) => {
                tracing::error!(
                    item_id = %item_id,
                    error = %compensation,
                    "compensation failed; unit counter is off by one"
                );
                BorrowError::CompensationFailed {
                    item_id,
                    cause: Box::new(cause),
                    compensation,
                }
            }
        }
    }
}

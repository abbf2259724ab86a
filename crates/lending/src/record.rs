use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lendkit_core::{Entity, string_id};
use lendkit_inventory::{Item, ItemId};

string_id!(
    /// Borrow record identifier (epoch milliseconds at creation, as a string).
    pub struct RecordId, "RecordId"
);

/// Lifecycle state of a borrow record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorrowStatus {
    Borrowed,
    Returned,
    /// Part of the persisted vocabulary; no operation assigns it.
    Overdue,
}

impl BorrowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "Borrowed",
            BorrowStatus::Returned => "Returned",
            BorrowStatus::Overdue => "Overdue",
        }
    }
}

impl core::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrower profile captured when the record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub student_name: String,
    pub student_id: String,
    pub department: String,
    pub course: String,
    pub instructor: String,
}

/// Denormalized copy of the borrowed item, kept even if the item is later
/// edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub item_id: ItemId,
    pub item_name: String,
    #[serde(default)]
    pub image_url: String,
}

impl From<&Item> for ItemSnapshot {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

/// One borrow-and-return lifecycle for one unit of one item.
///
/// Persisted flat: the borrower and item snapshot fields sit next to the
/// record's own fields in the JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub borrower: Borrower,
    #[serde(flatten)]
    pub item: ItemSnapshot,
    pub borrow_date: NaiveDate,
    /// Requested time-out while borrowed; the actual return date (ISO
    /// `YYYY-MM-DD`) once returned.
    pub return_date: String,
    pub status: BorrowStatus,
}

impl Entity for BorrowRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl BorrowRecord {
    /// Open a new record in the `Borrowed` state.
    pub fn open(
        id: RecordId,
        borrower: Borrower,
        item: ItemSnapshot,
        requested_return: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            id,
            borrower,
            item,
            borrow_date: today,
            return_date: requested_return.into(),
            status: BorrowStatus::Borrowed,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item.item_id
    }

    pub fn department(&self) -> &str {
        &self.borrower.department
    }

    pub fn is_returned(&self) -> bool {
        self.status == BorrowStatus::Returned
    }

    /// Flip to `Returned`, stamping today's date. Returns the prior status.
    ///
    /// Both fields are written together, so a repeated call only moves the
    /// return date forward.
    pub fn mark_returned(&mut self, today: NaiveDate) -> BorrowStatus {
        let prior = self.status;
        self.status = BorrowStatus::Returned;
        self.return_date = today.format("%Y-%m-%d").to_string();
        prior
    }
}

/// Allocate a record id from the current epoch milliseconds, bumped above any
/// existing numeric id so ids stay unique within the collection.
pub fn next_record_id(records: &[BorrowRecord], now_millis: i64) -> RecordId {
    let candidate = now_millis.max(0);
    let max_existing = records
        .iter()
        .filter_map(|r| r.id.as_str().parse::<i64>().ok())
        .max();
    let id = match max_existing {
        Some(max) if max >= candidate => max.saturating_add(1),
        _ => candidate,
    };
    RecordId::new(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn test_borrower() -> Borrower {
        Borrower {
            student_name: "Ana Cruz".to_string(),
            student_id: "2021-0042".to_string(),
            department: "CEIT".to_string(),
            course: "BSCE".to_string(),
            instructor: "Engr. Santos".to_string(),
        }
    }

    fn test_record(id: &str) -> BorrowRecord {
        BorrowRecord::open(
            RecordId::from(id),
            test_borrower(),
            ItemSnapshot {
                item_id: ItemId::from("1"),
                item_name: "Multimeter".to_string(),
                image_url: "file:///meter.jpg".to_string(),
            },
            "3:00 PM",
            test_date(1),
        )
    }

    #[test]
    fn open_record_is_borrowed_with_requested_return() {
        let record = test_record("100");
        assert_eq!(record.status, BorrowStatus::Borrowed);
        assert_eq!(record.return_date, "3:00 PM");
        assert_eq!(record.borrow_date, test_date(1));
    }

    #[test]
    fn mark_returned_stamps_date_and_reports_prior_status() {
        let mut record = test_record("100");
        assert_eq!(record.mark_returned(test_date(3)), BorrowStatus::Borrowed);
        assert_eq!(record.status, BorrowStatus::Returned);
        assert_eq!(record.return_date, "2024-05-03");

        assert_eq!(record.mark_returned(test_date(4)), BorrowStatus::Returned);
        assert_eq!(record.status, BorrowStatus::Returned);
        assert_eq!(record.return_date, "2024-05-04");
    }

    #[test]
    fn persisted_layout_is_flat_camel_case() {
        let json = serde_json::to_value(test_record("100")).unwrap();
        assert_eq!(json["id"], "100");
        assert_eq!(json["studentName"], "Ana Cruz");
        assert_eq!(json["itemId"], "1");
        assert_eq!(json["itemName"], "Multimeter");
        assert_eq!(json["imageUrl"], "file:///meter.jpg");
        assert_eq!(json["borrowDate"], "2024-05-01");
        assert_eq!(json["returnDate"], "3:00 PM");
        assert_eq!(json["status"], "Borrowed");
    }

    #[test]
    fn reads_overdue_status() {
        let mut json = serde_json::to_value(test_record("100")).unwrap();
        json["status"] = "Overdue".into();
        let record: BorrowRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.status, BorrowStatus::Overdue);
    }

    #[test]
    fn next_record_id_uses_clock_when_free() {
        assert_eq!(next_record_id(&[], 1_700_000_000_000).as_str(), "1700000000000");
    }

    #[test]
    fn next_record_id_bumps_past_collisions() {
        let records = vec![test_record("1700000000000")];
        assert_eq!(next_record_id(&records, 1_700_000_000_000).as_str(), "1700000000001");
    }
}

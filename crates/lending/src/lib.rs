//! Lending domain module.
//!
//! Borrow records (who borrowed which item, and when it came back), the borrow
//! request captured from the form, and read-only history views over returned
//! records. Pure domain logic; persistence lives in `lendkit-infra`.

pub mod history;
pub mod record;
pub mod request;

pub use history::{DepartmentSummary, department_summaries, filter_by_department, group_returned_by_department};
pub use record::{BorrowRecord, BorrowStatus, Borrower, ItemSnapshot, RecordId, next_record_id};
pub use request::BorrowRequest;

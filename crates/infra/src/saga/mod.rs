//! Flows that span the item catalog and the borrow log.
//!
//! The two collections are persisted independently, so there is no
//! transaction across them. Each flow is an explicit sequence of steps with a
//! compensating action for the unit counter when a later step fails.

pub mod borrow;

pub use borrow::{BorrowError, BorrowSaga, BorrowState, Reservation, ReturnOutcome};

//! Item and borrow-record stores.
//!
//! Each store owns one persisted collection. The two stores never call each
//! other; flows that touch both go through [`crate::saga`].

pub mod items;
pub mod records;

pub use items::{ItemStore, UnitTake};
pub use records::RecordStore;

/// Default storage key for the item catalog.
pub const ITEMS_KEY: &str = "@borrowed_items";

/// Default storage key for the borrow log.
pub const RECORDS_KEY: &str = "@borrowers_list";

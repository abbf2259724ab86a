//! Inventory domain module.
//!
//! Catalog entries for borrowable items and the rules for their
//! available-unit counters, implemented purely as deterministic domain logic
//! (no IO, no storage).

pub mod item;

pub use item::{AVAILABLE_STATUS, Item, ItemChanges, ItemId, NewItem, next_item_id};

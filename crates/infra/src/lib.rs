//! Infrastructure layer: persistence, configuration, cross-store flows.

pub mod collection;
pub mod config;
pub mod desk;
pub mod kv;
pub mod saga;
pub mod store;


pub use collection::{JsonCollection, StoreError};
pub use crate::config::{AppConfig, StorageBackend, StorageConfig};
pub use desk::LendingDesk;
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, KvError};
pub use saga::{BorrowError, BorrowSaga, Reservation, ReturnOutcome};
pub use store::{ItemStore, RecordStore, UnitTake};

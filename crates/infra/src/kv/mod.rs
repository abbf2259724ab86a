//! Key-value persistence boundary.
//!
//! The stores persist each collection as one JSON blob under a fixed key. This
//! module defines the byte-level service they write through, with no
//! assumptions about where the bytes end up.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
pub use r#trait::{KeyValueStore, KvError};

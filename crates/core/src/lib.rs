//! `lendkit-core`: shared building blocks for the lending domain.
//!
//! This crate contains **pure domain** primitives (no storage, no IO beyond
//! reading the system clock).

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};

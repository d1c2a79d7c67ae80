//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: whole-collection persistence (JSON arrays by key)
//! - `Clock`: current time for timestamps and expiry

pub mod clock;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{KeyValueStore, StorageError};

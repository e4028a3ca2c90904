//! Local persistence: key-value JSON storage and the daily log store.

mod fitness_store;
mod migration;
mod storage;

pub use fitness_store::FitnessStore;
pub use migration::{migrate, SCHEMA_VERSION};
pub use storage::{LocalStorage, StorageError, StorageKey};

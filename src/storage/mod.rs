//! Key-value persistence
//!
//! The persisted state is a single flat record of JSON values. The
//! [`KeyValueStore`] trait is the collaborator contract (asynchronous, no
//! transactions - multi-key consistency is the caller's responsibility);
//! [`MemoryStore`] and [`FileStore`] are the shipped backends.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Flat string-keyed record of persisted values.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Asynchronous key-value store over a flat record.
///
/// Operations are suspension points; callers must not assume synchronous
/// completion. Handlers for the same logical resource are expected not to
/// execute concurrently with each other.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read the requested keys. Absent keys are simply omitted from the
    /// returned record.
    async fn get(&self, keys: &[&str]) -> Result<Record, StorageError>;

    /// Write every entry of `entries`, overwriting existing values.
    async fn set(&self, entries: Record) -> Result<(), StorageError>;

    /// Remove the given keys. Removing an absent key is a no-op.
    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError>;
}

//! In-memory record store
//!
//! Backs tests and short-lived processes. Clones share the same record.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{KeyValueStore, Record, StorageError};

/// A [`KeyValueStore`] holding the record in memory behind a shared mutex.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an existing record.
    pub fn with_record(record: Record) -> Self {
        Self {
            data: Arc::new(Mutex::new(record)),
        }
    }

    /// Copy of the full record, for inspection.
    pub async fn snapshot(&self) -> Record {
        self.data.lock().await.clone()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Record, StorageError> {
        let data = self.data.lock().await;
        let mut out = Record::new();
        for key in keys {
            if let Some(value) = data.get(*key) {
                out.insert((*key).to_string(), value.clone());
            }
        }
        Ok(out)
    }

    async fn set(&self, entries: Record) -> Result<(), StorageError> {
        let mut data = self.data.lock().await;
        for (key, value) in entries {
            data.insert(key, value);
        }
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut data = self.data.lock().await;
        for key in keys {
            data.remove(*key);
        }
        Ok(())
    }
}

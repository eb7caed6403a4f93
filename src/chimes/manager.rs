//! Custom chime manager
//!
//! CRUD over the bounded collection of custom audio slots (hour 1-12). Each
//! slot persists under its own `customChime<hour>` key; the set of occupied
//! hours persists under `customChimes` and is mirrored by an in-memory index
//! loaded lazily on first access. Every mutation refreshes the index from
//! storage before acting, so a stale cache never drives a write.
//!
//! Storage failures propagate unchanged; the store performs no retries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::storage::{KeyValueStore, Record, StorageError};

/// Record key holding the list of occupied hours.
pub const KEY_CUSTOM_CHIMES: &str = "customChimes";

pub const MIN_HOUR: u8 = 1;
pub const MAX_HOUR: u8 = 12;

/// Record key for the slot of an hour, e.g. `customChime7`.
pub fn slot_key(hour: u8) -> String {
    format!("customChime{hour}")
}

/// One custom audio slot: the original filename and a self-contained
/// data-URL payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChimeSlot {
    pub name: String,
    pub data: String,
}

#[derive(Debug, Error)]
pub enum ChimeError {
    #[error("chime hour {0} is outside 1-12")]
    InvalidHour(u8),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Manager for the custom chime slots.
///
/// Construction is cheap and side-effect-free; the occupancy index is loaded
/// from storage on first access. The index read-modify-write inside each
/// mutation is a critical section guarded by an async mutex, so one instance
/// stays consistent even on a multi-threaded runtime.
pub struct ChimeStore<S> {
    store: S,
    index: Mutex<Option<HashSet<u8>>>,
}

impl<S: KeyValueStore> ChimeStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            index: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the slot for `hour`. A missing or malformed persisted value is
    /// reported as `None`, not as an error.
    pub async fn get(&self, hour: u8) -> Result<Option<ChimeSlot>, ChimeError> {
        let key = slot_key(hour);
        let record = self.store.get(&[key.as_str()]).await?;
        let slot = record
            .get(&key)
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        Ok(slot)
    }

    /// Assign a custom chime to `hour`, overwriting any previous slot.
    ///
    /// The occupancy index is force-reloaded first so the write never acts on
    /// stale membership, then the updated index and the new slot persist in a
    /// single `set` call. The in-memory index only updates after the write
    /// succeeds, so a failed persist leaves no inconsistent cache behind.
    pub async fn set(&self, hour: u8, name: &str, data: &str) -> Result<(), ChimeError> {
        if !(MIN_HOUR..=MAX_HOUR).contains(&hour) {
            return Err(ChimeError::InvalidHour(hour));
        }

        let mut index = self.index.lock().await;
        let mut hours = load_index(&self.store).await?;
        hours.insert(hour);

        let slot = ChimeSlot {
            name: name.to_string(),
            data: data.to_string(),
        };
        let mut entries = Record::new();
        entries.insert(KEY_CUSTOM_CHIMES.to_string(), index_value(&hours));
        entries.insert(
            slot_key(hour),
            serde_json::to_value(slot).map_err(StorageError::Encode)?,
        );
        self.store.set(entries).await?;

        *index = Some(hours);
        Ok(())
    }

    /// Remove the custom chime for `hour`. Deleting a non-present hour is a
    /// no-op.
    ///
    /// The index persists before the slot key is removed. A process dying
    /// between the two writes leaves an orphaned slot payload that no index
    /// entry points at; readers ignore it.
    pub async fn delete(&self, hour: u8) -> Result<(), ChimeError> {
        let mut index = self.index.lock().await;
        let mut hours = load_index(&self.store).await?;
        hours.remove(&hour);

        let mut entries = Record::new();
        entries.insert(KEY_CUSTOM_CHIMES.to_string(), index_value(&hours));
        self.store.set(entries).await?;
        *index = Some(hours);

        let key = slot_key(hour);
        self.store.remove(&[key.as_str()]).await?;
        Ok(())
    }

    /// Remove every custom chime and reset the index to empty.
    pub async fn clear(&self) -> Result<(), ChimeError> {
        let mut index = self.index.lock().await;
        let hours = load_index(&self.store).await?;

        let mut entries = Record::new();
        entries.insert(KEY_CUSTOM_CHIMES.to_string(), Value::Array(Vec::new()));
        self.store.set(entries).await?;
        *index = Some(HashSet::new());

        let keys: Vec<String> = hours.iter().map(|hour| slot_key(*hour)).collect();
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.store.remove(&key_refs).await?;
        Ok(())
    }

    /// The set of occupied hours. Reloads from storage when `force_reload`
    /// is set or when no cached index exists yet.
    pub async fn list(&self, force_reload: bool) -> Result<HashSet<u8>, ChimeError> {
        let mut index = self.index.lock().await;
        if force_reload || index.is_none() {
            *index = Some(load_index(&self.store).await?);
        }
        Ok(index.clone().unwrap_or_default())
    }

    /// Whether `hour` has a custom chime assigned.
    pub async fn has(&self, hour: u8) -> Result<bool, ChimeError> {
        Ok(self.list(false).await?.contains(&hour))
    }
}

/// Read the occupancy index from storage. A missing or malformed index reads
/// as empty.
async fn load_index<S: KeyValueStore>(store: &S) -> Result<HashSet<u8>, StorageError> {
    let record = store.get(&[KEY_CUSTOM_CHIMES]).await?;
    let hours = record
        .get(KEY_CUSTOM_CHIMES)
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_u64)
                .map(|hour| hour as u8)
                .collect()
        })
        .unwrap_or_default();
    Ok(hours)
}

/// Persisted form of the index: a sorted array of hour integers.
fn index_value(hours: &HashSet<u8>) -> Value {
    let mut sorted: Vec<u8> = hours.iter().copied().collect();
    sorted.sort_unstable();
    Value::from(sorted)
}

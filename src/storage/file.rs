//! File-backed record store
//!
//! Persists the whole record as one JSON document. Every operation is a
//! read-modify-write of the file; a missing file reads as an empty record.
//! Single-writer use is assumed (one process owns the file).

use std::path::{Path, PathBuf};

use super::{KeyValueStore, Record, StorageError};

/// A [`KeyValueStore`] persisting the record to a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default store location under the platform data directory,
    /// e.g. `~/.local/share/grandfather-fox/storage.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("grandfather-fox")
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_record(&self) -> Result<Record, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Record::new()),
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| StorageError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    async fn write_record(&self, record: &Record) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Write {
                    path: self.path.clone(),
                    source: e,
                })?;
        }

        let bytes = serde_json::to_vec_pretty(record).map_err(StorageError::Encode)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| StorageError::Write {
                path: self.path.clone(),
                source: e,
            })
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, keys: &[&str]) -> Result<Record, StorageError> {
        let data = self.read_record().await?;
        let mut out = Record::new();
        for key in keys {
            if let Some(value) = data.get(*key) {
                out.insert((*key).to_string(), value.clone());
            }
        }
        Ok(out)
    }

    async fn set(&self, entries: Record) -> Result<(), StorageError> {
        let mut data = self.read_record().await?;
        for (key, value) in entries {
            data.insert(key, value);
        }
        self.write_record(&data).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut data = self.read_record().await?;
        for key in keys {
            data.remove(*key);
        }
        self.write_record(&data).await
    }
}

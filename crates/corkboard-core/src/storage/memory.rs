//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral sessions.
///
/// An optional byte capacity models a browser-style storage quota: a write
/// that would push the total size of all records past it is rejected.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    /// Create a new empty memory storage without a size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory storage that holds at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::default(),
            capacity: Some(capacity),
        }
    }

    /// Store a raw record synchronously (e.g. to plant corrupt data).
    pub fn insert_raw(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.records
            .read()
            .map(|records| records.values().map(String::len).sum())
            .unwrap_or(0)
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut records = self
                .records
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            if let Some(capacity) = self.capacity {
                let others: usize = records
                    .iter()
                    .filter(|(k, _)| **k != key)
                    .map(|(_, v)| v.len())
                    .sum();
                let needed = others + value.len();
                if needed > capacity {
                    return Err(StorageError::QuotaExceeded { needed, capacity });
                }
            }
            records.insert(key, value);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<String>> {
        let key = key.to_string();
        Box::pin(async move {
            let records = self
                .records
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            records.get(&key).cloned().ok_or(StorageError::NotFound(key))
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut records = self
                .records
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            records.remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let records = self
                .records
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(records.keys().cloned().collect())
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let records = self
                .records
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(records.contains_key(&key))
        })
    }
}

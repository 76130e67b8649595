//! Durable key-value storage and the persistence gateway built on top of it.

mod gateway;
mod latency;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use gateway::{PersistenceGateway, proposals_key};
pub use latency::Latency;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage quota exceeded: {needed} bytes needed, capacity is {capacity}")]
    QuotaExceeded { needed: usize, capacity: usize },
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for durable key-value backends holding serialized records.
///
/// Every write replaces the whole record stored under a key; there is no
/// field-level locking.
pub trait Storage: Send + Sync {
    /// Write a record, replacing any previous value.
    fn save(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>>;

    /// Read a record.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<String>>;

    /// Delete a record. Deleting a missing record is not an error.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all record keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a record exists.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

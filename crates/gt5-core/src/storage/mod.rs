//! Key-value persistence for saved drawings.
//!
//! Backends store string values under string keys, the same shape as
//! browser local storage. [`DrawingLibrary`] layers the saved-drawing list
//! on top of any backend.

mod file;
mod library;
mod memory;

pub use file::FileStorage;
pub use library::{DRAWINGS_KEY, DrawingLibrary, DrawingSummary, SavedDrawing};
pub use memory::MemoryStorage;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for key-value storage backends.
pub trait Storage: Send + Sync {
    /// Read a value. Missing keys read as `None`.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All stored keys.
    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;
}

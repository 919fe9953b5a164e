//! BackingStore - asynchronous single-key string storage boundary.
//!
//! The store treats persistence as an opaque get/set of one string under
//! one fixed key. Implementations decide durability and write ordering;
//! the document store only relies on "a successful set is readable by a
//! later get".

mod file;
mod in_memory;

use async_trait::async_trait;
use std::fmt;

pub use file::FileBackingStore;
pub use in_memory::InMemoryBackingStore;

/// Error type for backing store operations. Opaque by design: the document
/// store logs these and degrades instead of propagating them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackingError {
    /// Underlying I/O failed.
    Io(String),
    /// An in-process lock was poisoned.
    LockPoisoned,
}

impl fmt::Display for BackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackingError::Io(message) => write!(f, "backing store i/o error: {}", message),
            BackingError::LockPoisoned => write!(f, "backing store lock poisoned"),
        }
    }
}

impl std::error::Error for BackingError {}

/// Abstract asynchronous key-value storage for serialized documents.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Read the string stored under `key`. Returns `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, BackingError>;

    /// Replace the string stored under `key` wholesale.
    async fn set(&self, key: &str, value: String) -> Result<(), BackingError>;
}

//! Origin-scoped key-value storage with cross-context change events.
//!
//! A storage *origin* is the unit of sharing: every context (a browser tab,
//! a CLI process) that opens the same origin reads and writes the same
//! slots. When one context changes a slot, every *other* context of that
//! origin receives a [`StorageEvent`]; the writer never sees its own change.
//!
//! Two backends are provided:
//!
//! - [`MemoryOrigin`] - in-process origin, contexts are cheap handles
//! - [`FileStorage`] - a directory on disk, contexts may live in separate
//!   processes and changes are discovered by polling
//!
//! Writes are whole-value overwrites with no locking. Concurrent writers
//! resolve as last write wins.

use std::fmt;

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::{MemoryOrigin, MemoryStorage};

/// Well-known slot names.
pub mod keys {
    /// Slot holding the serialized cart.
    pub const CART: &str = "so_cart";
}

/// Capacity of the per-origin event channel.
pub(crate) const EVENT_CAPACITY: usize = 64;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on slot {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The slot name cannot be stored by this backend.
    #[error("Invalid slot key: {0:?}")]
    InvalidKey(String),
}

/// Identity of one execution context within an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    /// A fresh, unique context identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identity used for changes made by a context this process cannot name,
    /// such as another process writing to a shared directory.
    #[must_use]
    pub const fn external() -> Self {
        Self(Uuid::nil())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification that a slot changed in some context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Slot that changed.
    pub key: String,
    /// Raw value before the change.
    pub old_value: Option<String>,
    /// Raw value after the change, `None` when the slot was removed.
    pub new_value: Option<String>,
    /// Context that made the change.
    pub source: ContextId,
}

/// What a subscriber observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSignal {
    /// Another context changed a slot.
    Changed(StorageEvent),
    /// The subscriber fell behind and this many events were dropped.
    Missed(u64),
}

/// Stream of storage events for one context.
///
/// Events originating from the subscribing context are filtered out.
pub struct StorageEvents {
    rx: broadcast::Receiver<StorageEvent>,
    context: ContextId,
}

impl StorageEvents {
    pub(crate) const fn new(rx: broadcast::Receiver<StorageEvent>, context: ContextId) -> Self {
        Self { rx, context }
    }

    /// Wait for the next change made by another context.
    ///
    /// Returns `None` once the origin has shut down.
    pub async fn recv(&mut self) -> Option<StorageSignal> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.source == self.context => {}
                Ok(event) => return Some(StorageSignal::Changed(event)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    return Some(StorageSignal::Missed(n));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// A context's view of an origin's key-value storage.
///
/// All operations are synchronous, mirroring browser `localStorage`.
pub trait SlotStorage: Send + Sync {
    /// Identity of the context this handle belongs to.
    fn context_id(&self) -> ContextId;

    /// Read the raw value of a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribe to changes made by other contexts.
    fn subscribe(&self) -> StorageEvents;
}

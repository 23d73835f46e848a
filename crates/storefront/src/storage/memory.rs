//! In-process storage origin.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::trace;

use super::{
    ContextId, EVENT_CAPACITY, SlotStorage, StorageError, StorageEvent, StorageEvents,
};

/// An in-memory origin shared by any number of contexts.
///
/// Cheaply cloneable via `Arc`. Contexts opened from the same origin (or a
/// clone of it) see each other's writes.
#[derive(Clone)]
pub struct MemoryOrigin {
    inner: Arc<MemoryOriginInner>,
}

struct MemoryOriginInner {
    slots: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryOrigin {
    /// Create an empty origin.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(MemoryOriginInner {
                slots: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Open a new context (a "tab") on this origin.
    #[must_use]
    pub fn open_context(&self) -> MemoryStorage {
        MemoryStorage {
            origin: self.clone(),
            id: ContextId::new(),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, key: &str, value: Option<&str>, source: ContextId) {
        // Publish under the slot guard so events leave in the order writes land
        let mut slots = self.slots();
        let old_value = match value {
            Some(value) => slots.insert(key.to_string(), value.to_string()),
            None => slots.remove(key),
        };

        // Storage events only fire when the value actually changes
        if old_value.as_deref() == value {
            return;
        }

        let event = StorageEvent {
            key: key.to_string(),
            old_value,
            new_value: value.map(str::to_string),
            source,
        };
        // No receivers is fine: no other context is listening yet
        if self.inner.events.send(event).is_err() {
            trace!(key, "Storage change with no listeners");
        }
    }
}

impl Default for MemoryOrigin {
    fn default() -> Self {
        Self::new()
    }
}

/// One context's handle on a [`MemoryOrigin`].
#[derive(Clone)]
pub struct MemoryStorage {
    origin: MemoryOrigin,
    id: ContextId,
}

impl MemoryStorage {
    /// The origin this context belongs to.
    #[must_use]
    pub const fn origin(&self) -> &MemoryOrigin {
        &self.origin
    }
}

impl SlotStorage for MemoryStorage {
    fn context_id(&self) -> ContextId {
        self.id
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.origin.slots().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.origin.write(key, Some(value), self.id);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.origin.write(key, None, self.id);
        Ok(())
    }

    fn subscribe(&self) -> StorageEvents {
        StorageEvents::new(self.origin.inner.events.subscribe(), self.id)
    }
}

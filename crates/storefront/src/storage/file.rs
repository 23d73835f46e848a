//! Directory-backed storage origin.
//!
//! Each slot is one file, `<dir>/<key>.json`. Writes go to a temporary file
//! that is renamed over the slot, so readers never observe a torn value.
//! Changes made by other processes are discovered by [`FileStorage::spawn_watcher`],
//! which polls the slot and compares it with the last value this context
//! read or wrote.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    ContextId, EVENT_CAPACITY, SlotStorage, StorageError, StorageEvent, StorageEvents,
};

/// One context's handle on a storage directory.
///
/// Cheaply cloneable via `Arc`; clones are the same context.
#[derive(Clone)]
pub struct FileStorage {
    inner: Arc<FileStorageInner>,
}

struct FileStorageInner {
    dir: PathBuf,
    id: ContextId,
    events: broadcast::Sender<StorageEvent>,
    /// Last raw value this context knows each slot to hold.
    known: Mutex<HashMap<String, Option<String>>>,
}

impl FileStorage {
    /// Open a context on `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            inner: Arc::new(FileStorageInner {
                dir,
                id: ContextId::new(),
                events,
                known: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Directory acting as the origin.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Poll `key` every `interval` and publish changes made by other processes.
    ///
    /// The task runs until every handle on this context has been dropped.
    #[must_use = "dropping the handle detaches the watcher; keep it to abort or await it"]
    pub fn spawn_watcher(&self, key: &str, interval: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let key = key.to_string();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    debug!(key = %key, "Storage context dropped, stopping watcher");
                    return;
                };
                let storage = Self { inner };
                if let Err(e) = storage.poll(&key) {
                    warn!(key = %key, error = %e, "Failed to poll storage slot");
                }
            }
        })
    }

    /// Compare the slot on disk with the last known value and publish a change.
    ///
    /// The `known` guard is held across the read and the publish so a save by
    /// this context can never land between them.
    fn poll(&self, key: &str) -> Result<(), StorageError> {
        let mut known = self.known();
        let current = self.read(key)?;
        let old_value = match known.insert(key.to_string(), current.clone()) {
            // First observation of a slot establishes the baseline
            None => return Ok(()),
            Some(previous) if previous == current => return Ok(()),
            Some(previous) => previous,
        };

        let event = StorageEvent {
            key: key.to_string(),
            old_value,
            new_value: current,
            source: ContextId::external(),
        };
        let _ = self.inner.events.send(event);
        Ok(())
    }

    fn known(&self) -> MutexGuard<'_, HashMap<String, Option<String>>> {
        self.inner
            .known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.inner.dir.join(format!("{key}.json")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

impl SlotStorage for FileStorage {
    fn context_id(&self) -> ContextId {
        self.inner.id
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut known = self.known();
        let value = self.read(key)?;
        known.insert(key.to_string(), value.clone());
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let tmp = self
            .inner
            .dir
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::write(&tmp, value).map_err(io_err)?;

        // The rename and the baseline update happen under one guard
        let mut known = self.known();
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        known.insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let mut known = self.known();
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source,
                });
            }
        }
        known.insert(key.to_string(), None);
        Ok(())
    }

    fn subscribe(&self) -> StorageEvents {
        StorageEvents::new(self.inner.events.subscribe(), self.inner.id)
    }
}

/// Slot names become file names, so keep them to a safe alphabet.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

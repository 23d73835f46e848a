//! Persistent store adapter for the cart slot.

use std::sync::Arc;

use outcast_core::{Cart, LineItem};
use tracing::warn;

use crate::storage::{SlotStorage, StorageError};

/// Reads and writes the serialized cart under one named slot.
///
/// There is no schema version. Every save overwrites the whole list.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn SlotStorage>,
    key: String,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Name of the slot this adapter owns.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<dyn SlotStorage> {
        &self.storage
    }

    /// Read the persisted cart.
    ///
    /// An absent slot, unreadable storage or unparseable data all yield an
    /// empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        match self.storage.get_item(&self.key) {
            Ok(raw) => decode(raw.as_deref()),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read cart slot, starting empty");
                Cart::new()
            }
        }
    }

    /// Overwrite the slot with the full cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be encoded or written.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = encode(cart)?;
        self.storage.set_item(&self.key, &raw)
    }

    /// Delete the slot entirely.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be removed.
    pub fn remove(&self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)
    }
}

/// Decode a raw slot value.
///
/// `None`, JSON `null` and anything that is not an array of line items decode
/// to an empty cart. The result always satisfies the cart invariants.
#[must_use]
pub fn decode(raw: Option<&str>) -> Cart {
    let Some(raw) = raw else {
        return Cart::new();
    };

    match serde_json::from_str::<Option<Vec<LineItem>>>(raw) {
        Ok(Some(items)) => Cart::from_items(items),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Discarding unparseable cart data");
            Cart::new()
        }
    }
}

/// Encode a cart as the slot value.
///
/// # Errors
///
/// Returns `StorageError::Encode` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, StorageError> {
    Ok(serde_json::to_string(cart)?)
}

//! Cart mutations.
//!
//! Every successful mutation is followed by a full overwrite of the persisted
//! slot and a refresh signal through [`CartState`]. Storage failures are
//! logged and never interrupt the shopper.

use outcast_core::{LineItem, LineItemKey, Product, QuantityChange};
use tracing::{debug, info, instrument, warn};

use super::{CartState, CartStore};
use crate::notify::Notifier;

/// Mutates one context's cart.
///
/// Cheap to clone: every field is an `Arc`-backed handle.
#[derive(Clone)]
pub struct CartManager {
    state: CartState,
    store: CartStore,
    notifier: Notifier,
}

impl CartManager {
    #[must_use]
    pub const fn new(state: CartState, store: CartStore, notifier: Notifier) -> Self {
        Self {
            state,
            store,
            notifier,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Add one unit of `product`, merging with an identical (name, size) line.
    ///
    /// Returns the resulting quantity of that line.
    #[instrument(skip(self, product), fields(name = %product.name, size = ?product.size))]
    pub fn add_item(&self, product: Product) -> u32 {
        let message = format!("{} ({}) added to cart!", product.name, product.size_label());
        let image = Some(product.image.clone());

        let quantity = self.state.update(|cart| cart.add(product));
        info!(quantity, "Added item to cart");
        self.persist();

        self.notifier.show(message, image);
        quantity
    }

    /// Add `delta` to a line's quantity, removing it at zero or below.
    ///
    /// Returns `None` (and changes nothing) if no line has that key.
    #[instrument(skip(self), fields(item = %key))]
    pub fn change_quantity(&self, key: &LineItemKey, delta: i64) -> Option<QuantityChange> {
        let Some(change) = self
            .state
            .try_update(|cart| cart.change_quantity(key, delta))
        else {
            debug!("No such cart item, ignoring quantity change");
            return None;
        };

        match &change {
            QuantityChange::Updated(quantity) => info!(quantity, "Changed item quantity"),
            QuantityChange::Removed(_) => info!("Quantity reached zero, removed item"),
        }
        self.persist();
        Some(change)
    }

    /// Remove a line regardless of its quantity and confirm with a toast.
    #[instrument(skip(self), fields(item = %key))]
    pub fn remove_item(&self, key: &LineItemKey) -> Option<LineItem> {
        let Some(removed) = self.state.try_update(|cart| cart.remove(key)) else {
            debug!("No such cart item, ignoring removal");
            return None;
        };

        info!("Removed item from cart");
        self.persist();
        self.notifier
            .show(format!("Removed {} from cart", removed.name), None);
        Some(removed)
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        self.state.update(outcast_core::Cart::clear);
        info!("Cleared cart");
        self.persist();
    }

    /// Value for the cart counter badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.read(outcast_core::Cart::total_quantity)
    }

    fn persist(&self) {
        if let Err(e) = self.state.read(|cart| self.store.save(cart)) {
            warn!(key = %self.store.key(), error = %e, "Failed to persist cart");
        }
    }
}

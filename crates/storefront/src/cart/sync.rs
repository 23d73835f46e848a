//! Cross-context cart synchronization.
//!
//! When another context writes the cart slot, this context throws away its
//! in-memory cart and adopts the written one. There is no merge with local
//! changes: the last write wins.

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::store::decode;
use super::{CartState, CartStore};
use crate::storage::{StorageEvent, StorageSignal};

/// Background task reconciling a context's cart with writes from other contexts.
pub struct SyncListener {
    handle: JoinHandle<()>,
}

impl SyncListener {
    /// Subscribe to the store's slot and start reconciling into `state`.
    ///
    /// The subscription is taken before this returns, so no change made after
    /// the call is missed. Must be called from within a tokio runtime.
    #[must_use = "dropping the listener detaches it; keep it to stop or await it"]
    pub fn spawn(store: CartStore, state: CartState) -> Self {
        let mut events = store.storage().subscribe();

        let handle = tokio::spawn(async move {
            while let Some(signal) = events.recv().await {
                match signal {
                    StorageSignal::Changed(event) => {
                        apply(&store, &state, &event);
                    }
                    StorageSignal::Missed(count) => {
                        warn!(count, "Missed storage events, reloading cart");
                        state.replace(store.load());
                    }
                }
            }
            debug!("Storage origin closed, sync listener stopping");
        });

        Self { handle }
    }

    /// Stop reconciling.
    pub fn stop(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Adopt the cart carried by `event` if it targets the store's slot.
///
/// Returns `true` when the in-memory cart was replaced.
pub fn apply(store: &CartStore, state: &CartState, event: &StorageEvent) -> bool {
    if event.key != store.key() {
        return false;
    }

    let cart = decode(event.new_value.as_deref());
    info!(
        source = %event.source,
        items = cart.len(),
        "Cart changed in another context"
    );
    state.replace(cart);
    true
}

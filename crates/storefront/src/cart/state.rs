//! Owned cart state for one context.

use std::sync::Arc;

use outcast_core::Cart;
use tokio::sync::watch;

/// The in-memory cart of one context.
///
/// Cheaply cloneable via `Arc`; clones share the same cart. Every change
/// bumps the version observed by [`CartState::subscribe`] receivers, which
/// is how the counter badge and cart view learn they must refresh.
#[derive(Clone)]
pub struct CartState {
    tx: Arc<watch::Sender<Cart>>,
}

impl CartState {
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        let (tx, _) = watch::channel(cart);
        Self { tx: Arc::new(tx) }
    }

    /// A copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.tx.borrow().clone()
    }

    /// Run `f` against the current cart without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.tx.borrow())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(Cart::is_empty)
    }

    /// Mutate the cart and signal a refresh.
    pub fn update<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut out = None;
        self.tx.send_modify(|cart| out = Some(f(cart)));
        out.unwrap_or_else(|| unreachable!("send_modify always runs its closure"))
    }

    /// Mutate the cart, signalling a refresh only when `f` returns `Some`.
    pub fn try_update<R>(&self, f: impl FnOnce(&mut Cart) -> Option<R>) -> Option<R> {
        let mut out = None;
        self.tx.send_if_modified(|cart| {
            out = f(cart);
            out.is_some()
        });
        out
    }

    /// Swap in a whole new cart, returning the previous one.
    pub fn replace(&self, cart: Cart) -> Cart {
        self.tx.send_replace(cart)
    }

    /// Receive a notification after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.tx.subscribe()
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(Cart::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use outcast_core::{LineItemKey, Product};
    use rust_decimal::Decimal;

    use super::*;

    fn tee() -> Product {
        Product::new("Tee", Decimal::new(25, 0), "tee.jpg", "M")
    }

    #[test]
    fn test_clones_share_cart() {
        let state = CartState::default();
        let other = state.clone();
        state.update(|cart| cart.add(tee()));
        assert_eq!(other.snapshot().len(), 1);
    }

    #[test]
    fn test_update_signals_change() {
        let state = CartState::default();
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());

        let quantity = state.update(|cart| cart.add(tee()));
        assert_eq!(quantity, 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn test_try_update_none_is_silent() {
        let state = CartState::default();
        let rx = state.subscribe();
        let key = LineItemKey::new("Ghost", None);

        let removed = state.try_update(|cart| cart.remove(&key));
        assert!(removed.is_none());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_replace_returns_previous() {
        let state = CartState::default();
        state.update(|cart| cart.add(tee()));
        let previous = state.replace(Cart::new());
        assert_eq!(previous.len(), 1);
        assert!(state.is_empty());
    }
}

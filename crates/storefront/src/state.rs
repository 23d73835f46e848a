//! One storefront context: the cart engine wired together for a page.

use std::sync::Arc;

use askama::Template;
use tracing::info;

use crate::cart::{CartManager, CartState, CartStore, SyncListener};
use crate::checkout::CheckoutSimulator;
use crate::config::StorefrontConfig;
use crate::notify::Notifier;
use crate::render::{
    CartCountTemplate, CartItemsTemplate, CartSummaryTemplate, CartView, current_cart,
};
use crate::storage::SlotStorage;

/// Everything one context (one open page) needs.
///
/// This struct is cheaply cloneable via `Arc`; clones share the same cart,
/// toasts and checkout trigger.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: CartStore,
    manager: CartManager,
    notifier: Notifier,
    checkout: CheckoutSimulator,
}

impl AppState {
    /// Load the persisted cart and set up a context over `storage`.
    ///
    /// This is the page load: an absent or unreadable slot yields an empty cart.
    #[must_use]
    pub fn open(config: StorefrontConfig, storage: Arc<dyn SlotStorage>) -> Self {
        let store = CartStore::new(storage, config.cart_key.clone());
        let cart = CartState::new(store.load());
        info!(
            context = %store.storage().context_id(),
            items = cart.read(outcast_core::Cart::len),
            "Opened storefront context"
        );

        let notifier = Notifier::new(config.toast);
        let manager = CartManager::new(cart, store.clone(), notifier.clone());
        let checkout =
            CheckoutSimulator::new(manager.clone(), config.checkout_delay, config.currency);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                manager,
                notifier,
                checkout,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.inner.store
    }

    #[must_use]
    pub fn cart(&self) -> &CartState {
        self.inner.manager.state()
    }

    #[must_use]
    pub fn manager(&self) -> &CartManager {
        &self.inner.manager
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutSimulator {
        &self.inner.checkout
    }

    /// Start following writes to the cart slot made by other contexts.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use = "dropping the listener detaches it; keep it to stop it"]
    pub fn start_sync(&self) -> SyncListener {
        SyncListener::spawn(self.inner.store.clone(), self.cart().clone())
    }

    /// The cart as it should be displayed right now.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::from_cart(
            &current_cart(self.cart(), &self.inner.store),
            self.inner.config.currency,
        )
    }

    /// Render the `.cart-items` fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_items(&self) -> askama::Result<String> {
        let view = self.view();
        CartItemsTemplate { cart: &view }.render()
    }

    /// Render the `.cart-summary` fragment with the current checkout trigger.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_summary(&self) -> askama::Result<String> {
        let view = self.view();
        let trigger = self.inner.checkout.trigger();
        CartSummaryTemplate {
            cart: &view,
            checkout_label: trigger.label,
            checkout_disabled: trigger.disabled,
        }
        .render()
    }

    /// Render the `#cart-count` badge.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_count(&self) -> askama::Result<String> {
        CartCountTemplate {
            count: self.inner.manager.item_count(),
        }
        .render()
    }
}

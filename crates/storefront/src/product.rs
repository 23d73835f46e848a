//! Product cards on the shop page.
//!
//! A [`ProductCard`] holds what the page displays for one product: its title,
//! price text, image and selectable sizes. Display text is only parsed here;
//! everything past [`ProductCard::to_product`] works with a typed [`Product`].

use std::sync::Arc;
use std::time::Duration;

use outcast_core::{DEFAULT_SIZE, Product, parse_display_amount};
use rust_decimal::Decimal;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::cart::CartManager;

/// Label the add button shows after a successful add.
pub const ADDED_LABEL: &str = "Added ✓";

/// One product as displayed on the shop page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub title: String,
    /// Price as displayed, e.g. `"GHS 25.00"`.
    pub price_text: String,
    pub image_src: Option<String>,
    sizes: Vec<String>,
    active: Option<usize>,
}

impl ProductCard {
    /// Create a card with no size selected.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        price_text: impl Into<String>,
        image_src: Option<String>,
        sizes: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price_text: price_text.into(),
            image_src,
            sizes,
            active: None,
        }
    }

    #[must_use]
    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    /// Make `size` the active size, deactivating any other.
    ///
    /// Returns `false` and leaves the selection alone if the card does not
    /// offer `size`.
    pub fn select_size(&mut self, size: &str) -> bool {
        let Some(index) = self.sizes.iter().position(|s| s == size) else {
            debug!(title = %self.title, size, "Size not offered, ignoring selection");
            return false;
        };
        self.active = Some(index);
        true
    }

    #[must_use]
    pub fn active_size(&self) -> Option<&str> {
        self.active
            .and_then(|index| self.sizes.get(index))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_active(&self, size: &str) -> bool {
        self.active_size() == Some(size)
    }

    /// Build the product to add: the active size, or `M` if none is active.
    ///
    /// Price text that holds no readable number becomes a zero price.
    #[must_use]
    pub fn to_product(&self) -> Product {
        let price = parse_display_amount(&self.price_text).unwrap_or_else(|e| {
            warn!(title = %self.title, error = %e, "Unreadable price, using zero");
            Decimal::ZERO
        });

        Product::new(
            self.title.clone(),
            price,
            self.image_src.clone().unwrap_or_default(),
            self.active_size().unwrap_or(DEFAULT_SIZE),
        )
    }
}

/// Display state of an add button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label: String,
    pub disabled: bool,
    /// Showing the success styling.
    pub success: bool,
}

/// Result of clicking an add button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Added; carries the resulting line quantity.
    Added(u32),
    /// The button is still showing feedback from the previous add.
    Busy,
    /// There was no cart to add into.
    Unavailable,
}

/// The add-to-cart button of one product card.
///
/// Cheaply cloneable via `Arc`; clones share the same button.
#[derive(Clone)]
pub struct AddToCartButton {
    inner: Arc<ButtonInner>,
}

struct ButtonInner {
    label: String,
    feedback: Duration,
    state: watch::Sender<ButtonState>,
}

impl AddToCartButton {
    #[must_use]
    pub fn new(label: impl Into<String>, feedback: Duration) -> Self {
        let label = label.into();
        let (state, _) = watch::channel(ButtonState {
            label: label.clone(),
            disabled: false,
            success: false,
        });
        Self {
            inner: Arc::new(ButtonInner {
                label,
                feedback,
                state,
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> ButtonState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ButtonState> {
        self.inner.state.subscribe()
    }

    /// Add the card's product to the cart and show feedback on the button.
    ///
    /// With no cart to add into, logs an error and does nothing else.
    pub fn click(&self, card: &ProductCard, cart: Option<&CartManager>) -> AddOutcome {
        if self.inner.state.borrow().disabled {
            debug!(title = %card.title, "Add button disabled, ignoring click");
            return AddOutcome::Busy;
        }

        let Some(manager) = cart else {
            error!(title = %card.title, "Cart is not available, cannot add product");
            return AddOutcome::Unavailable;
        };

        let quantity = manager.add_item(card.to_product());
        self.show_feedback();
        AddOutcome::Added(quantity)
    }

    fn show_feedback(&self) {
        self.inner.state.send_replace(ButtonState {
            label: ADDED_LABEL.to_string(),
            disabled: true,
            success: true,
        });

        let Ok(handle) = Handle::try_current() else {
            warn!("No async runtime, restoring add button immediately");
            self.restore();
            return;
        };

        let button = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(button.inner.feedback).await;
            button.restore();
        });
    }

    fn restore(&self) {
        self.inner.state.send_replace(ButtonState {
            label: self.inner.label.clone(),
            disabled: false,
            success: false,
        });
    }
}

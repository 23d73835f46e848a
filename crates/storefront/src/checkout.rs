//! Simulated checkout.
//!
//! There is no payment integration. Triggering checkout on a non-empty cart
//! disables the trigger, waits a fixed delay, confirms the order and clears
//! the cart. The trigger itself is the mutual exclusion: while it is disabled
//! further triggers are rejected.

use std::sync::Arc;
use std::time::Duration;

use outcast_core::{CurrencyCode, Price};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::cart::CartManager;

/// Trigger label while idle.
pub const READY_LABEL: &str = "Proceed to Checkout";
/// Trigger label while the simulated order is processing.
pub const BUSY_LABEL: &str = "Processing...";
/// Message presented once the simulated order completes.
pub const CONFIRMATION: &str = "Thank you for your order! This is a simulation. In a real store, you would be redirected to a payment gateway.";

/// Display state of the checkout trigger (`.cart-summary .btn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTrigger {
    pub label: &'static str,
    pub disabled: bool,
}

impl CheckoutTrigger {
    #[must_use]
    pub const fn ready() -> Self {
        Self {
            label: READY_LABEL,
            disabled: false,
        }
    }

    #[must_use]
    pub const fn busy() -> Self {
        Self {
            label: BUSY_LABEL,
            disabled: true,
        }
    }
}

impl Default for CheckoutTrigger {
    fn default() -> Self {
        Self::ready()
    }
}

/// Why a checkout trigger was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cart is empty")]
    EmptyCart,
    #[error("checkout already in progress")]
    AlreadyProcessing,
}

/// What was in the cart when checkout started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub lines: usize,
    pub item_count: u64,
    pub subtotal: Price,
}

impl OrderSummary {
    #[must_use]
    pub const fn confirmation(&self) -> &'static str {
        CONFIRMATION
    }
}

/// A started checkout.
///
/// The completion runs as its own task: dropping this value does not stop
/// the order from completing.
#[derive(Debug)]
pub struct PendingOrder {
    pub summary: OrderSummary,
    handle: JoinHandle<()>,
}

impl PendingOrder {
    /// Wait for the simulated order to complete.
    pub async fn wait(self) -> OrderSummary {
        if let Err(e) = self.handle.await {
            error!(error = %e, "Checkout completion task failed");
        }
        self.summary
    }
}

/// Drives the simulated checkout for one context.
///
/// Cheaply cloneable via `Arc`; clones share the same trigger.
#[derive(Clone)]
pub struct CheckoutSimulator {
    inner: Arc<CheckoutInner>,
}

struct CheckoutInner {
    manager: CartManager,
    delay: Duration,
    currency: CurrencyCode,
    trigger: watch::Sender<CheckoutTrigger>,
}

impl CheckoutSimulator {
    #[must_use]
    pub fn new(manager: CartManager, delay: Duration, currency: CurrencyCode) -> Self {
        let (trigger, _) = watch::channel(CheckoutTrigger::ready());
        Self {
            inner: Arc::new(CheckoutInner {
                manager,
                delay,
                currency,
                trigger,
            }),
        }
    }

    /// Current trigger state.
    #[must_use]
    pub fn trigger(&self) -> CheckoutTrigger {
        *self.inner.trigger.borrow()
    }

    /// Receive a notification whenever the trigger changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CheckoutTrigger> {
        self.inner.trigger.subscribe()
    }

    /// Start checkout.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the cart is empty or a checkout is already
    /// running. Nothing changes in either case.
    #[instrument(skip(self))]
    pub fn begin(&self) -> Result<PendingOrder, Rejection> {
        let cart = self.inner.manager.state().snapshot();
        if cart.is_empty() {
            debug!("Checkout triggered on an empty cart, ignoring");
            return Err(Rejection::EmptyCart);
        }

        let acquired = self.inner.trigger.send_if_modified(|trigger| {
            if trigger.disabled {
                return false;
            }
            *trigger = CheckoutTrigger::busy();
            true
        });
        if !acquired {
            debug!("Checkout already in progress, ignoring trigger");
            return Err(Rejection::AlreadyProcessing);
        }

        let summary = OrderSummary {
            lines: cart.len(),
            item_count: cart.total_quantity(),
            subtotal: Price::new(cart.subtotal(), self.inner.currency),
        };
        info!(
            lines = summary.lines,
            items = summary.item_count,
            subtotal = %summary.subtotal,
            "Processing simulated order"
        );

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            info!(confirmation = CONFIRMATION, "Simulated order completed");
            inner.manager.clear();
            inner.trigger.send_replace(CheckoutTrigger::ready());
        });

        Ok(PendingOrder { summary, handle })
    }

    /// Start checkout and wait for it to complete.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] under the same conditions as [`Self::begin`].
    pub async fn run(&self) -> Result<OrderSummary, Rejection> {
        Ok(self.begin()?.wait().await)
    }
}

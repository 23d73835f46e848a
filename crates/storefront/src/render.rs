//! Cart view projection and markup.
//!
//! [`CartView`] is the display model: every price is pre-formatted so the
//! templates and the terminal table only print strings.

use std::fmt::Write as _;

use askama::Template;
use outcast_core::{Cart, CurrencyCode, LineItem, LineItemKey, Price};

use crate::cart::{CartState, CartStore};

/// Cart line display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub key: LineItemKey,
    /// Row position in the rendered list.
    pub position: usize,
    pub name: String,
    /// Size label, `M` when the line has none.
    pub size: String,
    pub image: String,
    pub unit_price: String,
    pub line_price: String,
    pub quantity: u32,
}

impl CartItemView {
    fn new(position: usize, item: &LineItem, currency: CurrencyCode) -> Self {
        Self {
            key: item.key(),
            position,
            name: item.name.clone(),
            size: item.size_label().to_string(),
            image: item.image.clone(),
            unit_price: Price::new(item.price, currency).display(),
            line_price: Price::new(item.line_total(), currency).display(),
            quantity: item.quantity,
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::zero(currency).display(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn from_cart(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .iter()
                .enumerate()
                .map(|(position, item)| CartItemView::new(position, item, currency))
                .collect(),
            subtotal: Price::new(cart.subtotal(), currency).display(),
            item_count: cart.total_quantity(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The checkout trigger is shown whenever there is something to buy.
    #[must_use]
    pub fn checkout_visible(&self) -> bool {
        !self.is_empty()
    }
}

/// The cart to display: shared state when it has items, otherwise whatever
/// the slot holds.
#[must_use]
pub fn current_cart(state: &CartState, store: &CartStore) -> Cart {
    if state.is_empty() {
        store.load()
    } else {
        state.snapshot()
    }
}

/// Cart items fragment (`.cart-items`).
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate<'a> {
    pub cart: &'a CartView,
}

/// Cart summary fragment (`.cart-summary` with `#cart-total` and the checkout button).
#[derive(Template)]
#[template(path = "partials/cart_summary.html")]
pub struct CartSummaryTemplate<'a> {
    pub cart: &'a CartView,
    pub checkout_label: &'a str,
    pub checkout_disabled: bool,
}

/// Cart count badge fragment (`#cart-count`).
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Render the cart as a plain-text table for terminals.
#[must_use]
pub fn text_table(view: &CartView) -> String {
    if view.is_empty() {
        return format!("Your cart is empty\nTotal: {}\n", view.subtotal);
    }

    let name_width = view
        .items
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Item".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<name_width$}  {:<4}  {:>12}  {:>3}  {:>12}",
        "#", "Item", "Size", "Price", "Qty", "Total"
    );
    for item in &view.items {
        let _ = writeln!(
            out,
            "{:>3}  {:<name_width$}  {:<4}  {:>12}  {:>3}  {:>12}",
            item.position, item.name, item.size, item.unit_price, item.quantity, item.line_price
        );
    }
    let _ = writeln!(out, "Items: {}", view.item_count);
    let _ = writeln!(out, "Total: {}", view.subtotal);
    out
}

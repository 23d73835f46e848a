//! The cart: an ordered list of line items with one entry per identity.
//!
//! # Invariants
//!
//! - At most one [`LineItem`] exists per `(name, size)` pair. Adding the same
//!   pair again increments its quantity.
//! - Every surviving item has a quantity of at least 1. An operation that
//!   would take a quantity to zero or below removes the item instead.
//! - Insertion order is preserved; removing an item shifts later items down
//!   by one position.
//!
//! Quantities are not capped. They saturate at `u32::MAX`.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{LineItem, LineItemKey, Product};

/// Outcome of adjusting an item's quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// The item survived with this new quantity.
    Updated(u32),
    /// The quantity dropped to zero or below and the item was removed.
    Removed(LineItem),
}

/// Ordered collection of line items for the current session.
///
/// Serializes transparently as the JSON array stored in the persisted slot.
/// Decoding goes through [`Cart::from_items`] so that hand-edited data cannot
/// break the invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw items, restoring the invariants.
    ///
    /// Items with quantity 0 are dropped. Later duplicates of an identity are
    /// folded into the first occurrence.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.find_mut(&item.name, item.size.as_deref()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by identity.
    #[must_use]
    pub fn get(&self, key: &LineItemKey) -> Option<&LineItem> {
        self.items.iter().find(|item| item.has_key(key))
    }

    /// Current position of a line, if present.
    #[must_use]
    pub fn position(&self, key: &LineItemKey) -> Option<usize> {
        self.items.iter().position(|item| item.has_key(key))
    }

    /// Identity of the line currently at `index`.
    ///
    /// Positions shift whenever an earlier line is removed, so translate a
    /// position from a freshly rendered view into a key before mutating.
    #[must_use]
    pub fn key_at(&self, index: usize) -> Option<LineItemKey> {
        self.items.get(index).map(LineItem::key)
    }

    /// Add one unit of `product`.
    ///
    /// Merges into the line with the exact same name and size if present,
    /// otherwise appends a new line with quantity 1. Returns the resulting
    /// quantity of the affected line.
    pub fn add(&mut self, product: Product) -> u32 {
        if let Some(existing) = self.find_mut(&product.name, product.size.as_deref()) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }
        self.items.push(LineItem::from_product(product));
        1
    }

    /// Add `delta` to the quantity of the line stored under `key`.
    ///
    /// A resulting quantity of zero or below removes the line. Returns `None`
    /// if no line has that key.
    pub fn change_quantity(&mut self, key: &LineItemKey, delta: i64) -> Option<QuantityChange> {
        let index = self.position(key)?;
        let item = self.items.get_mut(index)?;
        let next = i64::from(item.quantity).saturating_add(delta);
        if next <= 0 {
            return Some(QuantityChange::Removed(self.items.remove(index)));
        }
        item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(QuantityChange::Updated(item.quantity))
    }

    /// Remove the line stored under `key` regardless of its quantity.
    pub fn remove(&mut self, key: &LineItemKey) -> Option<LineItem> {
        let index = self.position(key)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all lines (the counter badge value).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price × quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    fn find_mut(&mut self, name: &str, size: Option<&str>) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.matches(name, size))
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

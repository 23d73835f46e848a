//! Product descriptor handed from the display layer to the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::LineItemKey;

/// Size label used when a shopper has not picked one.
pub const DEFAULT_SIZE: &str = "M";

/// A product selection about to be added to the cart.
///
/// The cart accepts descriptors as-is: an empty name or a zero price makes a
/// degraded entry, not an error. The size defaults to [`DEFAULT_SIZE`] where
/// the descriptor is built (see [`Product::with_default_size`]), not inside
/// the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, which is also half of the line identity.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Image reference shown in the cart and in toasts.
    pub image: String,
    /// Selected size label, if any.
    pub size: Option<String>,
}

impl Product {
    /// Create a descriptor with an explicit size.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            image: image.into(),
            size: Some(size.into()),
        }
    }

    /// Fill in [`DEFAULT_SIZE`] when no size was selected.
    #[must_use]
    pub fn with_default_size(mut self) -> Self {
        if self.size.is_none() {
            self.size = Some(DEFAULT_SIZE.to_owned());
        }
        self
    }

    /// The identity this product merges under once in the cart.
    #[must_use]
    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(self.name.clone(), self.size.clone())
    }

    /// Size for display, falling back to [`DEFAULT_SIZE`].
    #[must_use]
    pub fn size_label(&self) -> &str {
        self.size.as_deref().unwrap_or(DEFAULT_SIZE)
    }
}

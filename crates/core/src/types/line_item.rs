//! Line items and their identity key.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::product::{DEFAULT_SIZE, Product};

/// Identity of a line item: exact name plus exact size.
///
/// Comparison is case-sensitive with no normalization, so `"Tee"` and
/// `"tee"` are different products and `Some("M")` differs from `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItemKey {
    pub name: String,
    pub size: Option<String>,
}

impl LineItemKey {
    /// Create a key from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, size: Option<String>) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

impl fmt::Display for LineItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.name,
            self.size.as_deref().unwrap_or(DEFAULT_SIZE)
        )
    }
}

/// One distinct product and size selection in the cart.
///
/// The serialized shape is the persisted slot format:
/// `{"name", "price", "image", "size", "quantity"}` with `price` as a JSON
/// number written with the decimal's exact digits. Missing or null `name`, `price`, `image` and `size` decode to
/// empty values so that degraded entries survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize",
        deserialize_with = "price_or_zero"
    )]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub quantity: u32,
}

impl LineItem {
    /// A fresh line for `product` with quantity 1.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            name: product.name,
            price: product.price,
            image: product.image,
            size: product.size,
            quantity: 1,
        }
    }

    /// The identity this line is stored under.
    #[must_use]
    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(self.name.clone(), self.size.clone())
    }

    /// Whether this line has exactly the given name and size.
    #[must_use]
    pub fn matches(&self, name: &str, size: Option<&str>) -> bool {
        self.name == name && self.size.as_deref() == size
    }

    /// Whether this line is stored under `key`.
    #[must_use]
    pub fn has_key(&self, key: &LineItemKey) -> bool {
        self.matches(&key.name, key.size.as_deref())
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Size for display, falling back to [`DEFAULT_SIZE`].
    #[must_use]
    pub fn size_label(&self) -> &str {
        self.size.as_deref().unwrap_or(DEFAULT_SIZE)
    }
}

fn price_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(rust_decimal::serde::arbitrary_precision_option::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee(size: &str) -> LineItem {
        LineItem::from_product(Product::new("Tee", Decimal::new(25, 0), "tee.jpg", size))
    }

    #[test]
    fn test_from_product_starts_at_one() {
        assert_eq!(tee("M").quantity, 1);
    }

    #[test]
    fn test_matches_is_exact() {
        let item = tee("M");
        assert!(item.matches("Tee", Some("M")));
        assert!(!item.matches("tee", Some("M")));
        assert!(!item.matches("Tee", Some("m")));
        assert!(!item.matches("Tee", None));
    }

    #[test]
    fn test_line_total() {
        let mut item = tee("M");
        item.quantity = 3;
        assert_eq!(item.line_total(), Decimal::new(75, 0));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_value(tee("L")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Tee",
                "price": 25,
                "image": "tee.jpg",
                "size": "L",
                "quantity": 1
            })
        );
    }

    #[test]
    fn test_degraded_entry_decodes() {
        let item: LineItem =
            serde_json::from_str(r#"{"name": null, "price": null, "quantity": 2}"#).unwrap();
        assert_eq!(item.name, "");
        assert_eq!(item.price, Decimal::ZERO);
        assert_eq!(item.image, "");
        assert_eq!(item.size, None);
        assert_eq!(item.size_label(), "M");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_integer_price_decodes() {
        let item: LineItem =
            serde_json::from_str(r#"{"name": "Cap", "price": 40, "image": "", "size": "M", "quantity": 1}"#)
                .unwrap();
        assert_eq!(item.price, Decimal::new(40, 0));
    }

    #[test]
    fn test_price_keeps_every_digit() {
        let price: Decimal = "1234567890123.4567".parse().unwrap();
        let item = LineItem::from_product(Product::new("Tee", price, "tee.jpg", "M"));
        let raw = serde_json::to_string(&item).unwrap();
        assert!(raw.contains(r#""price":1234567890123.4567"#));
        let decoded: LineItem = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded.price, price);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(tee("XL").key().to_string(), "Tee (XL)");
        assert_eq!(LineItemKey::new("Tee", None).to_string(), "Tee (M)");
    }
}

//! Core types for Social OutCast.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod line_item;
pub mod price;
pub mod product;

pub use line_item::{LineItem, LineItemKey};
pub use price::{CurrencyCode, Price, PriceError, parse_display_amount};
pub use product::{DEFAULT_SIZE, Product};

//! Social OutCast Core - Cart domain types.
//!
//! This crate provides the types shared by every Social OutCast component:
//! - `storefront` - Cart engine (persistence, sync, rendering, notifications)
//! - `cli` - Terminal front end driving the cart engine
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no timers. Persistence and change signalling live in the
//! storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Prices, product descriptors and line items
//! - [`cart`] - The ordered, merge-on-identity cart list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, QuantityChange};
pub use types::*;

//! Social OutCast storefront cart engine.
//!
//! One [`AppState`] is one open page (a *context*). Contexts opened on the
//! same origin share the persisted cart slot and follow each other's writes
//! through [`cart::SyncListener`]; everything else is per context.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notify;
pub mod product;
pub mod render;
pub mod state;
pub mod storage;

pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use state::AppState;

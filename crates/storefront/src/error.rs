//! Unified error handling.
//!
//! Cart operations themselves never fail: storage problems are logged and
//! the shopper carries on. `AppError` covers what can go wrong around them,
//! such as loading configuration, opening an origin or rendering markup, and
//! is what front ends report.

use thiserror::Error;

use crate::checkout::Rejection;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The persistence layer failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Display text did not hold a usable price.
    #[error("Price error: {0}")]
    Price(#[from] outcast_core::PriceError),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Checkout was not started.
    #[error("Checkout rejected: {0}")]
    Checkout(#[from] Rejection),

    /// No cart line matches the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the caller can fix this by changing the request.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Price(_) | Self::Checkout(_) | Self::NotFound(_) | Self::BadRequest(_)
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

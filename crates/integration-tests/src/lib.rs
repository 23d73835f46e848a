//! Integration tests for the Social OutCast cart engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p outcast-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cross_context_sync` - several contexts on one origin, memory and file backed
//! - `checkout_flow` - the simulated checkout from trigger to cleared cart
//! - `cart_rendering` - shopper scenarios checked through the rendered view
//!
//! This crate only holds fixtures shared by the tests.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use outcast_core::{Cart, Product};
use outcast_storefront::storage::{FileStorage, MemoryOrigin, StorageError};
use outcast_storefront::{AppState, StorefrontConfig};
use rust_decimal::Decimal;
use tokio::sync::watch;

/// How long a test waits for a cross-context change to arrive.
pub const CHANGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Open another context (tab) on an in-process origin.
#[must_use]
pub fn memory_tab(origin: &MemoryOrigin) -> AppState {
    AppState::open(StorefrontConfig::default(), Arc::new(origin.open_context()))
}

/// Open another context on a directory origin, polling it every 10 ms.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn file_tab(dir: &Path) -> Result<(AppState, FileStorage), StorageError> {
    let config = StorefrontConfig {
        storage_dir: dir.to_path_buf(),
        sync_poll_interval: Duration::from_millis(10),
        ..StorefrontConfig::default()
    };
    let storage = FileStorage::open(dir)?;
    let state = AppState::open(config, Arc::new(storage.clone()));
    Ok((state, storage))
}

#[must_use]
pub fn product(name: &str, price: i64, size: &str) -> Product {
    Product::new(
        name,
        Decimal::new(price, 0),
        format!("img/{}.jpg", name.to_lowercase()),
        size,
    )
}

#[must_use]
pub fn tee(size: &str) -> Product {
    product("Tee", 25, size)
}

/// Wait for the next change published on `rx`.
///
/// Returns `None` if nothing changes within [`CHANGE_TIMEOUT`].
pub async fn next_change(rx: &mut watch::Receiver<Cart>) -> Option<Cart> {
    match tokio::time::timeout(CHANGE_TIMEOUT, rx.changed()).await {
        Ok(Ok(())) => Some(rx.borrow_and_update().clone()),
        _ => None,
    }
}

//! CLI command implementations.

use std::sync::Arc;

use outcast_core::{Cart, LineItemKey};
use outcast_storefront::storage::FileStorage;
use outcast_storefront::{AppError, AppState, StorefrontConfig};

pub mod cart;
pub mod checkout;
pub mod watch;

/// One page load against the configured origin directory.
pub struct Page {
    pub state: AppState,
    pub storage: FileStorage,
}

impl Page {
    /// Open the origin directory and load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self, AppError> {
        let storage = FileStorage::open(&config.storage_dir)?;
        tracing::debug!(dir = %storage.dir().display(), "Opened origin directory");
        let state = AppState::open(config, Arc::new(storage.clone()));
        Ok(Self { state, storage })
    }

    /// Print the toasts raised by the command that just ran.
    pub fn print_toasts(&self) {
        for toast in self.state.notifier().toasts() {
            println!("{}", toast.message);
        }
    }
}

/// Find the line a user means.
///
/// Without `size`, a number naming an existing row addresses that row.
/// Anything else, including a number past the last row, is a product name,
/// narrowed by `size` when given; a name alone must match exactly one line.
///
/// # Errors
///
/// Returns `AppError::NotFound` when nothing matches and
/// `AppError::BadRequest` when a bare name matches lines in several sizes.
pub fn resolve(cart: &Cart, item: &str, size: Option<&str>) -> Result<LineItemKey, AppError> {
    if size.is_none()
        && let Ok(position) = item.parse::<usize>()
        && let Some(key) = cart.key_at(position)
    {
        return Ok(key);
    }

    let mut matching = cart
        .iter()
        .filter(|line| line.name == item && size.is_none_or(|size| line.size_label() == size));

    match (matching.next(), matching.next()) {
        (Some(line), None) => Ok(line.key()),
        (Some(_), Some(_)) => Err(AppError::BadRequest(format!(
            "{item} is in the cart in several sizes, pass --size"
        ))),
        (None, _) => Err(AppError::NotFound(match size {
            Some(size) => format!("{item} ({size})"),
            None => item.to_string(),
        })),
    }
}

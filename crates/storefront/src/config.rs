//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `OUTCAST_STORAGE_DIR` - Origin directory for the file-backed store (default: `.outcast`)
//! - `OUTCAST_CART_KEY` - Name of the persisted cart slot (default: `so_cart`)
//! - `OUTCAST_CURRENCY` - Currency label for prices (default: `GHS`)
//! - `OUTCAST_TOAST_VISIBLE_MS` - How long a toast stays on screen (default: 4000)
//! - `OUTCAST_TOAST_EXIT_MS` - Toast exit animation length (default: 400)
//! - `OUTCAST_CHECKOUT_DELAY_MS` - Artificial checkout processing delay (default: 2000)
//! - `OUTCAST_ADD_FEEDBACK_MS` - "Added ✓" feedback on the add button (default: 1500)
//! - `OUTCAST_SYNC_POLL_MS` - Change polling interval for the file-backed store (default: 250)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use outcast_core::CurrencyCode;
use thiserror::Error;

use crate::storage::keys;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart engine configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory that plays the role of the browser origin for file storage
    pub storage_dir: PathBuf,
    /// Persisted slot holding the serialized cart
    pub cart_key: String,
    /// Currency shown next to every price
    pub currency: CurrencyCode,
    /// Toast timing
    pub toast: ToastConfig,
    /// Artificial delay before the simulated order completes
    pub checkout_delay: Duration,
    /// How long the add button shows its confirmation label
    pub add_feedback: Duration,
    /// How often the file-backed store checks for writes by other contexts
    pub sync_poll_interval: Duration,
}

/// Toast notification timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastConfig {
    /// Time a toast stays fully visible
    pub visible_for: Duration,
    /// Time the exit animation takes before the toast is removed
    pub exit_for: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            visible_for: Duration::from_millis(4000),
            exit_for: Duration::from_millis(400),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".outcast"),
            cart_key: keys::CART.to_string(),
            currency: CurrencyCode::GHS,
            toast: ToastConfig::default(),
            checkout_delay: Duration::from_millis(2000),
            add_feedback: Duration::from_millis(1500),
            sync_poll_interval: Duration::from_millis(250),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let storage_dir = get_optional_env("OUTCAST_STORAGE_DIR")
            .map_or(defaults.storage_dir, PathBuf::from);
        let cart_key = get_optional_env("OUTCAST_CART_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(defaults.cart_key);
        let currency = parse_env("OUTCAST_CURRENCY", defaults.currency)?;

        let toast = ToastConfig {
            visible_for: get_millis("OUTCAST_TOAST_VISIBLE_MS", defaults.toast.visible_for)?,
            exit_for: get_millis("OUTCAST_TOAST_EXIT_MS", defaults.toast.exit_for)?,
        };

        Ok(Self {
            storage_dir,
            cart_key,
            currency,
            toast,
            checkout_delay: get_millis("OUTCAST_CHECKOUT_DELAY_MS", defaults.checkout_delay)?,
            add_feedback: get_millis("OUTCAST_ADD_FEEDBACK_MS", defaults.add_feedback)?,
            sync_poll_interval: get_millis("OUTCAST_SYNC_POLL_MS", defaults.sync_poll_interval)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |value| parse_value(key, &value))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a duration given in whole milliseconds.
fn get_millis(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| millis_from_str(key, &value))
}

fn millis_from_str(key: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_value::<u64>(key, value).map(Duration::from_millis)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.cart_key, "so_cart");
        assert_eq!(config.currency, CurrencyCode::GHS);
        assert_eq!(config.toast.visible_for, Duration::from_millis(4000));
        assert_eq!(config.toast.exit_for, Duration::from_millis(400));
        assert_eq!(config.checkout_delay, Duration::from_millis(2000));
        assert_eq!(config.add_feedback, Duration::from_millis(1500));
    }

    #[test]
    fn test_millis_from_str() {
        assert_eq!(
            millis_from_str("TEST_MS", " 250 ").unwrap(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_millis_from_str_rejects_garbage() {
        let err = millis_from_str("TEST_MS", "soon").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TEST_MS"));
    }

    #[test]
    fn test_millis_from_str_rejects_negative() {
        assert!(millis_from_str("TEST_MS", "-5").is_err());
    }

    #[test]
    fn test_parse_currency() {
        let currency: CurrencyCode = parse_value("OUTCAST_CURRENCY", "usd").unwrap();
        assert_eq!(currency, CurrencyCode::USD);
        assert!(parse_value::<CurrencyCode>("OUTCAST_CURRENCY", "doubloons").is_err());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidEnvVar("OUTCAST_TOAST_EXIT_MS".to_string(), "bad".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid environment variable OUTCAST_TOAST_EXIT_MS: bad"
        );
    }
}

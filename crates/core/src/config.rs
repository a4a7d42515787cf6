//! Storefront configuration.

use std::{fs, path::Path, time::Duration};

use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    navigation::{DEFAULT_SCROLL_OFFSET, RevealOptions},
    notifications::NotificationTiming,
    pricing::currency_from_code,
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid YAML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_norway::Error),

    /// The configured currency code is not supported.
    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),

    /// Toasts would start fading before they became visible.
    #[error(
        "notification dwell ({dwell_ms} ms) must not be shorter than the enter delay ({enter_delay_ms} ms)"
    )]
    InvalidNotificationTiming {
        /// Configured enter delay
        enter_delay_ms: u64,

        /// Configured dwell time
        dwell_ms: u64,
    },
}

/// Presentation settings for the storefront. Every field has a default, so
/// an empty document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// ISO code of the store currency
    pub currency: String,

    /// Toast timings
    pub notifications: NotificationTiming,

    /// Delay before the cookie banner is revealed, in milliseconds
    pub cookie_banner_delay_ms: u64,

    /// Distance above a section's top at which its nav link highlights, in pixels
    pub scroll_offset: f64,

    /// Entrance animation settings
    pub reveal: RevealOptions,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: "RUB".to_string(),
            notifications: NotificationTiming::default(),
            cookie_banner_delay_ms: 1000,
            scroll_offset: DEFAULT_SCROLL_OFFSET,
            reveal: RevealOptions::default(),
        }
    }
}

impl StorefrontConfig {
    /// Parses configuration from YAML and checks the currency and toast
    /// timings.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Parse`]: the document is not valid for this schema.
    /// - [`ConfigError::UnknownCurrency`]: the currency code is not supported.
    /// - [`ConfigError::InvalidNotificationTiming`]: `dwell_ms` is shorter than
    ///   `enter_delay_ms`.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_norway::from_str(yaml)?
        };

        config.currency()?;

        let NotificationTiming {
            enter_delay_ms,
            dwell_ms,
            ..
        } = config.notifications;

        if dwell_ms < enter_delay_ms {
            return Err(ConfigError::InvalidNotificationTiming {
                enter_delay_ms,
                dwell_ms,
            });
        }

        Ok(config)
    }

    /// Reads and parses a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// The configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not supported.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        currency_from_code(&self.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Cookie banner reveal delay.
    pub fn cookie_banner_delay(&self) -> Duration {
        Duration::from_millis(self.cookie_banner_delay_ms)
    }
}

//! Application configuration management.

use chrono::Duration;
use serde::Deserialize;

use crate::types::{Amount, Currency};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Account policy configuration.
    #[serde(default)]
    pub bank: BankConfig,
    /// Transfer confirmation configuration.
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Account policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BankConfig {
    /// Currency balances and statements are displayed in.
    #[serde(default)]
    pub currency: Currency,
    /// Fee posted when a personal account creates a statement.
    #[serde(default = "default_statement_fee")]
    pub statement_fee: Amount,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            statement_fee: default_statement_fee(),
        }
    }
}

fn default_statement_fee() -> Amount {
    Amount::from_decimal(rust_decimal::Decimal::ONE)
}

/// Transfer confirmation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecurityConfig {
    /// Number of digits in a generated PIN.
    #[serde(default = "default_pin_length")]
    pub pin_length: usize,
    /// PIN mismatches tolerated on one leg before the transfer is rejected.
    #[serde(default = "default_max_pin_attempts")]
    pub max_pin_attempts: u32,
    /// Seconds an unconfirmed transfer may wait before it expires.
    #[serde(default = "default_pending_transfer_ttl")]
    pub pending_transfer_ttl_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            pin_length: default_pin_length(),
            max_pin_attempts: default_max_pin_attempts(),
            pending_transfer_ttl_secs: default_pending_transfer_ttl(),
        }
    }
}

impl SecurityConfig {
    /// Returns the pending-transfer TTL as a duration.
    #[must_use]
    pub fn pending_transfer_ttl(&self) -> Duration {
        i64::try_from(self.pending_transfer_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

fn default_pin_length() -> usize {
    4
}

fn default_max_pin_attempts() -> u32 {
    3
}

fn default_pending_transfer_ttl() -> u64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

//! Configuration for the wallet signing core
//!
//! Resolution order for [`Config::from_env`]:
//! 1. `WALLET_*` environment variables (see [`env_vars`])
//! 2. Built-in defaults for mainnet
//!
//! ```bash
//! export WALLET_CHAIN_ID="pisco-1"
//! export WALLET_LCD_URL="https://pisco-lcd.terra.dev"
//! export WALLET_SIGN_MODE="legacy_amino_json"
//! ```

use crate::tx::SignMode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Environment variable names
pub mod env_vars {
    pub const CHAIN_ID: &str = "WALLET_CHAIN_ID";
    pub const LCD_URL: &str = "WALLET_LCD_URL";
    pub const SIGN_MODE: &str = "WALLET_SIGN_MODE";
    pub const GAS_ADJUSTMENT: &str = "WALLET_GAS_ADJUSTMENT";
    pub const PRIVATE_KEY: &str = "WALLET_PRIVATE_KEY";
    pub const PASSWORD: &str = "WALLET_PASSWORD";
}

mod defaults {
    pub const CHAIN_ID: &str = "phoenix-1";
    pub const LCD_URL: &str = "https://phoenix-lcd.terra.dev";
    pub const GAS_ADJUSTMENT: f64 = 1.75;
}

fn default_gas_adjustment() -> f64 {
    defaults::GAS_ADJUSTMENT
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chain id written into every signing document
    pub chain_id: String,
    /// LCD endpoint for the host's chain client. Only validated here; the
    /// core never dials it.
    pub lcd_url: String,
    /// Sign mode used by software keys. Hardware keys ignore this.
    #[serde(default)]
    pub software_sign_mode: SignMode,
    /// Multiplier applied by the chain client to simulated gas
    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,
    /// Memo used when a transaction request carries none
    #[serde(default)]
    pub default_memo: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: defaults::CHAIN_ID.to_string(),
            lcd_url: defaults::LCD_URL.to_string(),
            software_sign_mode: SignMode::default(),
            gas_adjustment: defaults::GAS_ADJUSTMENT,
            default_memo: None,
        }
    }
}

impl Config {
    /// Build config from `WALLET_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(chain_id) = std::env::var(env_vars::CHAIN_ID) {
            tracing::debug!(chain_id = %chain_id, "Using WALLET_CHAIN_ID");
            config.chain_id = chain_id;
        }
        if let Ok(url) = std::env::var(env_vars::LCD_URL) {
            tracing::debug!("Using WALLET_LCD_URL");
            config.lcd_url = url;
        }
        if let Ok(mode) = std::env::var(env_vars::SIGN_MODE) {
            config.software_sign_mode = mode.parse()?;
        }
        if let Ok(adjustment) = std::env::var(env_vars::GAS_ADJUSTMENT) {
            config.gas_adjustment = adjustment.parse().map_err(|e| {
                Error::Config(format!("Invalid {}: {}", env_vars::GAS_ADJUSTMENT, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed LCD endpoint
    pub fn lcd_url(&self) -> Result<Url> {
        Url::parse(&self.lcd_url)
            .map_err(|e| Error::Config(format!("Invalid LCD URL {}: {}", self.lcd_url, e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.chain_id.trim().is_empty() {
            return Err(Error::Config("chain_id must not be empty".to_string()));
        }
        if !(self.gas_adjustment.is_finite() && self.gas_adjustment >= 1.0) {
            return Err(Error::Config(format!(
                "gas_adjustment must be >= 1.0, got {}",
                self.gas_adjustment
            )));
        }
        self.lcd_url()?;
        Ok(())
    }
}

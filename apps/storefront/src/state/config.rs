//! # Configuration State
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KHATTI_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `KHATTI_DB_PATH` | SQLite file | platform data dir `/khatti.db` |
//! | `KHATTI_CATALOG_PATH` | catalog JSON | bundled catalog |
//! | `KHATTI_STORE_NAME` | banner text | `Khatti` |
//! | `KHATTI_FREE_SHIPPING_THRESHOLD` | rupees | `999` |
//! | `KHATTI_SHIPPING_FEE` | rupees | `99` |
//! | `KHATTI_TAX_RATE` | percent, e.g. `18` | `18` |
//! | `KHATTI_AUTH_SECRET` | reset token secret | development secret |
//! | `KHATTI_RESET_TOKEN_MINUTES` | reset token lifetime | `30` |
//!
//! `KHATTI_DB_PATH=:memory:` keeps everything in memory for a throwaway run.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::Serialize;
use tracing::warn;

use khatti_core::pricing::{DEFAULT_FREE_SHIPPING_THRESHOLD, DEFAULT_SHIPPING_FEE, DEFAULT_TAX_RATE};
use khatti_core::{Money, PricingRules, TaxRate};
use khatti_db::DbConfig;

const IN_MEMORY_DB: &str = ":memory:";

/// Storefront configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shown in the shell banner
    pub store_name: String,

    /// Explicit database file; `None` means the platform data directory
    pub db_path: Option<PathBuf>,

    /// Alternative catalog file; `None` means the bundled catalog
    pub catalog_path: Option<PathBuf>,

    pub free_shipping_threshold: Money,

    pub shipping_fee: Money,

    pub tax_rate: TaxRate,

    /// Reset token secret; never serialized
    #[serde(skip)]
    pub auth_secret: Option<String>,

    /// How long a password reset token stays valid
    pub reset_token_minutes: u64,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Khatti".to_string(),
            db_path: None,
            catalog_path: None,
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            shipping_fee: DEFAULT_SHIPPING_FEE,
            tax_rate: DEFAULT_TAX_RATE,
            auth_secret: None,
            reset_token_minutes: 30,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("KHATTI_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("KHATTI_CATALOG_PATH") {
            config.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("KHATTI_STORE_NAME") {
            config.store_name = name;
        }

        if let Some(value) = lookup("KHATTI_FREE_SHIPPING_THRESHOLD") {
            match value.trim().parse::<i64>() {
                Ok(rupees) if rupees >= 0 => {
                    config.free_shipping_threshold = Money::from_rupees(rupees)
                }
                _ => warn!(value = %value, "Ignoring KHATTI_FREE_SHIPPING_THRESHOLD"),
            }
        }

        if let Some(value) = lookup("KHATTI_SHIPPING_FEE") {
            match value.trim().parse::<i64>() {
                Ok(rupees) if rupees >= 0 => config.shipping_fee = Money::from_rupees(rupees),
                _ => warn!(value = %value, "Ignoring KHATTI_SHIPPING_FEE"),
            }
        }

        if let Some(value) = lookup("KHATTI_TAX_RATE") {
            match value.trim().parse::<f64>() {
                Ok(pct) if (0.0..=100.0).contains(&pct) => {
                    config.tax_rate = TaxRate::from_percentage(pct)
                }
                _ => warn!(value = %value, "Ignoring KHATTI_TAX_RATE"),
            }
        }

        if let Some(secret) = lookup("KHATTI_AUTH_SECRET") {
            if !secret.is_empty() {
                config.auth_secret = Some(secret);
            }
        }

        if let Some(value) = lookup("KHATTI_RESET_TOKEN_MINUTES") {
            match value.trim().parse::<u64>() {
                Ok(minutes) if minutes > 0 => config.reset_token_minutes = minutes,
                _ => warn!(value = %value, "Ignoring KHATTI_RESET_TOKEN_MINUTES"),
            }
        }

        config
    }

    /// Pricing rules built from this configuration.
    pub fn pricing_rules(&self) -> PricingRules {
        PricingRules {
            free_shipping_threshold: self.free_shipping_threshold,
            shipping_fee: self.shipping_fee,
            tax_rate: self.tax_rate,
            ..PricingRules::default()
        }
    }

    /// Database settings for this configuration.
    pub fn db_config(&self) -> Result<DbConfig, Box<dyn std::error::Error>> {
        let mut db_config = match &self.db_path {
            Some(path) if path.as_os_str() == IN_MEMORY_DB => DbConfig::in_memory(),
            _ => DbConfig::new(self.database_path()?),
        };

        if let Some(secret) = &self.auth_secret {
            db_config = db_config.auth_secret(secret.clone());
        }

        Ok(db_config.reset_token_lifetime(Duration::from_secs(self.reset_token_minutes * 60)))
    }

    /// Determines the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.khatti.storefront/khatti.db`
    /// - **Windows**: `%APPDATA%\khatti\storefront\data\khatti.db`
    /// - **Linux**: `~/.local/share/storefront/khatti.db`
    pub fn database_path(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "khatti", "storefront")
            .ok_or("Could not determine app data directory")?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("khatti.db"))
    }
}

//! Application settings loaded from the TOML config file.
//!
//! The file is chosen by the `BAYTDESIGN_CONFIG` environment variable and defaults to
//! `./config.toml`. A missing file is not an error: defaults are used and the catalog
//! seed is empty.

use super::catalog::CatalogSeed;
use crate::core::summary::SpendPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Everything in the config file
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    /// Runtime settings
    #[serde(default)]
    pub settings: Settings,
    /// Starter catalog
    #[serde(flatten)]
    pub catalog: CatalogSeed,
}

/// The `[settings]` table
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// Whether cart items count toward budget spending
    pub include_cart_in_budget: bool,
    /// Rewrite unparsable stored amounts to zero at startup
    pub repair_on_startup: bool,
    /// Currency label used by the report formatters
    pub currency_code: String,
    /// Places shown by the report formatters
    pub currency_places: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_cart_in_budget: true,
            repair_on_startup: true,
            currency_code: "BHD".to_string(),
            currency_places: 3,
        }
    }
}

impl Settings {
    /// The budget spending policy these settings select.
    #[must_use]
    pub const fn spend_policy(&self) -> SpendPolicy {
        if self.include_cart_in_budget {
            SpendPolicy::SelectionsAndCart
        } else {
            SpendPolicy::SelectionsOnly
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Parses configuration text.
///
/// # Errors
/// Returns the TOML error message when the text is not a valid config.
pub fn parse_config(contents: &str) -> std::result::Result<AppConfig, String> {
    toml::from_str(contents).map_err(|e| e.to_string())
}

/// Loads the config file named by `BAYTDESIGN_CONFIG`, falling back to `./config.toml`,
/// and to built-in defaults if that file does not exist.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("BAYTDESIGN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!(%path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(path)
}

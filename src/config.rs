use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CONFIG_PATH, DEFAULT_MAX_AREA_SQFT, DEFAULT_MAX_PRICE_PKR};
use crate::error::{CleanerError, Result};
use crate::pipeline::processing::normalize::RangePolicy;

/// Pipeline policy knobs. Every field has a default, so an empty `cleaner.toml`
/// (or no file at all) yields a working configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleanerConfig {
    /// How "50 - 60 Lakh" style ranges collapse to a single value
    pub range_policy: RangePolicy,
    /// Prices above this are treated as parse failures
    pub max_price_pkr: f64,
    /// Areas above this (in sq ft) are treated as parse failures
    pub max_area_sqft: f64,
    /// Location of the durable seen-fingerprint index, if cross-run dedup is wanted
    pub seen_db_path: Option<PathBuf>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            range_policy: RangePolicy::Midpoint,
            max_price_pkr: DEFAULT_MAX_PRICE_PKR,
            max_area_sqft: DEFAULT_MAX_AREA_SQFT,
            seen_db_path: None,
        }
    }
}

impl CleanerConfig {
    /// Load `cleaner.toml` from the working directory, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = config_path.as_ref();
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(config_path).map_err(|e| {
                CleanerError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml_str(&content)?
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CleanerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(policy) = std::env::var("CLEANER_RANGE_POLICY") {
            self.range_policy = policy.parse()?;
        }
        if let Ok(max_price) = std::env::var("CLEANER_MAX_PRICE_PKR") {
            self.max_price_pkr = parse_env_f64("CLEANER_MAX_PRICE_PKR", &max_price)?;
        }
        if let Ok(max_area) = std::env::var("CLEANER_MAX_AREA_SQFT") {
            self.max_area_sqft = parse_env_f64("CLEANER_MAX_AREA_SQFT", &max_area)?;
        }
        if let Ok(path) = std::env::var("CLEANER_SEEN_DB_PATH") {
            self.seen_db_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(self.max_price_pkr.is_finite() && self.max_price_pkr > 0.0) {
            return Err(CleanerError::Config(format!(
                "max_price_pkr must be a positive number, got {}",
                self.max_price_pkr
            )));
        }
        if !(self.max_area_sqft.is_finite() && self.max_area_sqft > 0.0) {
            return Err(CleanerError::Config(format!(
                "max_area_sqft must be a positive number, got {}",
                self.max_area_sqft
            )));
        }
        Ok(())
    }
}

fn parse_env_f64(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| CleanerError::Config(format!("{} is not a number ('{}'): {}", name, value, e)))
}

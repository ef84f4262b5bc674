//! Catalog tuning knobs.
//!
//! # Responsibility
//! - Hold the limits used by lookups and storage housekeeping.
//! - Load overrides from a JSON file and validate them.
//!
//! # Invariants
//! - `result_limit` is never zero after validation.
//! - Missing keys in a config file fall back to defaults.

use crate::model::product::Nutriscore;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Row ceiling of the hosting database plan.
pub const DEFAULT_ROW_CAP: u64 = 8500;
/// Maximum elements returned by one lookup.
pub const DEFAULT_RESULT_LIMIT: u32 = 6;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid config value for {field}: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Limits shared by the catalog services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Above this many rows a registration must first evict a product.
    pub row_cap: u64,
    /// Maximum number of categories/products per lookup.
    pub result_limit: u32,
    /// Grade a substitute must carry.
    pub healthy_grade: Nutriscore,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            row_cap: DEFAULT_ROW_CAP,
            result_limit: DEFAULT_RESULT_LIMIT,
            healthy_grade: Nutriscore::A,
        }
    }
}

impl CatalogConfig {
    /// Reads a JSON config file; absent keys keep their defaults.
    ///
    /// # Errors
    /// - Returns `ConfigError::Io` when the file cannot be read.
    /// - Returns `ConfigError::Parse` on malformed JSON.
    /// - Returns `ConfigError::InvalidValue` when validation fails.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "result_limit",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

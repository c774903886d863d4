//! Configuration loading traits and types.
//!
//! Loads Super-Twisting parameters from TOML files and runs them through
//! the same validation as the builder.
//!
//! # Usage
//!
//! ```rust,no_run
//! use smc_common::config::{load_config, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = load_config(Path::new("sta.toml"))?;
//!     println!("max force: {}", config.max_force());
//!     Ok(())
//! }
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::controller::error::ConfigurationError;
use crate::controller::params::{SuperTwistingConfig, SuperTwistingParams};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// File could not be read or TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ConfigurationError),
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Load and validate a Super-Twisting configuration file.
pub fn load_config(path: &Path) -> Result<SuperTwistingConfig, ConfigError> {
    let params = SuperTwistingParams::load(path)?;
    let config = SuperTwistingConfig::from_params(&params)?;
    debug!("Loaded Super-Twisting config from {}", path.display());
    Ok(config)
}

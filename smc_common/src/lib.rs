//! SMC Common Library
//!
//! Shared types for the Super-Twisting sliding-mode controller workspace:
//! constants, validated configuration, error taxonomy and tick records.
//!
//! # Module Structure
//!
//! - [`consts`] - Numeric limits and defaults
//! - [`controller`] - Gains, configuration, switching, errors, outputs
//! - [`config`] - TOML configuration loading
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust,no_run
//! use smc_common::prelude::*;
//! use std::path::Path;
//!
//! let params = SuperTwistingParams::load(Path::new("sta.toml")).unwrap();
//! let config = SuperTwistingConfig::from_params(&params).unwrap();
//! assert!(config.check_stability_conditions().stable);
//! ```

pub mod config;
pub mod consts;
pub mod controller;
pub mod prelude;

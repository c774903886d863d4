//! Prelude module for common re-exports.
//!
//! ```rust
//! use smc_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, load_config};
pub use crate::controller::params::{
    ConfigAdvisory, StabilityReport, SuperTwistingConfig, SuperTwistingConfigBuilder,
    SuperTwistingParams,
};

// ─── Gains & Switching ──────────────────────────────────────────────
pub use crate::controller::gains::{SmcGains, SurfaceGains, TwistingGains};
pub use crate::controller::switching::SwitchMethod;

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::controller::error::{ComputationError, ConfigurationError, GainUpdateError};

// ─── Outputs ────────────────────────────────────────────────────────
pub use crate::controller::output::{
    ControlComponents, ControlFlags, ControlResult, ControlVector, ControllerParameters,
    IntegralPhase, PerformanceReport, StabilityAnalysis,
};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{GAIN_COUNT, HISTORY_CAPACITY, PLANT_DOF, STATE_DIM};

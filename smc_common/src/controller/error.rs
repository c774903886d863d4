//! Error taxonomy for the Super-Twisting controller.
//!
//! - [`ConfigurationError`]: invalid gains or parameters at construction.
//!   Fatal to that operation, never leaves a partially valid configuration.
//! - [`GainUpdateError`]: runtime gain update rejected; no mutation performed.
//! - [`ComputationError`]: failure inside a control tick. Absorbed at the
//!   controller boundary and reported through the tick's error flag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid gain vector or controller parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Gain vector does not have exactly the required number of entries.
    #[error("expected {expected} gains, got {got}")]
    GainCount { expected: usize, got: usize },

    /// Twisting gains violate `K1 > K2 > 0`.
    #[error("twisting gains must satisfy K1 > K2 > 0 (K1={k1}, K2={k2})")]
    TwistingGainOrder { k1: f64, k2: f64 },

    /// One of the surface gains `k1, k2, lam1, lam2` is not strictly positive.
    #[error("surface gain {name} must be > 0, got {value}")]
    NonPositiveSurfaceGain { name: &'static str, value: f64 },

    /// Power exponent outside `(0, 1]`.
    #[error("power_exponent must be in (0, 1], got {0}")]
    PowerExponent(f64),

    /// Negative damping gain.
    #[error("damping_gain must be >= 0, got {0}")]
    NegativeDamping(f64),

    /// A parameter that must be strictly positive is not.
    #[error("{field} must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// NaN or infinite parameter.
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    /// Switching method key is not one of `tanh`, `linear`, `sign`.
    #[error("unknown switch method '{0}' (expected tanh, linear or sign)")]
    UnknownSwitchMethod(String),
}

/// Runtime gain update rejected. The previously active gains remain in effect.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GainUpdateError {
    /// Requested pair violates `K1 > K2 > 0`.
    #[error("gain update rejected: K1 > K2 > 0 required (K1={k1}, K2={k2})")]
    StabilityViolation { k1: f64, k2: f64 },

    /// Requested gain is NaN or infinite.
    #[error("gain update rejected: gains must be finite")]
    NonFinite,
}

/// Failure inside a single control tick.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
pub enum ComputationError {
    /// State vector holds NaN or infinite entries.
    #[error("state vector contains non-finite values")]
    NonFiniteState,

    /// State vector is shorter than the surface evaluator requires.
    #[error("state vector has {got} entries, expected at least {expected}")]
    StateDimension { expected: usize, got: usize },

    /// Surface evaluator produced NaN or infinity.
    #[error("sliding surface evaluated to a non-finite value")]
    NonFiniteSurface,

    /// Integration step is NaN, infinite or not strictly positive.
    #[error("invalid time step {0}")]
    InvalidTimeStep(f64),

    /// Boundary-layer width is NaN.
    #[error("invalid boundary layer {0}")]
    InvalidBoundaryLayer(f64),

    /// Control law produced NaN or infinity.
    #[error("control law produced a non-finite output")]
    NonFiniteOutput,

    /// Performance analysis needs at least two surface samples.
    #[error("surface history has {len} samples, at least 2 required")]
    InsufficientHistory { len: usize },
}

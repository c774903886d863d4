//! Numeric constants for the Super-Twisting controller workspace.
//!
//! Single source of truth for all limits and defaults.
//! Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

/// Number of gains in a full gain vector `(K1, K2, k1, k2, lam1, lam2)`.
pub const GAIN_COUNT: usize = 6;

/// Number of twisting gains at the head of a gain vector.
pub const TWISTING_GAIN_COUNT: usize = 2;

/// Plant state dimension: `[x, θ1, θ2, ẋ, θ̇1, θ̇2]`.
pub const STATE_DIM: usize = 6;

/// Plant degrees of freedom (cart + two links). Sizes the numeric control vector.
pub const PLANT_DOF: usize = 3;

/// Index of the first link angle in the state vector.
pub const THETA1_INDEX: usize = 1;
/// Index of the second link angle in the state vector.
pub const THETA2_INDEX: usize = 2;
/// Index of the first link angular velocity in the state vector.
pub const THETA1_DOT_INDEX: usize = 4;
/// Index of the second link angular velocity in the state vector.
pub const THETA2_DOT_INDEX: usize = 5;

/// Capacity of the per-controller output history ring buffer.
pub const HISTORY_CAPACITY: usize = 100;

/// Standard Super-Twisting power exponent α.
pub const DEFAULT_POWER_EXPONENT: f64 = 0.5;

/// Default numerical floor substituted for `|s|` near the surface origin.
pub const DEFAULT_REGULARIZATION: f64 = 1e-10;

/// Default switching boundary-layer width.
pub const DEFAULT_BOUNDARY_LAYER: f64 = 0.01;

/// Derived anti-windup limit as a fraction of `K1 + K2`.
pub const DEFAULT_ANTI_WINDUP_FRACTION: f64 = 0.1;

/// `|z| ≥ fraction·L` reports the integrator as anti-windup active.
pub const ANTI_WINDUP_ACTIVE_FRACTION: f64 = 0.9;

/// Advisory `K1/K2` ratio for an enhanced stability margin.
pub const ENHANCED_STABILITY_RATIO: f64 = 1.1;

/// `|s|` below this value counts as converged in performance analysis.
pub const CONVERGENCE_THRESHOLD: f64 = 0.01;

const_assert!(TWISTING_GAIN_COUNT < GAIN_COUNT);
const_assert!(PLANT_DOF <= STATE_DIM);
const_assert!(THETA2_DOT_INDEX < STATE_DIM);

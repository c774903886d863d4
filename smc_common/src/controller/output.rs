//! Per-tick output records and introspection types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::error::ComputationError;
use super::gains::SmcGains;
use super::switching::SwitchMethod;
use crate::consts::PLANT_DOF;

/// Numeric control vector, one entry per plant degree of freedom.
///
/// Only the cart channel (index 0) is actuated.
pub type ControlVector = [f64; PLANT_DOF];

/// Raw output of one Super-Twisting algorithm step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlComponents {
    /// `u1 + u2`.
    pub u_total: f64,
    /// Continuous term `-K1·|s|^α·w`.
    pub u1: f64,
    /// Integral term `-K2·z`.
    pub u2: f64,
    /// Clamped integral state z after this step.
    pub integral_state: f64,
    /// Switching output w.
    pub switching_output: f64,
    /// `|s|^α` (or `ε^α` on the regularized branch).
    pub surface_power: f64,
    /// `|s| ≤ ε` and the regularized branch was used.
    pub regularized: bool,
}

/// Phase of the algorithm's integral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegralPhase {
    /// `z = 0`.
    #[default]
    Reset,
    /// `z` evolving inside the anti-windup band.
    Accumulating,
    /// `|z| ≥ 0.9·L`.
    AntiWindupActive,
}

bitflags! {
    /// Activity flags attached to every tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ControlFlags: u8 {
        /// Output clamped to `±max_force`.
        const SATURATED          = 0x01;
        /// Integral state at or beyond 90 % of the anti-windup limit.
        const ANTI_WINDUP_ACTIVE = 0x02;
        /// Regularized branch of the continuous term fired.
        const REGULARIZED        = 0x04;
        /// `K1 > K2 > 0` held for this tick.
        const STABLE             = 0x08;
        /// Tick failed; output forced to zero.
        const ERROR              = 0x80;
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Full diagnostic record of one control tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlResult {
    /// Saturated control force [N].
    pub u: f64,
    /// Control before saturation.
    pub u_raw: f64,
    pub u1: f64,
    pub u2: f64,
    /// `-damping_gain·ṡ` (0 when damping is disabled).
    pub damping_term: f64,
    pub surface: f64,
    pub surface_derivative: f64,
    pub integral_state: f64,
    pub switching_output: f64,
    pub phase: IntegralPhase,
    pub flags: ControlFlags,
    /// `K1 / K2`.
    pub gain_ratio: f64,
    /// Finite-time convergence estimate at the current `|s|` [s].
    /// `None` when no finite estimate exists.
    pub convergence_time: Option<f64>,
    /// Lyapunov function value.
    pub lyapunov: f64,
    /// Set when the tick failed and the output was forced to zero.
    pub error: Option<ComputationError>,
}

impl ControlResult {
    /// Zero control with the `ERROR` flag set.
    pub fn safe_default(error: ComputationError) -> Self {
        Self {
            u: 0.0,
            u_raw: 0.0,
            u1: 0.0,
            u2: 0.0,
            damping_term: 0.0,
            surface: 0.0,
            surface_derivative: 0.0,
            integral_state: 0.0,
            switching_output: 0.0,
            phase: IntegralPhase::Reset,
            flags: ControlFlags::ERROR,
            gain_ratio: 0.0,
            convergence_time: None,
            lyapunov: 0.0,
            error: Some(error),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.flags.contains(ControlFlags::ERROR)
    }

    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.flags.contains(ControlFlags::SATURATED)
    }

    /// Numeric vector form of this tick.
    #[inline]
    pub fn to_vector(&self) -> ControlVector {
        let mut v = [0.0; PLANT_DOF];
        v[0] = self.u;
        v
    }
}

/// Snapshot of the active controller parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerParameters {
    /// Gains with the currently active twisting pair.
    pub gains: SmcGains,
    pub dt: f64,
    pub max_force: f64,
    pub damping_gain: f64,
    pub anti_windup_limit: f64,
    pub power_exponent: f64,
    pub boundary_layer: f64,
    pub switch_method: SwitchMethod,
    pub regularization: f64,
}

/// Stability summary of the active gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityAnalysis {
    /// `K1 > K2 > 0`.
    pub stable: bool,
    pub gain_ratio: f64,
    pub stability_margin: f64,
    /// Advisory: `K1 / K2 > 1.1`.
    pub enhanced_stability: bool,
    /// `α == 0.5`.
    pub standard_exponent: bool,
    pub anti_windup_limit: f64,
}

/// Offline decay analysis of a surface trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Least-squares decay rate of `ln|s|` per sample (positive = decaying).
    pub convergence_rate: f64,
    /// First sample index with `|s| < 0.01`.
    pub convergence_index: Option<usize>,
    /// `(K1 - K2) / K2`.
    pub stability_margin: f64,
    /// `|s|` of the last sample.
    pub final_surface: f64,
}

impl PerformanceReport {
    #[inline]
    pub fn converged(&self) -> bool {
        self.convergence_index.is_some()
    }
}

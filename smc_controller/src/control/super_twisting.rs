//! Super-Twisting second-order sliding-mode algorithm.
//!
//! ```text
//! w  = φ(s / boundary_layer)
//! u1 = -K1 · max(|s|, ε)^α · w
//! z  = clamp(z + w·dt, -L, L)
//! u2 = -K2 · z
//! u  = u1 + u2
//! ```
//!
//! Finite-time convergence requires `K1 > K2 > 0`. The regularization floor
//! ε keeps the gradient of `|s|^α` bounded at `s = 0` for `α < 1`.

use smc_common::consts::ANTI_WINDUP_ACTIVE_FRACTION;
use smc_common::controller::error::{ComputationError, ConfigurationError, GainUpdateError};
use smc_common::controller::gains::TwistingGains;
use smc_common::controller::output::{ControlComponents, IntegralPhase, PerformanceReport};
use smc_common::controller::params::SuperTwistingConfig;
use smc_common::controller::switching::{SwitchMethod, sign};

use super::analysis::{first_converged_index, log_linear_decay_rate};

/// Internal state of the algorithm.
///
/// Must be reset (via [`AlgorithmState::reset`]) when the controller is
/// re-engaged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlgorithmState {
    /// Running integral z of the switching output.
    integral_state: f64,
    /// Last observed surface value.
    previous_surface: f64,
}

impl AlgorithmState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn integral_state(&self) -> f64 {
        self.integral_state
    }

    #[inline]
    pub fn previous_surface(&self) -> f64 {
        self.previous_surface
    }
}

/// Super-Twisting control law with its integral state.
#[derive(Debug, Clone)]
pub struct SuperTwistingAlgorithm {
    gains: TwistingGains,
    /// Fractional power α ∈ (0, 1].
    power_exponent: f64,
    /// Floor ε for `|s|`.
    regularization: f64,
    /// Integral clamp L (None = unbounded).
    anti_windup_limit: Option<f64>,
    state: AlgorithmState,
}

impl SuperTwistingAlgorithm {
    /// Build from a validated configuration.
    pub fn from_config(config: &SuperTwistingConfig) -> Self {
        Self {
            gains: config.gains().twisting,
            power_exponent: config.power_exponent(),
            regularization: config.regularization(),
            anti_windup_limit: Some(config.anti_windup_limit()),
            state: AlgorithmState::default(),
        }
    }

    /// Standalone constructor without an anti-windup limit.
    ///
    /// # Errors
    ///
    /// Rejects `K1 ≤ K2`, `K2 ≤ 0`, α outside `(0, 1]` and `ε ≤ 0`.
    pub fn new(
        gains: TwistingGains,
        power_exponent: f64,
        regularization: f64,
    ) -> Result<Self, ConfigurationError> {
        if !gains.is_stable() {
            return Err(ConfigurationError::TwistingGainOrder {
                k1: gains.k1,
                k2: gains.k2,
            });
        }
        if !(power_exponent > 0.0 && power_exponent <= 1.0) {
            return Err(ConfigurationError::PowerExponent(power_exponent));
        }
        if !(regularization > 0.0 && regularization.is_finite()) {
            return Err(ConfigurationError::NonPositive {
                field: "regularization",
                value: regularization,
            });
        }
        Ok(Self {
            gains,
            power_exponent,
            regularization,
            anti_windup_limit: None,
            state: AlgorithmState::default(),
        })
    }

    /// Clamp the integral state to `[-limit, limit]`.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive or non-finite limit.
    pub fn with_anti_windup_limit(mut self, limit: f64) -> Result<Self, ConfigurationError> {
        if !(limit > 0.0 && limit.is_finite()) {
            return Err(ConfigurationError::NonPositive {
                field: "anti_windup_limit",
                value: limit,
            });
        }
        self.anti_windup_limit = Some(limit);
        Ok(self)
    }

    /// Compute one Super-Twisting step.
    ///
    /// Mutates only the integral state and the stored previous surface.
    ///
    /// # Errors
    ///
    /// Non-finite `surface_value`, `dt` that is non-finite or not
    /// strictly positive, a NaN `boundary_layer`, or a non-finite result.
    /// State is untouched on error.
    pub fn compute_control(
        &mut self,
        surface_value: f64,
        dt: f64,
        switch_method: SwitchMethod,
        boundary_layer: f64,
    ) -> Result<ControlComponents, ComputationError> {
        if !surface_value.is_finite() {
            return Err(ComputationError::NonFiniteSurface);
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ComputationError::InvalidTimeStep(dt));
        }
        if boundary_layer.is_nan() {
            return Err(ComputationError::InvalidBoundaryLayer(boundary_layer));
        }

        let w = switch_method.evaluate(surface_value, boundary_layer);

        // ── Continuous term ─────────────────────────────────────
        let (surface_power, regularized) = self.surface_power(surface_value);
        let u1 = -self.gains.k1 * surface_power * w;

        // ── Integral term with anti-windup clamp ────────────────
        let mut z = self.state.integral_state + w * dt;
        if let Some(limit) = self.anti_windup_limit {
            z = z.clamp(-limit, limit);
        }
        let u2 = -self.gains.k2 * z;
        let u_total = u1 + u2;
        if !(z.is_finite() && u_total.is_finite()) {
            return Err(ComputationError::NonFiniteOutput);
        }

        self.state.integral_state = z;
        self.state.previous_surface = surface_value;

        Ok(ControlComponents {
            u_total,
            u1,
            u2,
            integral_state: z,
            switching_output: w,
            surface_power,
            regularized,
        })
    }

    /// `(max(|s|, ε)^α, regularized)`.
    #[inline]
    fn surface_power(&self, surface_value: f64) -> (f64, bool) {
        let abs_s = surface_value.abs();
        if abs_s > self.regularization {
            (abs_s.powf(self.power_exponent), false)
        } else {
            (self.regularization.powf(self.power_exponent), true)
        }
    }

    // ─── Gains ──────────────────────────────────────────────────────

    /// Replace `(K1, K2)`. On error the previous gains stay in effect.
    pub fn set_gains(&mut self, k1: f64, k2: f64) -> Result<(), GainUpdateError> {
        self.gains = TwistingGains::new(k1, k2)?;
        Ok(())
    }

    /// Active `(K1, K2)`.
    #[inline]
    pub fn gains(&self) -> (f64, f64) {
        self.gains.as_tuple()
    }

    #[inline]
    pub fn twisting_gains(&self) -> &TwistingGains {
        &self.gains
    }

    #[inline]
    pub fn power_exponent(&self) -> f64 {
        self.power_exponent
    }

    #[inline]
    pub fn anti_windup_limit(&self) -> Option<f64> {
        self.anti_windup_limit
    }

    // ─── State ──────────────────────────────────────────────────────

    /// Zero the integral state and previous surface. Idempotent.
    #[inline]
    pub fn reset_state(&mut self) {
        self.state.reset();
    }

    #[inline]
    pub fn state(&self) -> &AlgorithmState {
        &self.state
    }

    /// Copy of the current state, for rollback of a failed tick.
    #[inline]
    pub fn snapshot(&self) -> AlgorithmState {
        self.state
    }

    #[inline]
    pub fn restore(&mut self, state: AlgorithmState) {
        self.state = state;
    }

    /// Phase of the integral state.
    pub fn phase(&self) -> IntegralPhase {
        let z = self.state.integral_state;
        if z == 0.0 {
            return IntegralPhase::Reset;
        }
        match self.anti_windup_limit {
            Some(limit) if z.abs() >= ANTI_WINDUP_ACTIVE_FRACTION * limit => {
                IntegralPhase::AntiWindupActive
            }
            _ => IntegralPhase::Accumulating,
        }
    }

    // ─── Diagnostics ────────────────────────────────────────────────

    /// `K1 > K2 > 0`.
    #[inline]
    pub fn check_stability_condition(&self) -> bool {
        self.gains.is_stable()
    }

    /// Finite-time convergence estimate from `initial_surface` [s].
    ///
    /// `2·√|s₀| / √K2` for α = 0.5, `(1-α)·|s₀|^(1-α) / K2^α` otherwise.
    /// `+inf` when the gains are not stable.
    pub fn estimate_convergence_time(&self, initial_surface: f64) -> f64 {
        let k2 = self.gains.k2;
        if !self.check_stability_condition() || k2 <= 0.0 {
            return f64::INFINITY;
        }
        let s0 = initial_surface.abs();
        let alpha = self.power_exponent;
        if alpha == 0.5 {
            2.0 * s0.sqrt() / k2.sqrt()
        } else {
            (1.0 - alpha) * s0.powf(1.0 - alpha) / k2.powf(alpha)
        }
    }

    /// Decay analysis of a recorded surface trajectory.
    ///
    /// # Errors
    ///
    /// Fewer than two samples.
    pub fn analyze_performance(
        &self,
        surface_history: &[f64],
    ) -> Result<PerformanceReport, ComputationError> {
        let Some(last) = surface_history.last().filter(|_| surface_history.len() >= 2) else {
            return Err(ComputationError::InsufficientHistory {
                len: surface_history.len(),
            });
        };
        Ok(PerformanceReport {
            convergence_rate: log_linear_decay_rate(surface_history),
            convergence_index: first_converged_index(surface_history),
            stability_margin: self.gains.margin(),
            final_surface: last.abs(),
        })
    }

    /// `V = K2·|s| + ½·(u2 + u1_eq)²` at the current integral state.
    ///
    /// `u1_eq` is the continuous term recomputed at `surface_value` with the
    /// discontinuous switching. The derivative does not enter V.
    pub fn lyapunov_function(&self, surface_value: f64, _surface_derivative: f64) -> f64 {
        let (surface_power, _) = self.surface_power(surface_value);
        let u1_eq = -self.gains.k1 * surface_power * sign(surface_value);
        let u2 = -self.gains.k2 * self.state.integral_state;
        self.gains.k2 * surface_value.abs() + 0.5 * (u2 + u1_eq).powi(2)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

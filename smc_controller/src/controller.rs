//! Super-Twisting controller: per-tick orchestration and gain management.
//!
//! Tick pipeline:
//! 1. Surface `s` from the state vector
//! 2. `ṡ = (s - s_prev) / dt`, or `lam1·θ̇1 + lam2·θ̇2` when `dt ≤ 0`
//! 3. Super-Twisting step → `u1`, `u2`, `u_total`
//! 4. Damping: `u_total - damping_gain·ṡ` (when enabled)
//! 5. Clamp(±max_force)
//! 6. Push saturated output into the history ring buffer
//! 7. Assemble the diagnostic record
//!
//! A failed tick restores the algorithm state it had before the tick and
//! returns [`ControlResult::safe_default`]. Nothing escapes the tick boundary.

use std::fmt;

use heapless::HistoryBuf;
use static_assertions::assert_impl_all;
use tracing::{debug, info, warn};

use smc_common::consts::{
    DEFAULT_POWER_EXPONENT, HISTORY_CAPACITY, STATE_DIM, THETA1_DOT_INDEX, THETA2_DOT_INDEX,
};
use smc_common::controller::error::{ComputationError, GainUpdateError};
use smc_common::controller::output::{
    ControlFlags, ControlResult, ControlVector, ControllerParameters, IntegralPhase,
    StabilityAnalysis,
};
use smc_common::controller::params::{StabilityReport, SuperTwistingConfig};

use crate::control::super_twisting::SuperTwistingAlgorithm;
use crate::surface::{LinearSlidingSurface, SlidingSurface};
use crate::validation::validate_gain_rows;

/// Super-Twisting controller for one plant.
///
/// Owns its configuration, algorithm state and output history exclusively.
/// Not internally synchronized: ticks must be serialized by the caller.
pub struct SuperTwistingController<S: SlidingSurface = LinearSlidingSurface> {
    config: SuperTwistingConfig,
    surface: S,
    algorithm: SuperTwistingAlgorithm,
    /// Saturated outputs, diagnostics only.
    history: HistoryBuf<f64, HISTORY_CAPACITY>,
}

assert_impl_all!(SuperTwistingController: Send);

impl SuperTwistingController<LinearSlidingSurface> {
    /// Controller with the standard linear DIP surface built from the
    /// configuration's surface gains.
    pub fn new(config: SuperTwistingConfig) -> Self {
        let surface = LinearSlidingSurface::new(config.gains().surface);
        Self::with_surface(config, surface)
    }
}

impl<S: SlidingSurface> SuperTwistingController<S> {
    /// Controller with a caller-supplied surface evaluator.
    pub fn with_surface(config: SuperTwistingConfig, surface: S) -> Self {
        let algorithm = SuperTwistingAlgorithm::from_config(&config);
        info!(
            "Super-Twisting controller initialized: K1={}, K2={}, dt={}, max_force={}, switch={}",
            config.gains().twisting.k1,
            config.gains().twisting.k2,
            config.dt(),
            config.max_force(),
            config.switch_method(),
        );
        Self {
            config,
            surface,
            algorithm,
            history: HistoryBuf::new(),
        }
    }

    // ─── Tick Entry Points ──────────────────────────────────────────

    /// One control tick at the configured period, full diagnostic record.
    pub fn compute_control(&mut self, state: &[f64]) -> ControlResult {
        self.compute_control_with_dt(state, self.config.dt())
    }

    /// One control tick with an explicit step.
    ///
    /// `dt ≤ 0` selects the velocity-based derivative estimate; the
    /// integral then advances by the configured period.
    pub fn compute_control_with_dt(&mut self, state: &[f64], dt: f64) -> ControlResult {
        let snapshot = self.algorithm.snapshot();
        match self.try_tick(state, dt) {
            Ok(result) => result,
            Err(e) => {
                self.algorithm.restore(snapshot);
                warn!("Super-Twisting tick failed, output forced to zero: {e}");
                ControlResult::safe_default(e)
            }
        }
    }

    /// One control tick at the configured period, numeric vector only.
    pub fn compute_control_vector(&mut self, state: &[f64]) -> ControlVector {
        self.compute_control(state).to_vector()
    }

    fn try_tick(&mut self, state: &[f64], dt: f64) -> Result<ControlResult, ComputationError> {
        if state.iter().any(|x| !x.is_finite()) {
            return Err(ComputationError::NonFiniteState);
        }
        if !dt.is_finite() {
            return Err(ComputationError::InvalidTimeStep(dt));
        }

        // ── 1. Surface ──────────────────────────────────────────
        let surface = self.surface.compute(state)?;
        if !surface.is_finite() {
            return Err(ComputationError::NonFiniteSurface);
        }

        // ── 2. Surface derivative ───────────────────────────────
        let (surface_derivative, step) = if dt > 0.0 {
            let prev = self.algorithm.state().previous_surface();
            ((surface - prev) / dt, dt)
        } else {
            (self.velocity_derivative(state)?, self.config.dt())
        };

        // ── 3. Super-Twisting step ──────────────────────────────
        let components = self.algorithm.compute_control(
            surface,
            step,
            self.config.switch_method(),
            self.config.boundary_layer(),
        )?;

        // ── 4. Damping ──────────────────────────────────────────
        let damping_gain = self.config.damping_gain();
        let damping_term = if damping_gain > 0.0 {
            -damping_gain * surface_derivative
        } else {
            0.0
        };
        let u_raw = components.u_total + damping_term;
        if !u_raw.is_finite() {
            return Err(ComputationError::NonFiniteOutput);
        }

        // ── 5. Saturation ───────────────────────────────────────
        let max_force = self.config.max_force();
        let u = u_raw.clamp(-max_force, max_force);

        // ── 6. History ──────────────────────────────────────────
        self.history.write(u);

        // ── 7. Diagnostics ──────────────────────────────────────
        let phase = self.algorithm.phase();
        let mut flags = ControlFlags::empty();
        flags.set(ControlFlags::SATURATED, u_raw.abs() > max_force);
        flags.set(
            ControlFlags::ANTI_WINDUP_ACTIVE,
            phase == IntegralPhase::AntiWindupActive,
        );
        flags.set(ControlFlags::REGULARIZED, components.regularized);
        flags.set(ControlFlags::STABLE, self.algorithm.check_stability_condition());

        Ok(ControlResult {
            u,
            u_raw,
            u1: components.u1,
            u2: components.u2,
            damping_term,
            surface,
            surface_derivative,
            integral_state: components.integral_state,
            switching_output: components.switching_output,
            phase,
            flags,
            gain_ratio: self.algorithm.twisting_gains().ratio(),
            convergence_time: Some(self.algorithm.estimate_convergence_time(surface))
                .filter(|t| t.is_finite()),
            lyapunov: self
                .algorithm
                .lyapunov_function(surface, surface_derivative),
            error: None,
        })
    }

    /// `lam1·θ̇1 + lam2·θ̇2`, used when no step is available.
    fn velocity_derivative(&self, state: &[f64]) -> Result<f64, ComputationError> {
        if state.len() < STATE_DIM {
            return Err(ComputationError::StateDimension {
                expected: STATE_DIM,
                got: state.len(),
            });
        }
        let g = &self.config.gains().surface;
        Ok(g.lam1 * state[THETA1_DOT_INDEX] + g.lam2 * state[THETA2_DOT_INDEX])
    }

    // ─── Gain Management ────────────────────────────────────────────

    /// Feasibility mask for a batch of candidate gain rows.
    pub fn validate_gains<I, R>(&self, rows: I) -> Vec<bool>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[f64]>,
    {
        validate_gain_rows(rows)
    }

    /// Replace `(K1, K2)` at runtime. On error nothing changes.
    pub fn set_twisting_gains(&mut self, k1: f64, k2: f64) -> Result<(), GainUpdateError> {
        let previous = self.algorithm.gains();
        self.algorithm.set_gains(k1, k2).inspect_err(|e| {
            warn!("Twisting gain update rejected: {e}");
        })?;
        debug!(
            "Twisting gains updated: ({}, {}) → ({k1}, {k2})",
            previous.0, previous.1
        );
        Ok(())
    }

    /// Update either twisting gain, keeping the other at its active value.
    pub fn tune_gains(&mut self, k1: Option<f64>, k2: Option<f64>) -> Result<(), GainUpdateError> {
        let (active_k1, active_k2) = self.algorithm.gains();
        self.set_twisting_gains(k1.unwrap_or(active_k1), k2.unwrap_or(active_k2))
    }

    /// Active `(K1, K2)`.
    #[inline]
    pub fn twisting_gains(&self) -> (f64, f64) {
        self.algorithm.gains()
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Clear algorithm state, previous surface and history.
    pub fn reset(&mut self) {
        self.algorithm.reset_state();
        self.history.clear();
        debug!("Super-Twisting controller reset");
    }

    /// Alias of [`reset`](Self::reset).
    #[inline]
    pub fn reset_controller(&mut self) {
        self.reset();
    }

    // ─── Introspection ──────────────────────────────────────────────

    /// Active parameters, with the current twisting gains.
    pub fn parameters(&self) -> ControllerParameters {
        let mut gains = *self.config.gains();
        gains.twisting = *self.algorithm.twisting_gains();
        ControllerParameters {
            gains,
            dt: self.config.dt(),
            max_force: self.config.max_force(),
            damping_gain: self.config.damping_gain(),
            anti_windup_limit: self.config.anti_windup_limit(),
            power_exponent: self.config.power_exponent(),
            boundary_layer: self.config.boundary_layer(),
            switch_method: self.config.switch_method(),
            regularization: self.config.regularization(),
        }
    }

    /// Stability summary of the active gains.
    pub fn stability_analysis(&self) -> StabilityAnalysis {
        let report = StabilityReport::for_gains(self.algorithm.twisting_gains());
        StabilityAnalysis {
            stable: report.stable,
            gain_ratio: report.gain_ratio,
            stability_margin: report.stability_margin,
            enhanced_stability: report.enhanced_stability,
            standard_exponent: self.config.power_exponent() == DEFAULT_POWER_EXPONENT,
            anti_windup_limit: self.config.anti_windup_limit(),
        }
    }

    /// Convergence-time estimate from `current_surface` [s].
    #[inline]
    pub fn convergence_estimate(&self, current_surface: f64) -> f64 {
        self.algorithm.estimate_convergence_time(current_surface)
    }

    /// Saturated outputs, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &f64> + '_ {
        self.history.oldest_ordered()
    }

    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most recent saturated output.
    #[inline]
    pub fn last_output(&self) -> Option<f64> {
        self.history.recent().copied()
    }

    #[inline]
    pub fn config(&self) -> &SuperTwistingConfig {
        &self.config
    }

    #[inline]
    pub fn algorithm(&self) -> &SuperTwistingAlgorithm {
        &self.algorithm
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: SlidingSurface + fmt::Debug> fmt::Debug for SuperTwistingController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperTwistingController")
            .field("config", &self.config)
            .field("surface", &self.surface)
            .field("algorithm", &self.algorithm)
            .field("history_len", &self.history.len())
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

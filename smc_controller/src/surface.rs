//! Sliding-surface evaluators.
//!
//! The controller consumes any [`SlidingSurface`]; [`LinearSlidingSurface`]
//! is the standard surface for the double inverted pendulum.

use smc_common::consts::{
    STATE_DIM, THETA1_DOT_INDEX, THETA1_INDEX, THETA2_DOT_INDEX, THETA2_INDEX,
};
use smc_common::controller::error::ComputationError;
use smc_common::controller::gains::SurfaceGains;

/// Maps a plant state vector to a scalar sliding variable `s`.
pub trait SlidingSurface {
    /// Evaluate the surface.
    ///
    /// # Errors
    ///
    /// `ComputationError::StateDimension` when `state` is too short.
    fn compute(&self, state: &[f64]) -> Result<f64, ComputationError>;
}

/// `s = k1·(θ̇1 + lam1·θ1) + k2·(θ̇2 + lam2·θ2)` over `[x, θ1, θ2, ẋ, θ̇1, θ̇2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSlidingSurface {
    gains: SurfaceGains,
}

impl LinearSlidingSurface {
    pub fn new(gains: SurfaceGains) -> Self {
        Self { gains }
    }

    #[inline]
    pub fn gains(&self) -> &SurfaceGains {
        &self.gains
    }
}

impl SlidingSurface for LinearSlidingSurface {
    #[inline]
    fn compute(&self, state: &[f64]) -> Result<f64, ComputationError> {
        if state.len() < STATE_DIM {
            return Err(ComputationError::StateDimension {
                expected: STATE_DIM,
                got: state.len(),
            });
        }
        let g = &self.gains;
        let link1 = state[THETA1_DOT_INDEX] + g.lam1 * state[THETA1_INDEX];
        let link2 = state[THETA2_DOT_INDEX] + g.lam2 * state[THETA2_INDEX];
        Ok(g.k1 * link1 + g.k2 * link2)
    }
}

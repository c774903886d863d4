//! # Super-Twisting Sliding-Mode Controller
//!
//! Second-order sliding-mode control for a double inverted pendulum.
//! Provides finite-time convergence of the sliding surface with reduced
//! chattering, plus the orchestration around the control law: surface
//! evaluation, derivative estimation, damping, saturation, anti-windup and
//! stability/convergence diagnostics.
//!
//! ## Layers
//!
//! 1. **SuperTwistingAlgorithm**: control law and integral state
//! 2. **SlidingSurface**: pluggable surface evaluator
//! 3. **SuperTwistingController**: per-tick entry points and gain management
//!
//! ## Tick Boundary
//!
//! A control tick never fails outward. Internal errors roll the algorithm
//! state back and yield zero control with the `ERROR` flag set, so the
//! calling real-time loop stays alive and can switch to a fallback.

pub mod control;
pub mod controller;
pub mod surface;
pub mod validation;

pub use control::super_twisting::{AlgorithmState, SuperTwistingAlgorithm};
pub use controller::SuperTwistingController;
pub use surface::{LinearSlidingSurface, SlidingSurface};
pub use validation::validate_gain_rows;

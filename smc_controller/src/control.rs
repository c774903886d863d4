//! Control engine root.
//!
//! Super-Twisting algorithm with anti-windup integral state, plus offline
//! decay analysis of surface trajectories.

pub mod analysis;
pub mod super_twisting;

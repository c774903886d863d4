//! Super-Twisting controller shared types.
//!
//! Organized by concern: named gains, validated configuration, switching
//! strategies, error taxonomy, and per-tick output records.

pub mod error;
pub mod gains;
pub mod output;
pub mod params;
pub mod switching;

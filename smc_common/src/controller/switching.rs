//! Switching functions approximating `sign(s)` inside a boundary layer.
//!
//! Selected by a string key (`tanh`, `linear`, `sign`) in configuration files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Switching strategy applied to `s / boundary_layer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchMethod {
    /// Smooth `tanh(x)`.
    #[default]
    Tanh,
    /// Unit-clamped linear ramp `clamp(x, -1, 1)`.
    Linear,
    /// Discontinuous `sign(x)`, with `sign(0) = 0`.
    Sign,
}

impl SwitchMethod {
    /// All supported methods.
    pub const ALL: [Self; 3] = [Self::Tanh, Self::Linear, Self::Sign];

    /// Configuration key for this method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tanh => "tanh",
            Self::Linear => "linear",
            Self::Sign => "sign",
        }
    }

    /// Apply the raw switching function to an already scaled argument.
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Tanh => x.tanh(),
            Self::Linear => x.clamp(-1.0, 1.0),
            Self::Sign => sign(x),
        }
    }

    /// Evaluate `φ(surface / boundary_layer)`.
    ///
    /// A non-positive boundary layer degrades every method to `sign`.
    #[inline]
    pub fn evaluate(self, surface: f64, boundary_layer: f64) -> f64 {
        if boundary_layer <= 0.0 {
            return sign(surface);
        }
        match self {
            Self::Sign => sign(surface),
            _ => self.apply(surface / boundary_layer),
        }
    }
}

/// `sign(x)` with `sign(0) = 0`.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl fmt::Display for SwitchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwitchMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tanh" => Ok(Self::Tanh),
            "linear" => Ok(Self::Linear),
            "sign" => Ok(Self::Sign),
            _ => Err(ConfigurationError::UnknownSwitchMethod(s.to_string())),
        }
    }
}

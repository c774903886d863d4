//! Named gain types.
//!
//! A gain vector arrives as six reals `(K1, K2, k1, k2, lam1, lam2)` from
//! configuration files and the optimizer. It is split into validated named
//! fields once; nothing downstream indexes it positionally.

use serde::{Deserialize, Serialize};

use super::error::{ConfigurationError, GainUpdateError};
use crate::consts::GAIN_COUNT;

/// Super-Twisting gains `(K1, K2)`. Valid iff `K1 > K2 > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwistingGains {
    /// Continuous-term gain K1.
    pub k1: f64,
    /// Integral-term gain K2.
    pub k2: f64,
}

impl TwistingGains {
    /// Validated constructor used by runtime gain updates.
    pub fn new(k1: f64, k2: f64) -> Result<Self, GainUpdateError> {
        if !k1.is_finite() || !k2.is_finite() {
            return Err(GainUpdateError::NonFinite);
        }
        let gains = Self { k1, k2 };
        if !gains.is_stable() {
            return Err(GainUpdateError::StabilityViolation { k1, k2 });
        }
        Ok(gains)
    }

    /// `K1 > K2 > 0`.
    #[inline]
    pub fn is_stable(&self) -> bool {
        self.k2 > 0.0 && self.k1 > self.k2
    }

    /// `K1 / K2`, or `+inf` when `K2 ≤ 0`.
    #[inline]
    pub fn ratio(&self) -> f64 {
        if self.k2 > 0.0 {
            self.k1 / self.k2
        } else {
            f64::INFINITY
        }
    }

    /// Relative stability margin `(K1 - K2) / K2`, or `+inf` when `K2 ≤ 0`.
    #[inline]
    pub fn margin(&self) -> f64 {
        if self.k2 > 0.0 {
            (self.k1 - self.k2) / self.k2
        } else {
            f64::INFINITY
        }
    }

    /// As a `(K1, K2)` tuple.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.k1, self.k2)
    }
}

/// Sliding-surface gains. All four must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGains {
    /// Velocity weight of link 1.
    pub k1: f64,
    /// Velocity weight of link 2.
    pub k2: f64,
    /// Angle weight of link 1.
    pub lam1: f64,
    /// Angle weight of link 2.
    pub lam2: f64,
}

impl SurfaceGains {
    fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("k1", self.k1),
            ("k2", self.k2),
            ("lam1", self.lam1),
            ("lam2", self.lam2),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { field: name });
            }
            if value <= 0.0 {
                return Err(ConfigurationError::NonPositiveSurfaceGain { name, value });
            }
        }
        Ok(())
    }
}

/// Complete validated gain set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmcGains {
    pub twisting: TwistingGains,
    pub surface: SurfaceGains,
}

impl SmcGains {
    /// Split and validate a `(K1, K2, k1, k2, lam1, lam2)` vector.
    pub fn from_slice(gains: &[f64]) -> Result<Self, ConfigurationError> {
        let [big_k1, big_k2, k1, k2, lam1, lam2] = <[f64; GAIN_COUNT]>::try_from(gains)
            .map_err(|_| ConfigurationError::GainCount {
                expected: GAIN_COUNT,
                got: gains.len(),
            })?;

        if !big_k1.is_finite() {
            return Err(ConfigurationError::NonFinite { field: "K1" });
        }
        if !big_k2.is_finite() {
            return Err(ConfigurationError::NonFinite { field: "K2" });
        }
        let twisting = TwistingGains {
            k1: big_k1,
            k2: big_k2,
        };
        if !twisting.is_stable() {
            return Err(ConfigurationError::TwistingGainOrder {
                k1: big_k1,
                k2: big_k2,
            });
        }

        let surface = SurfaceGains { k1, k2, lam1, lam2 };
        surface.validate()?;

        Ok(Self { twisting, surface })
    }

    /// Back to the flat `(K1, K2, k1, k2, lam1, lam2)` layout used by the optimizer.
    pub fn to_array(&self) -> [f64; GAIN_COUNT] {
        [
            self.twisting.k1,
            self.twisting.k2,
            self.surface.k1,
            self.surface.k2,
            self.surface.lam1,
            self.surface.lam2,
        ]
    }
}

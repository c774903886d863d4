//! Validated Super-Twisting configuration.
//!
//! [`SuperTwistingParams`] is the raw serde form read from TOML.
//! [`SuperTwistingConfig`] is the validated, immutable bundle a controller
//! owns. The only ways to obtain one are [`SuperTwistingConfig::from_params`]
//! and [`SuperTwistingConfigBuilder::build`], both of which run the full
//! validation pass. Non-fatal findings are kept as [`ConfigAdvisory`] events.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ConfigurationError;
use super::gains::{SmcGains, TwistingGains};
use super::switching::SwitchMethod;
use crate::consts::{
    DEFAULT_ANTI_WINDUP_FRACTION, DEFAULT_BOUNDARY_LAYER, DEFAULT_POWER_EXPONENT,
    DEFAULT_REGULARIZATION, ENHANCED_STABILITY_RATIO,
};

// ─── Raw Parameters ─────────────────────────────────────────────────

/// Unvalidated controller parameters as they appear in a TOML file.
///
/// # TOML Example
///
/// ```toml
/// gains = [10.0, 5.0, 8.0, 3.0, 15.0, 2.0]
/// dt = 0.01
/// max_force = 100.0
/// switch_method = "tanh"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuperTwistingParams {
    /// `(K1, K2, k1, k2, lam1, lam2)`.
    pub gains: Vec<f64>,
    /// Control period [s].
    pub dt: f64,
    /// Actuator saturation limit [N].
    pub max_force: f64,
    /// Derivative damping gain (0 = disabled).
    #[serde(default)]
    pub damping_gain: f64,
    /// Integral clamp; derived from the twisting gains when absent.
    #[serde(default)]
    pub anti_windup_limit: Option<f64>,
    /// Fractional power α.
    #[serde(default = "default_power_exponent")]
    pub power_exponent: f64,
    /// Switching boundary-layer width.
    #[serde(default = "default_boundary_layer")]
    pub boundary_layer: f64,
    /// `tanh`, `linear` or `sign`.
    #[serde(default = "default_switch_method")]
    pub switch_method: String,
    /// Floor for `|s|` in the fractional-power term.
    #[serde(default = "default_regularization")]
    pub regularization: f64,
}

fn default_power_exponent() -> f64 {
    DEFAULT_POWER_EXPONENT
}
fn default_boundary_layer() -> f64 {
    DEFAULT_BOUNDARY_LAYER
}
fn default_switch_method() -> String {
    SwitchMethod::default().as_str().to_string()
}
fn default_regularization() -> f64 {
    DEFAULT_REGULARIZATION
}

impl SuperTwistingParams {
    /// Parameters with every optional field at its default.
    pub fn new(gains: &[f64], dt: f64, max_force: f64) -> Self {
        Self {
            gains: gains.to_vec(),
            dt,
            max_force,
            damping_gain: 0.0,
            anti_windup_limit: None,
            power_exponent: DEFAULT_POWER_EXPONENT,
            boundary_layer: DEFAULT_BOUNDARY_LAYER,
            switch_method: default_switch_method(),
            regularization: DEFAULT_REGULARIZATION,
        }
    }
}

// ─── Advisories ─────────────────────────────────────────────────────

/// Non-fatal finding recorded while building a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConfigAdvisory {
    /// α differs from the standard Super-Twisting exponent 0.5.
    NonStandardPowerExponent { value: f64 },
    /// `K1/K2` does not exceed the enhanced-stability ratio.
    NarrowStabilityMargin { ratio: f64 },
}

impl std::fmt::Display for ConfigAdvisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonStandardPowerExponent { value } => write!(
                f,
                "power_exponent {value} differs from the standard Super-Twisting value {DEFAULT_POWER_EXPONENT}"
            ),
            Self::NarrowStabilityMargin { ratio } => write!(
                f,
                "K1/K2 = {ratio:.3} does not exceed the enhanced stability ratio {ENHANCED_STABILITY_RATIO}"
            ),
        }
    }
}

/// Outcome of the gain stability check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    /// `K1 > K2 > 0`.
    pub stable: bool,
    /// `K1 / K2`.
    pub gain_ratio: f64,
    /// `(K1 - K2) / K2`.
    pub stability_margin: f64,
    /// Advisory: `K1 / K2 > 1.1`.
    pub enhanced_stability: bool,
}

impl StabilityReport {
    /// Evaluate a twisting gain pair.
    pub fn for_gains(gains: &TwistingGains) -> Self {
        let gain_ratio = gains.ratio();
        Self {
            stable: gains.is_stable(),
            gain_ratio,
            stability_margin: gains.margin(),
            enhanced_stability: gains.is_stable() && gain_ratio > ENHANCED_STABILITY_RATIO,
        }
    }
}

// ─── Validated Configuration ────────────────────────────────────────

/// Immutable, validated configuration owned by one controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperTwistingConfig {
    gains: SmcGains,
    dt: f64,
    max_force: f64,
    damping_gain: f64,
    anti_windup_limit: f64,
    anti_windup_derived: bool,
    power_exponent: f64,
    boundary_layer: f64,
    switch_method: SwitchMethod,
    regularization: f64,
    advisories: Vec<ConfigAdvisory>,
}

impl SuperTwistingConfig {
    /// Start a builder with the required parameters.
    pub fn builder(gains: &[f64], dt: f64, max_force: f64) -> SuperTwistingConfigBuilder {
        SuperTwistingConfigBuilder {
            params: SuperTwistingParams::new(gains, dt, max_force),
        }
    }

    /// Validate raw parameters.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found. No configuration is
    /// produced on failure.
    pub fn from_params(params: &SuperTwistingParams) -> Result<Self, ConfigurationError> {
        let gains = SmcGains::from_slice(&params.gains)?;

        let dt = positive("dt", params.dt)?;
        let max_force = positive("max_force", params.max_force)?;
        let boundary_layer = positive("boundary_layer", params.boundary_layer)?;
        let regularization = positive("regularization", params.regularization)?;

        let damping_gain = finite("damping_gain", params.damping_gain)?;
        if damping_gain < 0.0 {
            return Err(ConfigurationError::NegativeDamping(damping_gain));
        }

        let power_exponent = finite("power_exponent", params.power_exponent)?;
        if power_exponent <= 0.0 || power_exponent > 1.0 {
            return Err(ConfigurationError::PowerExponent(power_exponent));
        }

        let (anti_windup_limit, anti_windup_derived) = match params.anti_windup_limit {
            Some(limit) => (positive("anti_windup_limit", limit)?, false),
            None => (
                DEFAULT_ANTI_WINDUP_FRACTION * (gains.twisting.k1 + gains.twisting.k2),
                true,
            ),
        };

        let switch_method: SwitchMethod = params.switch_method.parse()?;

        let mut advisories = Vec::new();
        if power_exponent != DEFAULT_POWER_EXPONENT {
            advisories.push(ConfigAdvisory::NonStandardPowerExponent {
                value: power_exponent,
            });
        }
        let ratio = gains.twisting.ratio();
        if ratio <= ENHANCED_STABILITY_RATIO {
            advisories.push(ConfigAdvisory::NarrowStabilityMargin { ratio });
        }
        for advisory in &advisories {
            warn!("Super-Twisting config: {advisory}");
        }

        Ok(Self {
            gains,
            dt,
            max_force,
            damping_gain,
            anti_windup_limit,
            anti_windup_derived,
            power_exponent,
            boundary_layer,
            switch_method,
            regularization,
            advisories,
        })
    }

    /// Gain stability report. Advisory only; never blocks.
    pub fn check_stability_conditions(&self) -> StabilityReport {
        StabilityReport::for_gains(&self.gains.twisting)
    }

    /// Back to the raw serde form.
    pub fn to_params(&self) -> SuperTwistingParams {
        SuperTwistingParams {
            gains: self.gains.to_array().to_vec(),
            dt: self.dt,
            max_force: self.max_force,
            damping_gain: self.damping_gain,
            anti_windup_limit: (!self.anti_windup_derived).then_some(self.anti_windup_limit),
            power_exponent: self.power_exponent,
            boundary_layer: self.boundary_layer,
            switch_method: self.switch_method.as_str().to_string(),
            regularization: self.regularization,
        }
    }

    /// Full gain set `(K1, K2, k1, k2, lam1, lam2)`.
    #[inline]
    pub fn gains(&self) -> &SmcGains {
        &self.gains
    }
    /// Control period [s].
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }
    /// Actuator force limit [N].
    #[inline]
    pub fn max_force(&self) -> f64 {
        self.max_force
    }
    /// Damping gain on the surface rate `ṡ` (0 disables damping).
    #[inline]
    pub fn damping_gain(&self) -> f64 {
        self.damping_gain
    }
    /// Resolved anti-windup limit (explicit or derived).
    #[inline]
    pub fn anti_windup_limit(&self) -> f64 {
        self.anti_windup_limit
    }
    /// True when the limit was derived as `0.1·(K1 + K2)`.
    #[inline]
    pub fn anti_windup_derived(&self) -> bool {
        self.anti_windup_derived
    }
    /// Continuous-term exponent α in `(0, 1]`.
    #[inline]
    pub fn power_exponent(&self) -> f64 {
        self.power_exponent
    }
    /// Switching boundary-layer width (surface units).
    #[inline]
    pub fn boundary_layer(&self) -> f64 {
        self.boundary_layer
    }
    /// Switching function applied to `s / boundary_layer`.
    #[inline]
    pub fn switch_method(&self) -> SwitchMethod {
        self.switch_method
    }
    /// Floor ε substituted for `|s|` near the surface origin.
    #[inline]
    pub fn regularization(&self) -> f64 {
        self.regularization
    }
    /// Non-fatal findings recorded at construction.
    #[inline]
    pub fn advisories(&self) -> &[ConfigAdvisory] {
        &self.advisories
    }
}

impl TryFrom<SuperTwistingParams> for SuperTwistingConfig {
    type Error = ConfigurationError;

    fn try_from(params: SuperTwistingParams) -> Result<Self, Self::Error> {
        Self::from_params(&params)
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::NonPositive { field, value })
    }
}

// ─── Builder ────────────────────────────────────────────────────────

/// Builder for [`SuperTwistingConfig`]. Validation runs in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SuperTwistingConfigBuilder {
    params: SuperTwistingParams,
}

impl SuperTwistingConfigBuilder {
    pub fn damping_gain(mut self, value: f64) -> Self {
        self.params.damping_gain = value;
        self
    }

    pub fn anti_windup_limit(mut self, value: f64) -> Self {
        self.params.anti_windup_limit = Some(value);
        self
    }

    pub fn power_exponent(mut self, value: f64) -> Self {
        self.params.power_exponent = value;
        self
    }

    pub fn boundary_layer(mut self, value: f64) -> Self {
        self.params.boundary_layer = value;
        self
    }

    pub fn switch_method(mut self, method: SwitchMethod) -> Self {
        self.params.switch_method = method.as_str().to_string();
        self
    }

    pub fn regularization(mut self, value: f64) -> Self {
        self.params.regularization = value;
        self
    }

    /// Validate and produce the immutable configuration.
    pub fn build(self) -> Result<SuperTwistingConfig, ConfigurationError> {
        SuperTwistingConfig::from_params(&self.params)
    }
}

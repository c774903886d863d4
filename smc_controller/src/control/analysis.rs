//! Offline decay analysis of sliding-surface trajectories.
//!
//! Not on the control-critical path. Used by tests and tuning tools to
//! judge how fast `|s|` decays under a given gain set.

use smc_common::consts::CONVERGENCE_THRESHOLD;

/// Floor applied to `|s|` before taking logarithms.
const LOG_FLOOR: f64 = 1e-12;

/// Least-squares slope of `ln|s_i|` against the sample index `i`, negated.
///
/// Positive for a decaying trajectory. Returns 0 for fewer than two samples.
pub fn log_linear_decay_rate(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = samples
        .iter()
        .map(|s| s.abs().max(LOG_FLOOR).ln())
        .sum::<f64>()
        / n_f;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, s) in samples.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = s.abs().max(LOG_FLOOR).ln() - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
    }

    if sxx > 0.0 { -sxy / sxx } else { 0.0 }
}

/// Index of the first sample with `|s| < CONVERGENCE_THRESHOLD`.
pub fn first_converged_index(samples: &[f64]) -> Option<usize> {
    samples.iter().position(|s| s.abs() < CONVERGENCE_THRESHOLD)
}

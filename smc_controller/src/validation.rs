//! Batch feasibility check of candidate gain vectors.
//!
//! Consumed by gain-search optimizers that evaluate a population of
//! candidates per iteration. Rows are `(K1, K2)` or the full
//! `(K1, K2, k1, k2, lam1, lam2)` vector.

use smc_common::consts::{GAIN_COUNT, TWISTING_GAIN_COUNT};

/// Feasibility of a single candidate row.
///
/// - fewer than two entries, or any non-finite entry → infeasible
/// - `K1 > 0 ∧ K2 > 0 ∧ K1 > K2`
/// - with all six gains present, `k1, k2, lam1, lam2 > 0` as well
pub fn is_feasible_row(row: &[f64]) -> bool {
    if row.len() < TWISTING_GAIN_COUNT || row.iter().any(|g| !g.is_finite()) {
        return false;
    }
    let (k1, k2) = (row[0], row[1]);
    if !(k1 > 0.0 && k2 > 0.0 && k1 > k2) {
        return false;
    }
    if row.len() >= GAIN_COUNT {
        return row[TWISTING_GAIN_COUNT..GAIN_COUNT].iter().all(|g| *g > 0.0);
    }
    true
}

/// Feasibility mask over a batch of candidate rows.
pub fn validate_gain_rows<I, R>(rows: I) -> Vec<bool>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[f64]>,
{
    rows.into_iter().map(|r| is_feasible_row(r.as_ref())).collect()
}

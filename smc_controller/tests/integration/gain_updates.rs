//! Runtime gain reconfiguration between ticks.

use smc_common::controller::error::GainUpdateError;
use smc_common::controller::params::SuperTwistingConfig;
use smc_controller::SuperTwistingController;

const GAINS: [f64; 6] = [10.0, 5.0, 8.0, 3.0, 15.0, 2.0];

fn controller() -> SuperTwistingController {
    SuperTwistingController::new(
        SuperTwistingConfig::builder(&GAINS, 0.01, 100.0)
            .build()
            .unwrap(),
    )
}

#[test]
fn violating_update_leaves_controller_untouched() {
    let mut c = controller();
    let state = [0.0, 0.05, -0.02, 0.0, 0.3, 0.1];
    for _ in 0..20 {
        c.compute_control(&state);
    }
    let gains_before = c.twisting_gains();
    let state_before = *c.algorithm().state();
    let params_before = c.parameters();

    assert_eq!(
        c.set_twisting_gains(5.0, 10.0),
        Err(GainUpdateError::StabilityViolation { k1: 5.0, k2: 10.0 })
    );
    assert_eq!(c.set_twisting_gains(f64::NAN, 1.0), Err(GainUpdateError::NonFinite));

    assert_eq!(c.twisting_gains(), gains_before);
    assert_eq!(*c.algorithm().state(), state_before);
    assert_eq!(c.parameters(), params_before);
}

#[test]
fn accepted_update_changes_next_tick() {
    let state = [0.0, 0.05, 0.0, 0.0, 0.0, 0.0];

    let mut base = controller();
    let before = base.compute_control(&state);

    let mut tuned = controller();
    tuned.set_twisting_gains(20.0, 5.0).unwrap();
    let after = tuned.compute_control(&state);

    // Only the continuous term scales with K1.
    assert!((after.u1 - 2.0 * before.u1).abs() < 1e-9);
    assert!((after.u2 - before.u2).abs() < 1e-12);
    assert!((after.gain_ratio - 4.0).abs() < 1e-12);
}

#[test]
fn stability_analysis_follows_active_gains() {
    let mut c = controller();
    assert!(c.stability_analysis().enhanced_stability);
    c.tune_gains(Some(5.2), None).unwrap();
    let analysis = c.stability_analysis();
    assert!(analysis.stable);
    assert!(!analysis.enhanced_stability);
    assert!((analysis.stability_margin - 0.04).abs() < 1e-9);
}

#[test]
fn reset_keeps_tuned_gains() {
    let mut c = controller();
    c.set_twisting_gains(30.0, 12.0).unwrap();
    c.compute_control(&[0.0, 0.1, 0.0, 0.0, 0.0, 0.0]);
    c.reset();
    assert_eq!(c.twisting_gains(), (30.0, 12.0));
    assert_eq!(c.history_len(), 0);
}

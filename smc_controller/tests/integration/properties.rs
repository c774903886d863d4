//! Guaranteed controller properties on the double-inverted-pendulum surface.

use smc_common::controller::params::SuperTwistingConfig;
use smc_common::controller::switching::SwitchMethod;
use smc_controller::{SuperTwistingAlgorithm, SuperTwistingController};

const GAINS: [f64; 6] = [10.0, 5.0, 8.0, 3.0, 15.0, 2.0];

fn reference_controller() -> SuperTwistingController {
    SuperTwistingController::new(
        SuperTwistingConfig::builder(&GAINS, 0.01, 100.0)
            .build()
            .unwrap(),
    )
}

/// Deterministic sweep over the state space.
fn state_grid() -> Vec<[f64; 6]> {
    let angles = [-1.5, -0.3, -0.01, 0.0, 0.01, 0.3, 1.5];
    let rates = [-20.0, -1.0, 0.0, 1.0, 20.0];
    let mut grid = Vec::new();
    for &t1 in &angles {
        for &t2 in &angles {
            for &w1 in &rates {
                for &w2 in &rates {
                    grid.push([0.3, t1, t2, -0.2, w1, w2]);
                }
            }
        }
    }
    grid
}

#[test]
fn invalid_gain_tuples_never_build() {
    let twisting = [(5.0, 10.0), (5.0, 5.0), (0.0, -1.0), (10.0, 0.0), (-2.0, -5.0)];
    for (k1, k2) in twisting {
        let gains = [k1, k2, 8.0, 3.0, 15.0, 2.0];
        assert!(
            SuperTwistingConfig::builder(&gains, 0.01, 100.0).build().is_err(),
            "K1={k1}, K2={k2} accepted"
        );
    }
    for idx in 2..6 {
        for bad in [0.0, -1.0] {
            let mut gains = GAINS;
            gains[idx] = bad;
            assert!(SuperTwistingConfig::builder(&gains, 0.01, 100.0).build().is_err());
        }
    }
}

#[test]
fn near_equilibrium_bound() {
    let mut c = reference_controller();
    let r = c.compute_control(&[0.0; 6]);
    assert!(r.u.abs() < 1.0, "u = {}", r.u);
}

#[test]
fn output_never_exceeds_max_force() {
    let mut c = reference_controller();
    for state in state_grid() {
        let r = c.compute_control(&state);
        assert!(!r.is_error());
        assert!(r.u.abs() <= 100.0, "u = {} at {state:?}", r.u);
        let v = c.compute_control_vector(&state);
        assert!(v[0].abs() <= 100.0);
    }
}

#[test]
fn integral_state_bounded_by_anti_windup_limit() {
    let config = SuperTwistingConfig::builder(&GAINS, 0.01, 100.0)
        .anti_windup_limit(0.75)
        .switch_method(SwitchMethod::Sign)
        .build()
        .unwrap();
    let mut alg = SuperTwistingAlgorithm::from_config(&config);
    for _ in 0..5000 {
        let c = alg
            .compute_control(3.0, 0.01, SwitchMethod::Sign, 0.01)
            .unwrap();
        assert!(c.integral_state.abs() <= 0.75 + 1e-12);
    }
    assert!((alg.state().integral_state() - 0.75).abs() < 1e-9);

    for _ in 0..5000 {
        alg.compute_control(-3.0, 0.01, SwitchMethod::Sign, 0.01)
            .unwrap();
    }
    assert!((alg.state().integral_state() + 0.75).abs() < 1e-9);
}

#[test]
fn reset_twice_gives_zero_state() {
    let mut c = reference_controller();
    for state in state_grid().into_iter().take(40) {
        c.compute_control(&state);
    }
    c.reset();
    let first = *c.algorithm().state();
    c.reset();
    let second = *c.algorithm().state();
    assert_eq!(first, second);
    assert_eq!(second.integral_state(), 0.0);
    assert_eq!(second.previous_surface(), 0.0);
}

#[test]
fn validation_mask() {
    let c = reference_controller();
    let mask = c.validate_gains(&[
        [10.0, 5.0, 8.0, 3.0, 15.0, 2.0],
        [5.0, 10.0, 8.0, 3.0, 15.0, 2.0],
    ]);
    assert_eq!(mask, vec![true, false]);
}

#[test]
fn convergence_estimate_monotonic_in_k2() {
    let mut c = SuperTwistingController::new(
        SuperTwistingConfig::builder(&[50.0, 1.0, 8.0, 3.0, 15.0, 2.0], 0.01, 100.0)
            .build()
            .unwrap(),
    );
    let mut prev = c.convergence_estimate(0.7);
    for k2 in [2.0, 5.0, 10.0, 20.0, 40.0] {
        c.set_twisting_gains(50.0, k2).unwrap();
        let t = c.convergence_estimate(0.7);
        assert!(t < prev, "K2={k2}: {t} !< {prev}");
        prev = t;
    }
}

#[test]
fn continuous_term_bounded_approaching_surface() {
    for method in [SwitchMethod::Tanh, SwitchMethod::Linear, SwitchMethod::Sign] {
        let config = SuperTwistingConfig::builder(&GAINS, 0.01, 100.0)
            .switch_method(method)
            .build()
            .unwrap();
        let mut alg = SuperTwistingAlgorithm::from_config(&config);
        let mut s: f64 = 1.0;
        while s > 1e-14 {
            for signed in [s, -s] {
                alg.reset_state();
                let c = alg.compute_control(signed, 0.01, method, 0.01).unwrap();
                assert!(c.u1.is_finite());
                assert!(c.u1.abs() <= 10.0 * s.max(1e-10).sqrt() + 1e-12);
            }
            s /= 10.0;
        }
    }
}

#[test]
fn independent_controllers_on_separate_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let mut c = reference_controller();
                let state = [0.0, 0.01 * i as f64, 0.0, 0.0, 0.0, 0.0];
                (0..100).map(|_| c.compute_control(&state).u).last().unwrap()
            })
        })
        .collect();
    let outputs: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let mut serial = reference_controller();
    let state = [0.0, 0.01 * 3.0, 0.0, 0.0, 0.0, 0.0];
    let expected = (0..100).map(|_| serial.compute_control(&state).u).last().unwrap();
    assert_eq!(outputs[3], expected);
}

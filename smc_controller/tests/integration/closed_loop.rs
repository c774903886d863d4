//! Closed-loop convergence on a simulated sliding-variable plant.
//!
//! The plant is the surface dynamics itself, `ṡ = u + d(t)`, with a smooth
//! bounded disturbance. The state vector carries `s` in slot 0, so the test
//! surface is the identity on that slot.

use smc_common::controller::error::ComputationError;
use smc_common::controller::output::ControlFlags;
use smc_common::controller::params::SuperTwistingConfig;
use smc_common::controller::switching::SwitchMethod;
use smc_controller::{SlidingSurface, SuperTwistingController};

#[derive(Debug, Clone, Copy)]
struct SurfaceState;

impl SlidingSurface for SurfaceState {
    fn compute(&self, state: &[f64]) -> Result<f64, ComputationError> {
        state
            .first()
            .copied()
            .ok_or(ComputationError::StateDimension {
                expected: 1,
                got: 0,
            })
    }
}

const DT: f64 = 0.001;
const GAINS: [f64; 6] = [10.0, 5.0, 8.0, 3.0, 15.0, 2.0];

fn disturbance(t: f64) -> f64 {
    0.5 * (2.0 * t).sin()
}

fn controller(method: SwitchMethod) -> SuperTwistingController<SurfaceState> {
    let config = SuperTwistingConfig::builder(&GAINS, DT, 50.0)
        .switch_method(method)
        .boundary_layer(0.01)
        .build()
        .unwrap();
    SuperTwistingController::with_surface(config, SurfaceState)
}

/// Run `cycles` ticks from `s0`, returning the surface trajectory.
fn run(c: &mut SuperTwistingController<SurfaceState>, s0: f64, cycles: usize) -> Vec<f64> {
    let mut s = s0;
    let mut trajectory = Vec::with_capacity(cycles);
    for k in 0..cycles {
        trajectory.push(s);
        let r = c.compute_control(&[s]);
        assert!(!r.is_error(), "tick {k} failed: {:?}", r.error);
        s += (r.u + disturbance(k as f64 * DT)) * DT;
    }
    trajectory
}

#[test]
fn surface_reaches_boundary_layer_in_finite_time() {
    let mut c = controller(SwitchMethod::Tanh);
    let trajectory = run(&mut c, 1.0, 4000);

    let reached = trajectory
        .iter()
        .position(|s| s.abs() < 0.01)
        .expect("surface never reached the boundary layer");
    assert!((reached as f64) * DT < 1.0, "reached after {} s", reached as f64 * DT);

    let tail_max = trajectory[2000..].iter().fold(0.0_f64, |m, s| m.max(s.abs()));
    assert!(tail_max < 0.05, "residual |s| = {tail_max}");
}

#[test]
fn surface_converges_for_every_switch_method() {
    for method in [SwitchMethod::Tanh, SwitchMethod::Linear, SwitchMethod::Sign] {
        let mut c = controller(method);
        let trajectory = run(&mut c, -0.8, 3000);
        let last = trajectory.last().copied().unwrap();
        assert!(last.abs() < 0.05, "{method}: final |s| = {}", last.abs());
    }
}

#[test]
fn integral_term_compensates_disturbance() {
    let mut c = controller(SwitchMethod::Tanh);
    let mut s = 0.0;
    let mut max_err = 0.0_f64;
    for k in 0..6000 {
        let t = k as f64 * DT;
        let r = c.compute_control(&[s]);
        if k > 3000 {
            // u2 should track -d(t) once sliding.
            max_err = max_err.max((r.u2 + disturbance(t)).abs());
        }
        s += (r.u + disturbance(t)) * DT;
    }
    assert!(max_err < 0.5, "u2 tracking error {max_err}");
}

#[test]
fn performance_analysis_of_closed_loop_run() {
    let mut c = controller(SwitchMethod::Tanh);
    let trajectory = run(&mut c, 1.0, 1500);
    let report = c.algorithm().analyze_performance(&trajectory).unwrap();
    assert!(report.converged());
    assert!(report.convergence_rate > 0.0);
    assert!((report.stability_margin - 1.0).abs() < 1e-12);
    assert!(report.final_surface < 0.05);
}

#[test]
fn lyapunov_value_drops_along_trajectory() {
    let mut c = controller(SwitchMethod::Tanh);
    let first = c.compute_control(&[1.0]).lyapunov;
    let mut s = 1.0;
    let mut last = first;
    for k in 0..1000 {
        let r = c.compute_control(&[s]);
        last = r.lyapunov;
        s += (r.u + disturbance(k as f64 * DT)) * DT;
    }
    assert!(last < 0.1 * first, "V: {first} → {last}");
}

#[test]
fn anti_windup_engages_under_persistent_error() {
    let config = SuperTwistingConfig::builder(&GAINS, DT, 1.0)
        .anti_windup_limit(0.2)
        .switch_method(SwitchMethod::Sign)
        .build()
        .unwrap();
    let mut c = SuperTwistingController::with_surface(config, SurfaceState);

    let mut last = None;
    for _ in 0..2000 {
        let r = c.compute_control(&[0.5]);
        assert!(r.integral_state.abs() <= 0.2 + 1e-12);
        last = Some(r);
    }
    let r = last.unwrap();
    assert!((r.integral_state - 0.2).abs() < 1e-12);
    assert!(r.flags.contains(ControlFlags::ANTI_WINDUP_ACTIVE | ControlFlags::SATURATED));
}

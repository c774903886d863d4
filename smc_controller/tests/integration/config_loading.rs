//! Controller construction from TOML configuration files.

use std::fs;

use smc_common::config::{ConfigError, load_config};
use smc_common::controller::error::ConfigurationError;
use smc_common::controller::params::ConfigAdvisory;
use smc_common::controller::switching::SwitchMethod;
use smc_controller::SuperTwistingController;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("sta.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn controller_from_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
gains = [10.0, 5.0, 8.0, 3.0, 15.0, 2.0]
dt = 0.01
max_force = 100.0
damping_gain = 0.1
anti_windup_limit = 2.0
boundary_layer = 0.05
switch_method = "sign"
"#,
    );

    let config = load_config(&path).unwrap();
    let mut c = SuperTwistingController::new(config);
    let params = c.parameters();
    assert_eq!(params.switch_method, SwitchMethod::Sign);
    assert_eq!(params.anti_windup_limit, 2.0);
    assert_eq!(params.damping_gain, 0.1);

    let r = c.compute_control(&[0.0; 6]);
    assert!(!r.is_error());
    assert!(r.u.abs() < 1.0);
}

#[test]
fn non_standard_exponent_loads_with_advisory() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
gains = [10.0, 5.0, 8.0, 3.0, 15.0, 2.0]
dt = 0.01
max_force = 100.0
power_exponent = 0.6
"#,
    );
    let config = load_config(&path).unwrap();
    assert_eq!(
        config.advisories(),
        &[ConfigAdvisory::NonStandardPowerExponent { value: 0.6 }]
    );
    let c = SuperTwistingController::new(config);
    assert!(!c.stability_analysis().standard_exponent);
}

#[test]
fn invalid_file_builds_no_controller() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
gains = [10.0, 5.0, 8.0]
dt = 0.01
max_force = 100.0
"#,
    );
    match load_config(&path) {
        Err(ConfigError::ValidationError(ConfigurationError::GainCount { expected, got })) => {
            assert_eq!((expected, got), (6, 3));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_switch_method_in_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
gains = [10.0, 5.0, 8.0, 3.0, 15.0, 2.0]
dt = 0.01
max_force = 100.0
switch_method = "sat"
"#,
    );
    assert!(matches!(
        load_config(&path),
        Err(ConfigError::ValidationError(ConfigurationError::UnknownSwitchMethod(_)))
    ));
}

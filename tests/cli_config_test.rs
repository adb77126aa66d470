//! Integration tests for configuration resolution through the CLI.
//!
//! `tb config show` prints every resolved value and where it came from.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_config_show_defaults() {
    let env = TestEnv::new();
    env.tb()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\":{\"value\":3000,\"source\":\"default\"}"))
        .stdout(predicate::str::contains("\"host\":{\"value\":\"127.0.0.1\",\"source\":\"default\"}"))
        .stdout(predicate::str::contains("\"source\":\"env:TB_DATA_DIR\""));
}

#[test]
fn test_config_file_values() {
    let env = TestEnv::new();
    env.write("taskboard.kdl", "port 8081\nmode \"minimal\"\n");
    env.tb()
        .args(["config", "show", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port:           8081 (config)"))
        .stdout(predicate::str::contains("mode:           minimal (config)"))
        .stdout(predicate::str::contains("users-file:     db.json"));
}

#[test]
fn test_env_beats_config_file() {
    let env = TestEnv::new();
    env.write("taskboard.kdl", "port 8081\n");
    env.tb()
        .env("TB_PORT", "9090")
        .args(["config", "show", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port:           9090 (env:TB_PORT)"));
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let env = TestEnv::new();
    env.write("taskboard.kdl", "mode \"gigantic\"\n");
    env.tb()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let env = TestEnv::new();
    env.tb()
        .args(["config", "show", "--config", "nope.kdl", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_bad_port_env_is_an_error() {
    let env = TestEnv::new();
    env.tb()
        .env("TB_PORT", "not-a-port")
        .args(["config", "show"])
        .assert()
        .failure();
}

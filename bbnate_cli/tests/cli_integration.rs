use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid config; every section but [pins] falls back to defaults.
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[pins]
transducer = 2
green_led = 3
yellow_led = 11
red_led = 12
keypad_channel = 0
echo_channel = 1

[ping]
pulse_ms = 1
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["measure", "--echo-raw", "120"], 0, "Baby's BMD: 0.59", "stdout")]
#[case(&["measure", "--echo-raw", "0"], 0, "Baby's BMD: n/a", "stdout")]
#[case(&["measure", "--echo-raw", "0"], 0, "red=on", "stdout")]
#[case(&["measure", "--echo-raw", "1023"], 0, "outcome=above_max", "stdout")]
#[case(&["classify", "--energy", "12"], 0, "bmd=0.85 outcome=estimate", "stdout")]
#[case(&["classify", "--energy", "-1"], 0, "bmd=0.00 outcome=below_min", "stdout")]
#[case(&["run", "--echo-raw", "120", "--cycles", "3"], 0, "cycle 3: energy=", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["classify"], 2, "required", "stderr")]
#[case(&["measure", "--echo-raw", "5000"], 1, "--echo-raw 5000", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("bbnate").unwrap();
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn completed_cycle_leaves_clear_prompt_and_red_off() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("bbnate").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .args(["run", "--echo-raw", "0", "--cycles", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("|Press \"CLEAR\"   |"))
        .stdout(predicate::str::contains("red=off"))
        .stdout(predicate::str::contains("outcome=below_min"));
}

#[test]
fn cli_reports_shared_pins_as_invalid_config() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bad.toml");
    fs::write(
        &cfg,
        "[pins]\ntransducer = 2\ngreen_led = 2\nyellow_led = 11\nred_led = 12\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bbnate").unwrap();
    cmd.arg("--config").arg(&cfg).arg("self-check");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration is invalid"))
        .stderr(predicate::str::contains("share pin 2"));
}

#[test]
fn cli_reports_unparseable_config() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "[pins\ntransducer = ").unwrap();

    let mut cmd = Command::cargo_bin("bbnate").unwrap();
    cmd.arg("--config").arg(&cfg).arg("self-check");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn cli_reports_missing_config_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let mut cmd = Command::cargo_bin("bbnate").unwrap();
    cmd.arg("--config").arg(&missing).args(["classify", "--energy", "5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not be read"));
}

#[test]
fn custom_thresholds_from_config_are_used() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bands.toml");
    fs::write(
        &cfg,
        r#"
[pins]
transducer = 2
green_led = 3
yellow_led = 11
red_led = 12

[bmd]
max = 40.0
mid1 = 30.0
mid2 = 20.0
min = 10.0
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bbnate").unwrap();
    cmd.arg("--config").arg(&cfg).args(["classify", "--energy", "40"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bmd=1.00 outcome=estimate"));
}

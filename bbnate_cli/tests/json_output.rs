use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[pins]
transducer = 2
green_led = 3
yellow_led = 11
red_led = 12
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn run_json(args: &[&str]) -> std::process::Output {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    Command::cargo_bin("bbnate")
        .unwrap()
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .args(args)
        .output()
        .unwrap()
}

fn json_lines(bytes: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(bytes)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad json {l:?}: {e}")))
        .collect()
}

#[test]
fn measure_json_schema() {
    let out = run_json(&["measure", "--echo-raw", "120"]);
    assert!(out.status.success());

    let lines = json_lines(&out.stdout);
    assert_eq!(lines.len(), 1);
    let v = &lines[0];
    assert_eq!(v["outcome"], "estimate");
    assert_eq!(v["display"], "0.59");
    assert!(v["energy"].as_f64().unwrap() > 11.0);
    assert_eq!(v["series"].as_array().unwrap().len(), 20);
    assert_eq!(v["lcd"][0], "Baby's BMD: 0.59");
    assert_eq!(v["leds"]["green"], true);
    assert_eq!(v["leds"]["yellow"], false);
    assert_eq!(v["leds"]["red"], false);
}

#[test]
fn sentinel_result_lights_red_in_json() {
    let out = run_json(&["measure", "--echo-raw", "0"]);
    assert!(out.status.success());
    let v = &json_lines(&out.stdout)[0];
    assert_eq!(v["outcome"], "below_min");
    assert_eq!(v["bmd"], 0.0);
    assert_eq!(v["leds"]["red"], true);
}

#[test]
fn run_json_emits_one_line_per_cycle() {
    let out = run_json(&["run", "--echo-raw", "120", "--cycles", "2"]);
    assert!(out.status.success());
    let lines = json_lines(&out.stdout);
    assert_eq!(lines.len(), 2);
    for (i, v) in lines.iter().enumerate() {
        assert_eq!(v["cycle"], i as u64 + 1);
        assert_eq!(v["outcome"], "estimate");
    }
}

#[rstest]
#[case("17", "estimate", "1.00")]
#[case("17.5", "above_max", "0.00")]
#[case("2.5", "below_min", "0.00")]
fn classify_json(#[case] energy: &str, #[case] outcome: &str, #[case] display: &str) {
    let out = run_json(&["classify", "--energy", energy]);
    assert!(out.status.success());
    let v = &json_lines(&out.stdout)[0];
    assert_eq!(v["outcome"], outcome);
    assert_eq!(v["display"], display);
}

#[test]
fn errors_are_single_json_objects_on_stderr() {
    let out = run_json(&["measure", "--echo-raw", "4096"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());

    let err = String::from_utf8_lossy(&out.stderr);
    let line = err
        .lines()
        .find(|l| l.contains("\"reason\""))
        .expect("json error line");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Error");
    assert!(v["message"].as_str().unwrap().contains("--echo-raw 4096"));
}

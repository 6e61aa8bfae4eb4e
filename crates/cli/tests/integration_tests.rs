//! Integration tests for panelctl
//!
//! Every command runs against the in-memory mock panels, so no hardware is
//! needed. Exit codes are checked for the failure paths.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Custom predicate to check if output is valid JSON
fn is_json() -> impl predicates::Predicate<[u8]> {
    predicates::function::function(|s: &[u8]| {
        std::str::from_utf8(s)
            .map(|text| serde_json::from_str::<Value>(text).is_ok())
            .unwrap_or(false)
    })
}

/// A panelctl command wired to the mock panels
fn panelctl() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("panelctl")?;
    cmd.arg("--mock");
    Ok(cmd)
}

fn json_stdout(cmd: &mut Command) -> Result<Value, Box<dyn std::error::Error>> {
    let output = cmd.output()?;
    assert!(output.status.success(), "command failed: {output:?}");
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn test_help_lists_commands() -> TestResult {
    Command::cargo_bin("panelctl")?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("radio"))
        .stdout(predicate::str::contains("fip"))
        .stdout(predicate::str::contains("watch"));
    Ok(())
}

#[test]
fn test_list_mock_panels_json() -> TestResult {
    panelctl()?
        .args(["--json", "list"])
        .assert()
        .success()
        .stdout(is_json());

    let body = json_stdout(panelctl()?.args(["--json", "list"]))?;
    assert_eq!(body["success"], true);
    assert_eq!(body["devices"].as_array().map(Vec::len), Some(4));
    Ok(())
}

#[test]
fn test_status_connects_every_panel() -> TestResult {
    let body = json_stdout(panelctl()?.args(["--json", "status"]))?;
    let panels = body["status"]["panels"].as_array().ok_or("no panels")?;
    assert_eq!(panels.len(), 4);
    assert!(panels.iter().all(|p| p["connected"] == true && p["mock"] == true));
    Ok(())
}

#[test]
fn test_radio_display_json() -> TestResult {
    let body = json_stdout(panelctl()?.args([
        "--json", "radio", "--com1a", "118.00", "--com1s", "118.50",
    ]))?;
    assert_eq!(body["success"], true);
    assert_eq!(body["panel"], "Radio");
    assert_eq!(body["display"]["com1Active"], "118.00");
    assert_eq!(body["display"]["com1Standby"], "118.50");
    Ok(())
}

#[test]
fn test_radio_human_output() -> TestResult {
    panelctl()?
        .args(["radio", "--com1a", "118.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COM1 118.00"));
    Ok(())
}

#[test]
fn test_multi_with_leds() -> TestResult {
    let body = json_stdout(panelctl()?.args([
        "--json", "multi", "--top", "250", "--bottom", "3000", "--leds", "AP,HDG",
    ]))?;
    assert_eq!(body["display"]["topRow"], "250");
    Ok(())
}

#[test]
fn test_multi_unknown_led_is_a_validation_error() -> TestResult {
    panelctl()?
        .args(["multi", "--leds", "AP,GEAR"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown LED"));
    Ok(())
}

#[test]
fn test_switch_gear_down() -> TestResult {
    let body = json_stdout(panelctl()?.args(["--json", "switch", "--gear", "down"]))?;
    assert_eq!(body["lights"]["greenN"], true);
    assert_eq!(body["lights"]["redN"], false);
    Ok(())
}

#[test]
fn test_fip_pattern_is_sent() -> TestResult {
    let body = json_stdout(panelctl()?.args(["--json", "fip", "--pattern", "bars"]))?;
    assert_eq!(body["content"]["source"], "pattern");
    Ok(())
}

#[test]
fn test_fip_rejects_unsupported_image() -> TestResult {
    panelctl()?
        .args(["--json", "fip", "--image", "missing.bmp"])
        .assert()
        .code(4)
        .stdout(is_json())
        .stdout(predicate::str::contains("\"success\": false"));
    Ok(())
}

#[test]
fn test_fip_generate_writes_test_images() -> TestResult {
    let dir = TempDir::new()?;
    panelctl()?
        .args(["fip", "--generate"])
        .arg(dir.path())
        .assert()
        .success();

    let pngs = std::fs::read_dir(dir.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "png"))
        .count();
    assert_eq!(pngs, 4);
    Ok(())
}

#[test]
fn test_fip_save_and_info_round_trip() -> TestResult {
    let dir = TempDir::new()?;
    let saved = dir.path().join("gradient.png");
    panelctl()?
        .args(["fip", "--pattern", "gradient", "--save"])
        .arg(&saved)
        .assert()
        .success();
    assert!(saved.is_file());

    let mut info = panelctl()?;
    info.args(["--json", "fip", "--info", "--image"]).arg(&saved);
    let body = json_stdout(&mut info)?;
    assert_eq!(body["image"]["width"], 320);
    assert_eq!(body["image"]["needs_resize"], false);
    Ok(())
}

#[test]
fn test_fip_save_rejects_unknown_extension() -> TestResult {
    let dir = TempDir::new()?;
    panelctl()?
        .args(["fip", "--save"])
        .arg(dir.path().join("frame.tiff"))
        .assert()
        .code(4);
    Ok(())
}

#[test]
fn test_watch_with_zero_seconds_exits() -> TestResult {
    panelctl()?
        .args(["watch", "radio", "--seconds", "0"])
        .assert()
        .success();
    Ok(())
}

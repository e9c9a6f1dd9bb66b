use assert_cmd::Command;
use predicates::str::contains;
use serde_json::json;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn goldcheck_cmd() -> Command {
    let mut cmd = Command::cargo_bin("goldcheck").expect("Failed to find goldcheck binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("GOLDCHECK_PLATFORM")
        .env_remove("RUNNER_OS")
        .env_remove("GOLDCHECK_PER_OS")
        .env_remove("GOLDCHECK_SSIM_THRESHOLD");
    cmd
}

fn write_subtitles(path: &Path, items: serde_json::Value) -> Result<(), Box<dyn Error>> {
    let doc = json!({
        "subtitleContractVersion": "1",
        "format": "srt",
        "language": "en",
        "items": items,
    });
    fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

#[test]
fn test_help_lists_subcommands() {
    goldcheck_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("compare"))
        .stdout(contains("subtitles"));
}

#[test]
fn test_missing_baseline_exits_one_with_regen_hint() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let candidate = dir.path().join("candidate.mp4");
    fs::write(&candidate, b"not really a video")?;
    let golden_root = dir.path().join("golden");
    let report = dir.path().join("report.xml");

    goldcheck_cmd()
        .arg("compare")
        .arg("--candidate")
        .arg(&candidate)
        .arg("--game")
        .arg("snake")
        .arg("--platform")
        .arg("linux")
        .arg("--golden-root")
        .arg(&golden_root)
        .arg("--report")
        .arg(&report)
        .assert()
        .code(1)
        .stderr(contains("snake"))
        .stderr(contains("make golden-update GAME=snake PLATFORM=linux"));

    assert!(!report.exists());
    Ok(())
}

#[test]
fn test_platform_env_selects_baseline() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let candidate = dir.path().join("candidate.mp4");
    fs::write(&candidate, b"not really a video")?;

    goldcheck_cmd()
        .env("GOLDCHECK_PLATFORM", "windows")
        .arg("compare")
        .arg("--candidate")
        .arg(&candidate)
        .arg("--game")
        .arg("snake")
        .arg("--per-os")
        .arg("--golden-root")
        .arg(dir.path().join("golden"))
        .arg("--report")
        .arg(dir.path().join("report.xml"))
        .assert()
        .code(1)
        .stderr(contains("PLATFORM=windows"));
    Ok(())
}

#[test]
fn test_missing_candidate_exits_one() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    goldcheck_cmd()
        .arg("compare")
        .arg("--candidate")
        .arg(dir.path().join("nope.mp4"))
        .arg("--game")
        .arg("snake")
        .arg("--golden-root")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(contains("nope.mp4"));
    Ok(())
}

#[test]
fn test_valid_subtitles_exit_zero_and_write_report() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("subtitles.json");
    write_subtitles(
        &input,
        json!([
            {"id": "1", "startSec": 1.0, "endSec": 3.0, "text": "Welcome back."},
            {"id": "2", "startSec": 4.0, "endSec": 6.0, "text": "[DOOR CREAKS]"},
        ]),
    )?;
    let report = dir.path().join("reports").join("subtitle-report.xml");

    goldcheck_cmd()
        .arg("subtitles")
        .arg("--input")
        .arg(&input)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let xml = fs::read_to_string(&report)?;
    assert!(xml.contains("<testsuite"));
    assert!(xml.contains("failures=\"0\""));
    Ok(())
}

#[test]
fn test_subtitle_violation_exits_two() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("subtitles.json");
    write_subtitles(
        &input,
        json!([{"id": "opening", "startSec": 0.10, "endSec": 2.0, "text": "Hi."}]),
    )?;
    let report = dir.path().join("subtitle-report.xml");

    goldcheck_cmd()
        .arg("subtitles")
        .arg("--input")
        .arg(&input)
        .arg("--report")
        .arg(&report)
        .assert()
        .code(2);

    let xml = fs::read_to_string(&report)?;
    assert!(xml.contains("<failure"));
    assert!(xml.contains("opening"));
    Ok(())
}

#[test]
fn test_malformed_subtitles_exit_three() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("subtitles.json");
    fs::write(&input, "{ definitely not json")?;

    goldcheck_cmd()
        .arg("subtitles")
        .arg("--input")
        .arg(&input)
        .arg("--report")
        .arg(dir.path().join("r.xml"))
        .assert()
        .code(3);
    Ok(())
}

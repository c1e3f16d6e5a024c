//! CLI tests for `focus validate`, `focus select` and `focus run`.
//!
//! Spawns the focus binary and verifies exit codes and printed output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use focus::exit_codes;
use focus::io::scenario::Scenario;
use focus::test_support::{clear_gym, route_kill, starter_scenario};

fn write_scenario(dir: &Path, scenario: &Scenario) -> PathBuf {
    let path = dir.join("scenario.json");
    let json = serde_json::to_string_pretty(scenario).expect("serialize");
    fs::write(&path, json).expect("write scenario");
    path
}

fn focus(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_focus"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run focus")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn scenario_with_goals() -> Scenario {
    let mut scenario = starter_scenario();
    scenario.set_goals(vec![
        route_kill("kill-100", "kanto", 0, 1, 100),
        clear_gym("pewter-5", "kanto", 0, 0, 5),
    ]);
    scenario
}

#[test]
fn validate_accepts_starter_scenario() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_scenario(temp.path(), &scenario_with_goals());

    let output = focus(temp.path(), &["validate", "scenario.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).contains("2 goals"));
}

#[test]
fn validate_rejects_schema_violation() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("scenario.json"), r#"{"highest_region": -1}"#)
        .expect("write scenario");

    let output = focus(temp.path(), &["validate", "scenario.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("scenario.json"));
}

#[test]
fn select_prints_goal_id() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_scenario(temp.path(), &scenario_with_goals());

    let first = focus(temp.path(), &["select", "scenario.json"]);
    let second = focus(temp.path(), &["select", "scenario.json"]);

    assert_eq!(first.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&first).trim(), "pewter-5");
    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn select_without_eligible_goal_exits_with_no_goal_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_scenario(temp.path(), &starter_scenario());

    let output = focus(temp.path(), &["select", "scenario.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::NO_GOAL));
}

#[test]
fn select_missing_scenario_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = focus(temp.path(), &["select", "nope.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn select_honors_defer_last_flag() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut scenario = starter_scenario();
    scenario.highest_region = 9;
    scenario.set_goals(vec![
        route_kill("island", "magikarpJump", 0, 1, 1),
        route_kill("galar", "galar", 0, 2, 1),
    ]);
    write_scenario(temp.path(), &scenario);

    let normal = focus(temp.path(), &["select", "scenario.json"]);
    let deferred = focus(temp.path(), &["select", "scenario.json", "--defer-last"]);

    assert_eq!(stdout(&normal).trim(), "island");
    assert_eq!(stdout(&deferred).trim(), "galar");
}

#[test]
fn run_completes_catalog_and_writes_tick_log() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut scenario = starter_scenario();
    scenario.set_goals(vec![
        route_kill("kill-3", "kanto", 0, 1, 3),
        clear_gym("pewter-1", "kanto", 0, 0, 1),
    ]);
    write_scenario(temp.path(), &scenario);

    let output = focus(
        temp.path(),
        &[
            "run",
            "scenario.json",
            "--ticks",
            "100",
            "--prefs",
            "prefs.toml",
            "--tick-log",
            "logs/ticks.jsonl",
        ],
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let printed = stdout(&output);
    assert!(printed.contains("completed: 2/2"));
    assert!(printed.contains("no eligible goal left"));

    let log = fs::read_to_string(temp.path().join("logs/ticks.jsonl")).expect("tick log");
    let last: serde_json::Value =
        serde_json::from_str(log.lines().last().expect("last line")).expect("json");
    assert_eq!(last["outcome"]["outcome"], "no_goal_available");

    let prefs = fs::read_to_string(temp.path().join("prefs.toml")).expect("prefs");
    assert!(prefs.contains("Focus-Achievements-DoMagikarpIslandLast"));
}

#[test]
fn run_respects_tick_limit() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut scenario = starter_scenario();
    scenario.set_goals(vec![route_kill("kill-1000", "kanto", 0, 1, 1000)]);
    write_scenario(temp.path(), &scenario);

    let output = focus(temp.path(), &["run", "scenario.json", "--ticks", "5"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let printed = stdout(&output);
    assert!(printed.contains("ticks: 5"));
    assert!(printed.contains("tick limit reached"));
    assert!(printed.contains("completed: 0/1"));
}

//! Sequencer commands driven through the binary.

mod common;

use common::{json_docs, last_json, run_cli_failure, run_cli_success};
use tempfile::TempDir;

#[test]
fn test_session_stretch_walkthrough() {
    let home = TempDir::new().unwrap();
    let h = home.path();

    let started = last_json(&run_cli_success(h, &["session", "start", "stretch"]));
    assert_eq!(started["type"], "SequenceStarted");
    assert_eq!(started["phase_label"], "Neck Stretch");

    let out = run_cli_success(h, &["session", "tick", "40"]);
    let docs = json_docs(&out);
    assert_eq!(docs[0]["type"], "PhaseAdvanced");
    assert_eq!(docs[0]["phase_id"], "2");
    let status = docs.last().unwrap();
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["remaining_secs"], 20);

    let reordered = last_json(&run_cli_success(h, &["session", "reorder", "5", "4", "3", "2", "1"]));
    assert_eq!(reordered["phase_index"], 3);

    let status = last_json(&run_cli_success(h, &["session", "status"]));
    assert_eq!(status["phase_id"], "2");
    assert_eq!(status["remaining_secs"], 20);

    let out = run_cli_success(h, &["session", "tick", "50"]);
    let docs = json_docs(&out);
    assert!(docs.iter().any(|d| d["type"] == "SequenceFinished"));
    assert_eq!(docs.last().unwrap()["state"], "finished");

    let stats = last_json(&run_cli_success(h, &["stats", "today"]));
    assert_eq!(stats["today_sessions"], 1);
    assert_eq!(stats["sessions_by_routine"]["stretch"], 1);
}

#[test]
fn test_session_pause_freezes_ticks() {
    let home = TempDir::new().unwrap();
    let h = home.path();
    run_cli_success(h, &["session", "start", "breathing"]);
    run_cli_success(h, &["session", "tick", "2"]);

    let paused = last_json(&run_cli_success(h, &["session", "pause"]));
    assert_eq!(paused["type"], "SequencerPaused");
    assert_eq!(paused["remaining_secs"], 2);

    let status = last_json(&run_cli_success(h, &["session", "tick", "5"]));
    assert_eq!(status["state"], "paused");
    assert_eq!(status["remaining_secs"], 2);

    run_cli_success(h, &["session", "resume"]);
    let status = last_json(&run_cli_success(h, &["session", "tick"]));
    assert_eq!(status["remaining_secs"], 1);
}

#[test]
fn test_invalid_reorder_is_rejected() {
    let home = TempDir::new().unwrap();
    let h = home.path();
    run_cli_success(h, &["session", "start", "stretch"]);
    let stderr = run_cli_failure(h, &["session", "reorder", "1", "2", "3", "4", "4"]);
    assert!(stderr.contains("error:"));

    let status = last_json(&run_cli_success(h, &["session", "status"]));
    assert_eq!(status["phase_id"], "1");
}

#[test]
fn test_session_commands_need_a_session() {
    let home = TempDir::new().unwrap();
    let stderr = run_cli_failure(home.path(), &["session", "status"]);
    assert!(stderr.contains("no active session"));
}

#[test]
fn test_cardio_has_no_timed_workout() {
    let home = TempDir::new().unwrap();
    run_cli_failure(home.path(), &["session", "start", "workout:cardio"]);
    let started = last_json(&run_cli_success(home.path(), &["session", "start", "workout:core"]));
    assert_eq!(started["phase_label"], "Plank (set 1/3)");
}

#[test]
fn test_breathe_run_records_session() {
    let home = TempDir::new().unwrap();
    let h = home.path();
    let out = run_cli_success(h, &["breathe", "run", "--cycles", "1", "--tick-ms", "1"]);
    let docs = json_docs(&out);
    assert_eq!(docs[0]["type"], "SequenceStarted");
    let advanced = docs.iter().filter(|d| d["type"] == "PhaseAdvanced").count();
    assert_eq!(advanced, 4);

    let stats = last_json(&run_cli_success(h, &["stats", "today"]));
    assert_eq!(stats["sessions_by_routine"]["breathing"], 1);
    assert_eq!(stats["today_secs"], 19);
}

#[test]
fn test_stretch_order_is_saved() {
    let home = TempDir::new().unwrap();
    let h = home.path();
    run_cli_success(h, &["stretch", "reorder", "3", "1", "2", "5", "4"]);
    let listed = last_json(&run_cli_success(h, &["stretch", "list"]));
    assert_eq!(listed["phases"][0]["label"], "Cat-Cow Stretch");
    assert_eq!(listed["total_secs"], 180);

    run_cli_failure(h, &["stretch", "reorder", "1", "2"]);
    run_cli_success(h, &["stretch", "reset-order"]);
    let listed = last_json(&run_cli_success(h, &["stretch", "list"]));
    assert_eq!(listed["phases"][0]["label"], "Neck Stretch");
}

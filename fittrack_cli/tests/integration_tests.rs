//! Integration tests for the fittrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Registration and login
//! - Plan composition and session lifecycle
//! - Weight tracking and analytics
//! - CSV export and data persistence

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fittrack"));
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Run a command against the given data dir and return its stdout
fn run(data_dir: &Path, args: &[&str]) -> String {
    let output = cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("Failed to run fittrack");
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Pull the id out of a "✓ ... (<id>)" line
fn extract_id(line: &str) -> String {
    let start = line.rfind('(').expect("no id in output");
    let end = line.rfind(')').expect("no id in output");
    line[start + 1..end].to_string()
}

fn register(data_dir: &Path, username: &str, email: &str) -> String {
    let out = run(
        data_dir,
        &[
            "register",
            "--username",
            username,
            "--email",
            email,
            "--password",
            "secret",
            "--name",
            "Test User",
        ],
    );
    extract_id(out.lines().next().expect("no output"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal fitness tracking system"));
}

#[test]
fn test_register_creates_store() {
    let temp_dir = setup_test_dir();

    let user_id = register(temp_dir.path(), "ada", "ada@example.com");
    assert!(!user_id.is_empty());
    assert!(temp_dir.path().join("store.json").exists());
}

#[test]
fn test_duplicate_email_rejected() {
    let temp_dir = setup_test_dir();
    register(temp_dir.path(), "ada", "ada@example.com");

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args([
            "register",
            "--username",
            "grace",
            "--email",
            "ada@example.com",
            "--password",
            "other",
            "--name",
            "Grace",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_login_roundtrip() {
    let temp_dir = setup_test_dir();
    register(temp_dir.path(), "ada", "ada@example.com");

    let out = run(
        temp_dir.path(),
        &["login", "--email", "ada@example.com", "--password", "secret"],
    );
    assert!(out.contains("Logged in"));

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["login", "--email", "ada@example.com", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));
}

#[test]
fn test_builtin_exercises_seeded() {
    let temp_dir = setup_test_dir();

    let out = run(temp_dir.path(), &["exercise", "list"]);
    assert!(out.contains("Bench Press"));
    assert!(out.contains("Squat"));
}

#[test]
fn test_exercise_search_filters() {
    let temp_dir = setup_test_dir();

    let by_name = run(temp_dir.path(), &["exercise", "list", "--search", "squat"]);
    assert!(by_name.contains("Squat"));
    assert!(!by_name.contains("Bench Press"));

    let by_group = run(
        temp_dir.path(),
        &["exercise", "list", "--muscle-group", "Abs"],
    );
    assert!(by_group.contains("Crunch"));
    assert!(!by_group.contains("Pull-up"));
}

#[test]
fn test_full_workout_scenario() {
    let temp_dir = setup_test_dir();
    let user_id = register(temp_dir.path(), "ada", "ada@example.com");

    // Custom exercise
    let out = run(
        temp_dir.path(),
        &[
            "exercise",
            "add",
            "--name",
            "Goblet Squat",
            "--muscle-groups",
            "Legs,Glutes",
            "--user",
            &user_id,
        ],
    );
    let exercise_id = extract_id(&out);

    // Plan for Monday with one exercise
    let out = run(
        temp_dir.path(),
        &[
            "plan", "add", "--user", &user_id, "--name", "Leg Day", "--day", "1",
            "--muscle-groups", "Legs", "--duration", "45",
        ],
    );
    let plan_id = extract_id(&out);

    run(
        temp_dir.path(),
        &[
            "plan", "add-exercise", "--plan", &plan_id, "--exercise", &exercise_id,
            "--sets", "3", "--reps", "10",
        ],
    );

    let shown = run(temp_dir.path(), &["plan", "show", "--plan", &plan_id]);
    assert!(shown.contains("Goblet Squat"));
    assert!(shown.contains("3x10"));

    // Start from the plan: checklist is seeded
    let out = run(
        temp_dir.path(),
        &["session", "start", "--user", &user_id, "--plan", &plan_id],
    );
    let session_id = extract_id(out.lines().next().expect("no output"));
    assert!(out.contains("1 exercises on the checklist"));

    let checklist = run(temp_dir.path(), &["session", "show", "--session", &session_id]);
    assert!(checklist.contains("Goblet Squat"));
    assert!(checklist.contains("3x10"));
    let log_line = checklist
        .lines()
        .find(|l| l.contains("Goblet Squat"))
        .expect("no checklist line");
    let log_id = extract_id(log_line);

    run(temp_dir.path(), &["session", "check", "--log", &log_id]);
    run(
        temp_dir.path(),
        &["session", "finish", "--session", &session_id],
    );

    // Finishing twice is a lifecycle conflict
    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["session", "finish", "--session", &session_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already ended"));

    // The finished session counts toward this week
    let stats = run(temp_dir.path(), &["stats", "--user", &user_id]);
    assert!(stats.contains("This week:  1 workouts"));
    assert!(stats.contains("1 completed"));
}

#[test]
fn test_seed_week_creates_training_days() {
    let temp_dir = setup_test_dir();
    let user_id = register(temp_dir.path(), "ada", "ada@example.com");

    let out = run(temp_dir.path(), &["plan", "seed-week", "--user", &user_id]);
    assert!(out.contains("Created 5 plans"));

    let listed = run(temp_dir.path(), &["plan", "list", "--user", &user_id]);
    assert_eq!(listed.lines().count(), 5);
}

#[test]
fn test_weight_tracking_and_trend() {
    let temp_dir = setup_test_dir();
    let user_id = register(temp_dir.path(), "ada", "ada@example.com");

    run(temp_dir.path(), &["weight", "add", "--user", &user_id, "--kg", "76"]);
    run(temp_dir.path(), &["weight", "add", "--user", &user_id, "--kg", "80"]);

    let listed = run(temp_dir.path(), &["weight", "list", "--user", &user_id]);
    assert!(listed.contains("80.0 kg"));
    assert!(listed.contains("76.0 kg"));

    // Weight log file is append-only JSONL
    let raw = std::fs::read_to_string(temp_dir.path().join("weight_logs.jsonl")).unwrap();
    assert_eq!(raw.lines().count(), 2);
}

#[test]
fn test_export_sessions_csv() {
    let temp_dir = setup_test_dir();
    let user_id = register(temp_dir.path(), "ada", "ada@example.com");

    let out = run(temp_dir.path(), &["session", "start", "--user", &user_id]);
    let session_id = extract_id(out.lines().next().expect("no output"));
    run(
        temp_dir.path(),
        &["session", "finish", "--session", &session_id],
    );

    let csv_path = temp_dir.path().join("history.csv");
    run(
        temp_dir.path(),
        &[
            "export",
            "--user",
            &user_id,
            "--kind",
            "sessions",
            "--out",
            csv_path.to_str().unwrap(),
        ],
    );

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(contents.contains("Workout"));
}

#[test]
fn test_data_persists_across_invocations() {
    let temp_dir = setup_test_dir();
    let user_id = register(temp_dir.path(), "ada", "ada@example.com");

    // A fresh process sees the registered user
    let stats = run(temp_dir.path(), &["stats", "--user", &user_id]);
    assert!(stats.contains("All time:   0 sessions"));
}

//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn adaptutor() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("adaptutor").unwrap()
}

/// A working directory holding a config whose progress file lives inside it.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("adaptutor.toml");
    std::fs::write(
        &config,
        r#"progress_file = "data/progress.json"

[learning.recommendation.messages]
start = "Take your first quiz!"
"#,
    )
    .unwrap();
    (dir, config)
}

/// Run in `dir` with no API keys and a HOME that holds no config.
fn offline(dir: &Path) -> Command {
    let mut cmd = adaptutor();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("ADAPTUTOR_GEMINI_KEY")
        .env_remove("ADAPTUTOR_OPENAI_KEY");
    cmd
}

fn write_package(dir: &Path) -> PathBuf {
    let path = dir.join("package.json");
    std::fs::write(
        &path,
        r#"{
    "id": "00000000-0000-0000-0000-000000000000",
    "created_at": "2025-01-01T00:00:00Z",
    "topic": "Rust",
    "goal": "write safe code",
    "difficulty": "beginner",
    "research": {
        "raw_info": "Rust is a systems programming language.",
        "structured_summary": "Overview: Rust is memory-safe."
    },
    "learning_plan": "1. Learning Objectives",
    "quiz": [
        {
            "question": "Which keyword makes a binding mutable?",
            "options": {"A": "var", "B": "mut", "C": "let"},
            "correct": "B",
            "explanation": "`mut` marks a binding as mutable."
        },
        {
            "question": "What is Option::None?",
            "options": {"A": "An error", "B": "The absence of a value"},
            "correct": "B",
            "explanation": ""
        }
    ]
}"#,
    )
    .unwrap();
    path
}

#[test]
fn help_output() {
    adaptutor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adaptive LLM tutoring assistant"));
}

#[test]
fn version_output() {
    adaptutor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("adaptutor"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    adaptutor()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created adaptutor.toml"));

    let content = std::fs::read_to_string(dir.path().join("adaptutor.toml")).unwrap();
    assert!(content.contains("[providers.gemini]"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    adaptutor()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    adaptutor()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn dashboard_for_new_user() {
    let (dir, config) = workspace();

    offline(dir.path())
        .arg("dashboard")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("User: default"))
        .stdout(predicate::str::contains("Quizzes taken: 0"))
        .stdout(predicate::str::contains("Take your first quiz!"));

    assert!(dir.path().join("data/progress.json").exists());
}

#[test]
fn quiz_with_answer_list_updates_progress() {
    let (dir, config) = workspace();
    let package = write_package(dir.path());

    offline(dir.path())
        .args(["quiz", "--user", "alice", "--answers", "b,"])
        .arg("--package")
        .arg(&package)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/2 (50.0%)"))
        .stdout(predicate::str::contains("Difficulty: beginner"))
        .stdout(predicate::str::contains("No explanation available."))
        .stdout(predicate::str::contains(
            "Review fundamentals and try easier topics.",
        ));

    offline(dir.path())
        .args(["dashboard", "--user", "alice", "--json"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_quizzes\": 1"))
        .stdout(predicate::str::contains("\"average_score\": 50.0"));
}

#[test]
fn quiz_reads_answers_from_stdin() {
    let (dir, config) = workspace();
    let package = write_package(dir.path());

    offline(dir.path())
        .arg("quiz")
        .arg("--package")
        .arg(&package)
        .arg("--config")
        .arg(&config)
        .write_stdin("B\nB\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 2/2 (100.0%)"))
        .stdout(predicate::str::contains("Difficulty: advanced"));
}

#[test]
fn quiz_with_too_many_answers_fails() {
    let (dir, config) = workspace();
    let package = write_package(dir.path());

    offline(dir.path())
        .args(["quiz", "--answers", "A,B,C"])
        .arg("--package")
        .arg(&package)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("3 answers for 2 questions"));
}

#[test]
fn quiz_missing_package_fails() {
    let (dir, config) = workspace();

    offline(dir.path())
        .args(["quiz", "--package", "no_such_package.json", "--answers", "A"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn reset_clears_progress() {
    let (dir, config) = workspace();
    let package = write_package(dir.path());

    offline(dir.path())
        .args(["quiz", "--user", "bob", "--answers", "B,B"])
        .arg("--package")
        .arg(&package)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    offline(dir.path())
        .args(["reset", "--user", "bob"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress reset for user 'bob'"));

    offline(dir.path())
        .args(["dashboard", "--user", "bob"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Quizzes taken: 0"))
        .stdout(predicate::str::contains("Difficulty: beginner"));
}

#[test]
fn corrupt_store_is_reported() {
    let (dir, config) = workspace();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data/progress.json"), "not json").unwrap();

    offline(dir.path())
        .arg("dashboard")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed JSON"));
}

#[test]
fn learn_without_provider_fails() {
    let (dir, config) = workspace();

    offline(dir.path())
        .args(["learn", "--topic", "Rust", "--goal", "basics"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider 'gemini' is not configured"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[learning.difficulty]\nrecent_window = 0\n").unwrap();

    offline(dir.path())
        .arg("dashboard")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("recent_window must be at least 1"));
}

//! End-to-end tests for the whistletab binary.
//!
//! Every command runs in a fresh temp directory with its own config home so
//! that config files on the test machine don't leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TUNE: &str = "X:1\nT:Test\nK:D\nDEF|\nGAB|\n";

fn whistletab(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("whistletab").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../whistle-abc/tests/fixtures")
        .join(format!("{}.abc", name))
}

#[test]
fn renders_tab_from_stdin() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .write_stdin(TUNE)
        .assert()
        .success()
        .stdout("def\ngab\n");
}

#[test]
fn renders_tab_from_file() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .arg(fixture("simple_melody"))
        .assert()
        .success()
        .stdout("defgabcDEDcba f \n");
}

#[test]
fn dash_reads_stdin() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .args(["--format", "line", "-"])
        .write_stdin(TUNE)
        .assert()
        .success()
        .stdout("defgab\n");
}

#[test]
fn writes_json() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .args(["--format", "json"])
        .write_stdin(TUNE)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Test\""))
        .stdout(predicate::str::contains("\"tempoBpm\": 120"))
        .stdout(predicate::str::contains("\"durationMs\": 250"));
}

#[test]
fn writes_note_file_without_fitting() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .args(["-f", "notes", "--no-fit"])
        .write_stdin("K:D\nD z F")
        .assert()
        .success()
        .stdout("42/250,0/250,46/250\n");
}

#[test]
fn whistle_flag_retunes_note_file() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .args(["-f", "notes", "--whistle", "Low D"])
        .write_stdin("K:D\nd")
        .assert()
        .success()
        .stdout("42/250\n");

    whistletab(&dir)
        .args(["--whistle", "low-d"])
        .write_stdin("K:D\nd")
        .assert()
        .success()
        .stdout("d\n");
}

#[test]
fn unknown_whistle_is_rejected() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .args(["--whistle", "kazoo"])
        .write_stdin(TUNE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("kazoo"));
}

#[test]
fn empty_input_exits_with_2() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .write_stdin("")
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn tune_without_notes_exits_with_2() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .write_stdin("X:1\nT:Nothing\nK:D\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No notes"));
}

#[test]
fn missing_file_exits_with_1() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .arg("no-such-tune.abc")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no-such-tune.abc"));
}

#[test]
fn out_of_range_tune_still_renders() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .arg(fixture("out_of_range"))
        .assert()
        .success()
        .stdout(predicate::str::contains("?"));
}

#[test]
fn config_flag_sets_format() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[output]\nformat = \"line\"\n").unwrap();

    whistletab(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin(TUNE)
        .assert()
        .success()
        .stdout("defgab\n");
}

#[test]
fn command_line_beats_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("whistletab.toml"),
        "[output]\nformat = \"line\"\n",
    )
    .unwrap();

    whistletab(&dir)
        .write_stdin(TUNE)
        .assert()
        .success()
        .stdout("defgab\n");

    whistletab(&dir)
        .args(["--format", "tab"])
        .write_stdin(TUNE)
        .assert()
        .success()
        .stdout("def\ngab\n");
}

#[test]
fn user_config_is_read() {
    let dir = TempDir::new().unwrap();
    let user = dir.path().join("config/whistletab");
    fs::create_dir_all(&user).unwrap();
    fs::write(user.join("config.toml"), "[output]\nfit = false\nformat = \"notes\"\n").unwrap();

    whistletab(&dir)
        .write_stdin("K:D\nD")
        .assert()
        .success()
        .stdout("42/250\n");
}

#[test]
fn bad_config_exits_with_1() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[output]\nformat = \"midi\"\n").unwrap();

    whistletab(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin(TUNE)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("midi"));
}

#[test]
fn missing_config_exits_with_1() {
    let dir = TempDir::new().unwrap();
    whistletab(&dir)
        .args(["--config", "nowhere.toml"])
        .write_stdin(TUNE)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nowhere.toml"));
}

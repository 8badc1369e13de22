// End-to-end CLI surface tests (no backend required).

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn carewatch() -> Command {
    Command::cargo_bin("carewatch").unwrap()
}

#[test]
fn help_lists_the_command_tree() {
    carewatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cards"))
        .stdout(predicate::str::contains("alarms"))
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("ack"));
}

#[test]
fn version_flag_works() {
    carewatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("carewatch"));
}

#[test]
fn no_arguments_shows_help_and_fails() {
    carewatch().assert().failure().code(2);
}

#[test]
fn unknown_subcommand_is_rejected() {
    carewatch().arg("frobnicate").assert().failure();
}

#[test]
fn config_path_prints_a_toml_path() {
    carewatch()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn completions_generate_for_bash() {
    carewatch()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("carewatch"));
}

#[test]
fn cards_without_config_or_server_fails_cleanly() {
    carewatch()
        .arg("cards")
        .env_remove("CAREWATCH_SERVER")
        .env_remove("CAREWATCH_TOKEN")
        .env("XDG_CONFIG_HOME", "/nonexistent-carewatch-test")
        .assert()
        .failure();
}

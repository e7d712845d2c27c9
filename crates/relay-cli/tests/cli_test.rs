use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn relay() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("relay");
    cmd.env_remove("RELAY_CONFIG").env_remove("RELAY_TOKEN");
    cmd
}

/// Writes a two-environment config whose target is never reachable.
fn write_config(dir: &TempDir, target: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    let config = format!(
        r#"{{"target":"{target}","envs":[{{"name":"dev","dnsSuffix":"dev.example.com"}},{{"name":"qa","dnsSuffix":"qa.example.com"}}]}}"#
    );
    std::fs::write(&path, config).unwrap();
    path
}

// ── Help / Version ──

#[test]
fn shows_help() {
    relay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("per-environment apps"))
        .stdout(predicate::str::contains("project-create"))
        .stdout(predicate::str::contains("envvar-unset"));
}

#[test]
fn shows_version() {
    relay()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("relay"));
}

// ── Configuration ──

#[test]
fn env_list_shows_configured_environments() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "http://127.0.0.1:9");

    relay()
        .arg("--config")
        .arg(&config)
        .arg("env-list")
        .assert()
        .success()
        .stdout(predicate::str::contains("DNS Suffix"))
        .stdout(predicate::str::contains("dev.example.com"))
        .stdout(predicate::str::contains("qa.example.com"));
}

#[test]
fn config_path_from_environment() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "http://127.0.0.1:9");

    relay()
        .env("RELAY_CONFIG", &config)
        .arg("env-list")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev.example.com"));
}

#[test]
fn missing_config_is_reported() {
    let tmp = TempDir::new().unwrap();

    relay()
        .arg("--config")
        .arg(tmp.path().join("absent.json"))
        .arg("env-list")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "unable to load environments file, please make sure that relay is properly configured",
        ));
}

#[test]
fn remote_commands_need_a_target() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "");

    relay()
        .arg("--config")
        .arg(&config)
        .arg("project-list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no target defined"));
}

// ── Validation before any remote call ──

#[test]
fn envvar_set_rejects_bad_declaration() {
    let tmp = TempDir::new().unwrap();

    relay()
        .arg("--config")
        .arg(tmp.path().join("absent.json"))
        .args(["envvar-set", "-n", "proj", "NOVALUE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "configuration vars must be specified in the form NAME=value",
        ));
}

#[test]
fn config_set_is_an_alias_of_envvar_set() {
    let tmp = TempDir::new().unwrap();

    relay()
        .arg("--config")
        .arg(tmp.path().join("absent.json"))
        .args(["config-set", "-n", "proj", "NOVALUE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "configuration vars must be specified in the form NAME=value",
        ));
}

#[test]
fn help_lists_platform_catalogue_commands() {
    relay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("platform-list"))
        .stdout(predicate::str::contains("plan-list"))
        .stdout(predicate::str::contains("team-create"))
        .stdout(predicate::str::contains("config-get"));
}

#[test]
fn team_create_requires_a_name() {
    relay()
        .arg("team-create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<TEAM>"));
}

#[test]
fn deploy_rejects_conflicting_sources() {
    let tmp = TempDir::new().unwrap();

    relay()
        .arg("--config")
        .arg(tmp.path().join("absent.json"))
        .args(["project-deploy", "-n", "proj", "-e", "dev", "-i", "img:v1", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "please specify only one of the image, parent env or the list of files/directories to upload",
        ));
}

#[test]
fn deploy_requires_a_source() {
    let tmp = TempDir::new().unwrap();

    relay()
        .arg("--config")
        .arg(tmp.path().join("absent.json"))
        .args(["project-deploy", "-n", "proj", "-e", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "please specify either the image, parent env or the list of files/directories to upload",
        ));
}

#[test]
fn log_rejects_unknown_env() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "http://127.0.0.1:9");

    relay()
        .arg("--config")
        .arg(&config)
        .args(["project-log", "-n", "proj", "-e", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid values: staging (valid options are: dev, qa)",
        ));
}

#[test]
fn log_requires_project_and_env() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "http://127.0.0.1:9");

    relay()
        .arg("--config")
        .arg(&config)
        .args(["project-log", "-n", "proj"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "please provide the project name and the environment",
        ));
}

// ── Remove ──

#[test]
fn remove_requires_a_name() {
    relay()
        .arg("project-remove")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "please provide the name of the project",
        ));
}

#[test]
fn remove_declined_makes_no_call() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "http://127.0.0.1:9");

    relay()
        .arg("--config")
        .arg(&config)
        .args(["project-remove", "-n", "proj"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"Are you sure you want to remove the project "proj"? (y/N)"#,
        ))
        .stdout(predicate::str::contains("Deleting").not());
}

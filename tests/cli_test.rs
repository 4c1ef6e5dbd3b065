use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_describes_the_reports() {
    let mut cmd = Command::cargo_bin("mbexport").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("permissions.tsv"))
        .stdout(predicate::str::contains("queries.tsv"))
        .stdout(predicate::str::contains("MBEXPORT_HOST"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("mbexport").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mbexport"));
}

#[test]
fn test_unexpected_argument_is_rejected() {
    let mut cmd = Command::cargo_bin("mbexport").unwrap();
    cmd.arg("frobnicate");

    cmd.assert().failure();
}

#[test]
fn test_missing_configuration_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("mbexport").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("MBEXPORT_HOST")
        .env_remove("MBEXPORT_USER")
        .env_remove("MBEXPORT_PASSWORD");

    cmd.assert()
        .failure()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("MBEXPORT_HOST"));

    // the run must abort before any report file is created
    assert!(!dir.path().join("permissions.tsv").exists());
    assert!(!dir.path().join("queries.tsv").exists());
}

#[test]
fn test_invalid_host_url_fails_with_config_error() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("mbexport").unwrap();
    cmd.current_dir(dir.path())
        .env("MBEXPORT_HOST", "not a url")
        .env("MBEXPORT_USER", "admin")
        .env("MBEXPORT_PASSWORD", "secret");

    cmd.assert()
        .failure()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("invalid host URL"));
}

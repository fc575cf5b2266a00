mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn lamgen() -> Command {
    let mut cmd = Command::cargo_bin("lamgen").unwrap();
    cmd.env("HOME", std::env::temp_dir().join("lamgen-no-home"));
    cmd
}

#[test]
fn piped_answer_applies_the_plan() {
    let project = common::minimal_project();

    lamgen()
        .arg(project.path())
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter number (1-3) [default: 1 for MySQL]: "))
        .stdout(predicate::str::contains("You selected: PostgreSQL"))
        .stdout(predicate::str::contains("      create  bin/deploy"))
        .stdout(predicate::str::contains("     gemfile  pg"));

    assert!(common::read(project.path(), "Gemfile").contains("gem \"pg\""));
    assert!(common::is_executable(&project.path().join("bin/deploy")));
}

#[test]
fn invalid_then_valid_answer() {
    let project = common::minimal_project();

    let assert = lamgen()
        .arg(project.path())
        .write_stdin("9\n1\n")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("Invalid selection.").count(), 1);
    assert!(stdout.contains("You selected: MySQL"));
}

#[test]
fn database_flag_skips_the_prompt() {
    let project = common::minimal_project();

    lamgen()
        .arg(project.path())
        .args(["--database", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter number").not());

    assert!(common::read(project.path(), "Gemfile").contains("gem \"sqlite3\""));
}

#[test]
fn invalid_database_flag_changes_nothing() {
    let project = common::minimal_project();

    lamgen()
        .arg(project.path())
        .args(["--database", "oracle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to resolve configuration"));

    assert_eq!(common::read(project.path(), "Gemfile"), common::GEMFILE);
    assert!(!project.path().join("bin/deploy").exists());
}

#[test]
fn dry_run_touches_nothing() {
    let project = common::minimal_project();

    lamgen()
        .arg(project.path())
        .args(["--database", "1", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bin/deploy (+x)"))
        .stdout(predicate::str::contains("mysql2 (~> 0.5) -> Gemfile"));

    assert_eq!(common::read(project.path(), "Gemfile"), common::GEMFILE);
    assert!(!project.path().join(".gitignore").exists());
}

#[test]
fn failed_operation_sets_exit_status() {
    let project = common::minimal_project();
    common::write(
        project.path(),
        "config/environments/production.rb",
        "Rails.application.configure do\n  end\n",
    );

    lamgen()
        .arg(project.path())
        .args(["--database", "2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("error  config/environments/production.rb"))
        .stdout(predicate::str::contains("create  Dockerfile"))
        .stderr(predicate::str::contains("1 operation(s) failed"))
        .stderr(predicate::str::contains("operation failed").not());
}

#[test]
fn config_file_supplies_answers() {
    let project = common::minimal_project();
    let config = project.path().join("lamgen.toml");
    std::fs::write(&config, "ruby_version = \"3.1\"\n\n[answers]\ndatabase = \"2\"\n").unwrap();

    lamgen()
        .arg(project.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert!(common::read(project.path(), "Gemfile").contains("gem \"pg\""));
    assert_eq!(common::read(project.path(), ".ruby-version"), "3.1");
}

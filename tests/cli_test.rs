#![allow(deprecated)]

mod utils;

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use clap::Parser;
use masonjar::cli::{Cli, Commands};
use masonjar::constants::env;
use predicates::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("masonjar")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_open_args() {
    let args = make_args(&["open", "--jar", "demo", "--identifier", "x1", "--destination", "/tmp/out"]);
    let parsed = Cli::try_parse_from(args).unwrap();

    match parsed.command {
        Commands::Open(open) => {
            assert_eq!(open.jar, "demo");
            assert_eq!(open.identifier, "x1");
            assert_eq!(open.destination, PathBuf::from("/tmp/out"));
        }
        other => panic!("Expected open, got {other:?}"),
    }
    assert_eq!(parsed.verbose, 0);
    assert!(parsed.config.is_none());
}

#[test]
fn test_open_destination_defaults_to_current_dir() {
    let args = make_args(&["open", "--jar", "demo", "--identifier", "x1"]);
    let parsed = Cli::try_parse_from(args).unwrap();

    let Commands::Open(open) = parsed.command else {
        panic!("Expected open");
    };
    assert_eq!(open.destination, PathBuf::from("."));
}

#[test]
fn test_global_flags_after_subcommand() {
    let args = make_args(&["list", "-vv", "--config", "/etc/masonjar.yaml", "--logfile", "m.log"]);
    let parsed = Cli::try_parse_from(args).unwrap();

    assert!(matches!(parsed.command, Commands::List));
    assert_eq!(parsed.verbose, 2);
    assert_eq!(parsed.config, Some(PathBuf::from("/etc/masonjar.yaml")));
    assert_eq!(parsed.logfile, Some(PathBuf::from("m.log")));
}

#[test]
fn test_update_flags() {
    let parsed = Cli::try_parse_from(make_args(&["update"])).unwrap();
    let Commands::Update(update) = parsed.command else {
        panic!("Expected update");
    };
    assert!(update.repository.is_none());
    assert!(update.remote.is_none());

    let args = make_args(&["update", "--repository", "git@example.com:jars.git", "--remote", "upstream"]);
    let Commands::Update(update) = Cli::try_parse_from(args).unwrap().command else {
        panic!("Expected update");
    };
    assert_eq!(update.repository.as_deref(), Some("git@example.com:jars.git"));
    assert_eq!(update.remote.as_deref(), Some("upstream"));
}

#[test]
fn test_invalid_open_args() {
    assert!(Cli::try_parse_from(make_args(&["open", "--identifier", "x1"])).is_err());
    assert!(Cli::try_parse_from(make_args(&["open", "--jar", "demo"])).is_err());
    assert!(Cli::try_parse_from(make_args(&["open", "--jar", "demo", "--identifier", ""])).is_err());
    assert!(Cli::try_parse_from(make_args(&[])).is_err());
}

/// A masonjar home with a settings file and a repository holding `demo`.
fn masonjar_home() -> (TempDir, PathBuf) {
    let home = TempDir::new().unwrap();
    let config = home.path().join("masonjar.yaml");
    fs::write(&config, "repo_remote: origin\n").unwrap();

    let jar = utils::make_jar(&home.path().join("repo"), "demo", Some(("metadata.json", r#"{"prefix": "app-"}"#)));
    utils::write_file(&jar, "README.md", "hello");
    (home, config)
}

fn masonjar_cmd(config: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("masonjar"));
    cmd.env_remove(env::REPO_URL)
        .env_remove(env::REPO_REMOTE)
        .env_remove(env::LOG_FILE)
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn test_open_command_end_to_end() {
    let (home, config) = masonjar_home();
    let out = home.path().join("out");

    masonjar_cmd(&config)
        .args(["open", "--jar", "demo", "--identifier", "x1", "--destination"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Opened jar 'demo'"));

    assert_eq!(fs::read_to_string(out.join("app-x1/README.md")).unwrap(), "hello");
    assert!(!out.join("app-x1/metadata.json").exists());
}

#[test]
fn test_open_unknown_jar_fails() {
    let (home, config) = masonjar_home();
    let out = home.path().join("out");
    fs::create_dir(&out).unwrap();

    masonjar_cmd(&config)
        .args(["open", "--jar", "nonexistent", "--identifier", "x1", "--destination"])
        .arg(&out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to find a jar matching 'nonexistent'"));

    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_list_command() {
    let (home, config) = masonjar_home();
    utils::make_jar(&home.path().join("repo"), "not-a-jar", None);

    masonjar_cmd(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::eq("demo\n"));
}

#[test]
fn test_logfile_receives_logs() {
    let (home, config) = masonjar_home();
    let log_file = home.path().join("logs/masonjar.log");

    masonjar_cmd(&config)
        .args(["list", "-vv", "--logfile"])
        .arg(&log_file)
        .assert()
        .success();

    let logs = fs::read_to_string(&log_file).unwrap();
    assert!(logs.contains("list called"));
}

#[test]
fn test_logs_default_to_masonjar_home() {
    let (home, config) = masonjar_home();

    masonjar_cmd(&config).args(["list", "-vv"]).assert().success().stderr(predicate::str::is_empty());

    let logs = fs::read_to_string(home.path().join("masonjar.log")).unwrap();
    assert!(logs.contains("list called"));
}

#[test]
fn test_missing_subcommand_prints_help() {
    Command::new(cargo_bin("masonjar"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage:"));
}

// tests/command_action.rs
#![cfg(unix)]

mod common;
use crate::common::builders::TreeFixture;
use crate::common::{init_tracing, with_timeout};

use std::time::{Duration, Instant};

use dirpoll::config::CommandSettings;
use dirpoll::errors::DirpollError;
use dirpoll::exec::{run_command, CommandAction, ReactorAction};

#[tokio::test]
async fn command_output_is_captured() {
    init_tracing();
    let settings = CommandSettings::new("echo hello && echo oops 1>&2");

    let out = with_timeout(run_command(&settings)).await.expect("command succeeds");
    assert_eq!(out.exit_code, 0);
    assert_eq!(out.stdout.trim(), "hello");
    assert_eq!(out.stderr.trim(), "oops");
}

#[tokio::test]
async fn command_runs_in_the_configured_directory() {
    init_tracing();
    let fx = TreeFixture::new();
    fx.write_len("marker.txt", 1);

    let mut settings = CommandSettings::new("ls");
    settings.working_dir = Some(fx.root().to_path_buf());
    let cwd_before = std::env::current_dir().unwrap();

    let out = with_timeout(run_command(&settings)).await.expect("command succeeds");
    assert!(out.stdout.lines().any(|l| l == "marker.txt"), "{}", out.stdout);

    // Only the child changes directory.
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);
}

#[tokio::test]
async fn non_zero_exit_is_an_error() {
    init_tracing();
    let settings = CommandSettings::new("exit 3");

    let err = with_timeout(run_command(&settings)).await.unwrap_err();
    match err {
        DirpollError::Command(msg) => assert!(msg.contains("code 3"), "{msg}"),
        other => panic!("expected command error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_working_directory_is_an_error() {
    init_tracing();
    let fx = TreeFixture::new();
    let mut settings = CommandSettings::new("true");
    settings.working_dir = Some(fx.path("nope"));

    let err = with_timeout(run_command(&settings)).await.unwrap_err();
    assert!(matches!(err, DirpollError::Command(_)), "got {err:?}");
}

#[tokio::test]
async fn timeout_kills_a_slow_command() {
    init_tracing();
    let mut settings = CommandSettings::new("sleep 10");
    settings.timeout = Some(Duration::from_millis(200));

    let started = Instant::now();
    let err = with_timeout(run_command(&settings)).await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(3));
    match err {
        DirpollError::Command(msg) => assert!(msg.contains("timed out"), "{msg}"),
        other => panic!("expected command error, got {other:?}"),
    }
}

#[tokio::test]
async fn command_action_runs_only_for_changes() {
    init_tracing();
    let fx = TreeFixture::new();
    let mut settings = CommandSettings::new("echo run >> runs.log");
    settings.working_dir = Some(fx.root().to_path_buf());
    let mut action = CommandAction::new(settings);

    with_timeout(action.on_no_changes_found()).await.unwrap();
    assert!(!fx.path("runs.log").exists());

    with_timeout(action.on_changes_found()).await.unwrap();
    with_timeout(action.on_changes_found()).await.unwrap();
    let log = std::fs::read_to_string(fx.path("runs.log")).unwrap();
    assert_eq!(log.lines().count(), 2);
}

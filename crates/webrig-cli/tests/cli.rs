//! Process-level tests of the `webrig` binary.

mod common;

use assert_cmd::Command;
use common::project_with;
use predicates::prelude::*;

fn webrig() -> Command {
    let mut cmd = Command::cargo_bin("webrig").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    webrig()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("dev"));
}

#[test]
fn verbose_and_quiet_conflict() {
    webrig()
        .args(["--verbose", "--quiet", "build"])
        .assert()
        .failure();
}

#[test]
fn build_without_main_entry_exits_nonzero() {
    let temp = project_with(&[("static/logo.png", "png")]);

    webrig()
        .args(["build", "--mode", "fast", "--project"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("index"));
}

#[test]
fn dev_rejects_proxy_context_without_target() {
    webrig()
        .args(["dev", "--proxy-context", "/api"])
        .assert()
        .failure();
}

#[test]
fn dev_with_unbindable_host_exits_nonzero() {
    let temp = project_with(&[("src/index.ts", "export {}")]);

    webrig()
        .args(["dev", "--host", "203.0.113.7", "--port", "3999", "--project"])
        .arg(temp.path())
        .assert()
        .code(1);
}

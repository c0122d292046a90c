//! End-to-end tests for the `cuke-inspector` binary.

use std::path::Path;
use std::str;

use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const FEATURE: &str = "\
@wip
Feature: Checkout

  Scenario: pay
    Given a basket
    When paying
";

const GLUE: &str = "\
#[given(\"a basket\")]
fn a_basket() {}

#[then(\"a receipt\")]
fn a_receipt() {}
";

#[fixture]
#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn suite() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::create_dir(dir.path().join("features")).expect("features dir");
    std::fs::create_dir(dir.path().join("steps")).expect("steps dir");
    std::fs::write(dir.path().join("features/checkout.feature"), FEATURE).expect("feature");
    std::fs::write(dir.path().join("steps/steps.rs"), GLUE).expect("glue");
    dir
}

#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn inspector(root: &Path) -> Command {
    let mut command = Command::cargo_bin("cuke-inspector").expect("binary exists");
    command
        .env_remove("CUKE_INSPECTOR_LOG_LEVEL")
        .env_remove("CUKE_INSPECTOR_FAIL_ON_VIOLATIONS")
        .arg("--features")
        .arg(root.join("features"))
        .arg("--glue")
        .arg(root.join("steps"));
    command
}

#[rstest]
#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn violations_are_reported_with_status_one(suite: TempDir) {
    let output = inspector(suite.path())
        .arg("--missing-steps")
        .arg("--unused-steps")
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let stdout = str::from_utf8(&output.stdout).expect("utf8");
    assert!(stdout.starts_with("2 violation(s) found:\n"));
    assert!(stdout.contains("The Gherkin step 'When paying' has no step definition."));
    assert!(stdout.contains("The step definition 'a receipt' is not used in any feature file."));
    assert!(stdout.ends_with("---\nunused-steps: 1\nmissing-steps: 1\n"));
}

#[rstest]
#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn clean_suite_exits_successfully(suite: TempDir) {
    let output = inspector(suite.path())
        .arg("--duplicate-steps")
        .arg("--duplicate-scenarios")
        .output()
        .expect("runs");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[rstest]
#[case::flag(&["--fail-on-violations", "false"], None)]
#[case::environment(&[], Some("false"))]
#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn failing_on_violations_can_be_disabled(
    suite: TempDir,
    #[case] flags: &[&str],
    #[case] env: Option<&str>,
) {
    let mut command = inspector(suite.path());
    command.arg("--forbidden-feature-tag").arg("@wip").args(flags);
    if let Some(value) = env {
        command.env("CUKE_INSPECTOR_FAIL_ON_VIOLATIONS", value);
    }
    let output = command.output().expect("runs");
    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).expect("utf8");
    assert!(stdout.contains("Feature 'Checkout' contains forbidden tag: @wip."));
}

#[rstest]
#[case::no_checks(&[])]
#[case::bad_regex(&["--required-tag", "@("])]
#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn configuration_errors_exit_with_status_two(suite: TempDir, #[case] flags: &[&str]) {
    let output = inspector(suite.path()).args(flags).output().expect("runs");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[rstest]
#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn invalid_environment_exits_with_status_two(suite: TempDir) {
    let output = inspector(suite.path())
        .arg("--all")
        .env("CUKE_INSPECTOR_LOG_LEVEL", "loud")
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(2));
}

#[rstest]
#[expect(clippy::expect_used, reason = "behavioural tests use explicit panics for clarity")]
fn unparsable_feature_exits_with_status_two(suite: TempDir) {
    std::fs::write(suite.path().join("features/broken.feature"), "not gherkin\n")
        .expect("feature");
    let output = inspector(suite.path()).arg("--all").output().expect("runs");
    assert_eq!(output.status.code(), Some(2));
}

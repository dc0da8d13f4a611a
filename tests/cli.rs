use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;

/// A command with the studio deliberately unconfigured, so every test here
/// runs offline against the default/simulated paths.
fn unconfigured_cmd() -> Command {
    let mut cmd = Command::cargo_bin("content-stream").expect("Binary exists");
    cmd.env_remove("SANITY_PROJECT_ID")
        .env_remove("SANITY_DATASET")
        .env_remove("SANITY_API_TOKEN")
        .env_remove("SANITY_USE_CDN");
    cmd
}

#[test]
#[serial]
fn browse_unconfigured_shows_defaults_and_no_content() {
    unconfigured_cmd()
        .arg("browse")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Categories: all")
                .and(predicate::str::contains("No content found")),
        );
}

#[test]
#[serial]
fn browse_with_filters_still_succeeds_unconfigured() {
    unconfigured_cmd()
        .arg("browse")
        .arg("--category")
        .arg("Technology")
        .arg("--search")
        .arg("rust")
        .assert()
        .success()
        .stdout(predicate::str::contains("No content found"));
}

#[test]
#[serial]
fn product_lookup_unconfigured_reports_not_found() {
    unconfigured_cmd()
        .arg("product")
        .arg("aurora-lamp")
        .assert()
        .success()
        .stdout(predicate::str::contains("Product not found: aurora-lamp"));
}

#[test]
#[serial]
fn enquire_without_write_token_is_simulated_success() {
    unconfigured_cmd()
        .arg("enquire")
        .arg("--product")
        .arg("Aurora Lamp")
        .arg("--name")
        .arg("Jane Doe")
        .arg("--email")
        .arg("jane.doe@example.com")
        .arg("--mobile")
        .arg("+1 123 456 7890")
        .arg("--message")
        .arg("Is this lamp available in matte black?")
        .assert()
        .success()
        .stdout(predicate::str::contains("(simulated)"));
}

#[test]
#[serial]
fn enquire_with_short_message_fails_validation_before_any_submission() {
    unconfigured_cmd()
        .arg("enquire")
        .arg("--product")
        .arg("Aurora Lamp")
        .arg("--name")
        .arg("Jane Doe")
        .arg("--email")
        .arg("jane.doe@example.com")
        .arg("--mobile")
        .arg("+1 123 456 7890")
        .arg("--message")
        .arg("Nope.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 10 characters"));
}

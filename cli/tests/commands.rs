use std::{fs, path::Path};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

/// Workspace with a config that skips the simulated deployment delay.
fn workspace() -> TempDir {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("base-moon.toml"), "simulated_delay_ms = 0\n")
        .expect("write config");
    tmp
}

fn base_moon(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("base-moon");
    cmd.current_dir(dir)
        .env_remove("BASE_MOON_ADDRESS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn balance_without_wallet_is_zero() {
    let tmp = workspace();

    base_moon(tmp.path())
        .arg("balance")
        .assert()
        .success()
        .stdout(predicate::str::contains("BM Coins: 0"))
        .stderr(predicate::str::contains("No wallet connected"));
}

#[test]
fn deploy_storage_awards_and_persists_points() {
    let tmp = workspace();

    base_moon(tmp.path())
        .args(["deploy-storage", "--address", ADDRESS])
        .assert()
        .success()
        .stdout(predicate::str::contains("BM Coins: 100"));

    base_moon(tmp.path())
        .args(["create-nft", "--name", "Moons", "--ticker", "MOON"])
        .env("BASE_MOON_ADDRESS", ADDRESS)
        .assert()
        .success()
        .stdout(predicate::str::contains("BM Coins: 200"));

    base_moon(tmp.path())
        .args(["balance", "--address", ADDRESS])
        .assert()
        .success()
        .stdout(predicate::str::contains("0x71C7...976F"))
        .stdout(predicate::str::contains("BM Coins: 200"));

    let store = fs::read_to_string(tmp.path().join(".base-moon/points.json")).expect("read store");
    let entries: serde_json::Value = serde_json::from_str(&store).expect("store is JSON");
    assert_eq!(entries[format!("base_moon_points_{ADDRESS}")], "200");
}

#[test]
fn balances_are_kept_per_wallet() {
    let tmp = workspace();

    base_moon(tmp.path())
        .args(["deploy-storage", "--address", ADDRESS])
        .assert()
        .success();

    base_moon(tmp.path())
        .args(["balance", "--address", "0x0000000000000000000000000000000000000001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BM Coins: 0"));
}

#[test]
fn unsaved_award_is_reported_without_failing() {
    let tmp = workspace();
    // a directory where the store stages its next write
    fs::create_dir_all(tmp.path().join(".base-moon/points.json.tmp"))
        .expect("block writes");

    base_moon(tmp.path())
        .args(["deploy-storage", "--address", ADDRESS])
        .assert()
        .success()
        .stdout(predicate::str::contains("BM Coins: 100"))
        .stderr(predicate::str::contains("Award could not be saved"));

    base_moon(tmp.path())
        .args(["balance", "--address", ADDRESS])
        .assert()
        .success()
        .stdout(predicate::str::contains("BM Coins: 0"));
}

#[test]
fn create_token_rejects_blank_name() {
    let tmp = workspace();

    base_moon(tmp.path())
        .args([
            "create-token",
            "--address",
            ADDRESS,
            "--name",
            "",
            "--ticker",
            "TKN",
            "--supply",
            "10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid name"));

    assert!(!tmp.path().join(".base-moon/points.json").exists());
}

#[test]
fn create_token_rejects_zero_supply() {
    let tmp = workspace();

    base_moon(tmp.path())
        .args([
            "create-token",
            "--address",
            ADDRESS,
            "--name",
            "Moon",
            "--ticker",
            "MOON",
            "--supply",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid supply"));
}

#[test]
fn actions_require_a_wallet() {
    let tmp = workspace();

    base_moon(tmp.path())
        .arg("deploy-storage")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no wallet connected"));
}

#[test]
fn actions_require_base_mainnet() {
    let tmp = workspace();

    base_moon(tmp.path())
        .args(["deploy-storage", "--address", ADDRESS, "--chain-id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong network"));
}

#[test]
fn timed_out_action_awards_nothing() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("base-moon.toml"),
        "simulated_delay_ms = 5000\naction_timeout_ms = 10\n",
    )
    .expect("write config");

    base_moon(tmp.path())
        .args(["deploy-storage", "--address", ADDRESS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timed out"));

    base_moon(tmp.path())
        .args(["balance", "--address", ADDRESS])
        .assert()
        .success()
        .stdout(predicate::str::contains("BM Coins: 0"));
}

#[test]
fn check_reports_missing_wallet() {
    let tmp = workspace();

    base_moon(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("check failed with 2 issue(s)"));

    base_moon(tmp.path())
        .args(["check", "--address", ADDRESS])
        .assert()
        .success()
        .stderr(predicate::str::contains("All checks passed"));
}

#[test]
fn check_rejects_malformed_config() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("base-moon.toml"), "storage_prefix = \"\"\n")
        .expect("write config");

    base_moon(tmp.path())
        .args(["check", "--address", ADDRESS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config is valid"));
}

#[test]
fn completions_are_generated() {
    let tmp = workspace();

    base_moon(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base-moon"));
}

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("rules-cli").expect("binary builds")
}

#[test]
fn roll_prints_a_total() {
    cli()
        .args(["roll", "2d6+3", "--seed", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total"));
}

#[test]
fn roll_rejects_an_unsupported_die() {
    cli().args(["roll", "2d7"]).assert().failure();
}

#[test]
fn check_reports_pass_or_fail() {
    cli()
        .args(["check", "--dc", "10", "--modifier", "2", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passed"));
}

#[test]
fn attack_override_twenty_is_a_critical() {
    cli()
        .args([
            "attack",
            "--bonus",
            "5",
            "--ac",
            "35",
            "--override-roll",
            "20",
            "--seed",
            "7",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"is_crit\": true"));
}

#[test]
fn slots_prints_the_level_five_vector() {
    cli()
        .args(["slots", "--level", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4"));
}

#[test]
fn duel_runs_with_builtin_content() {
    cli()
        .args(["duel", "--target", "goblin", "--seed", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("winner="));
}

#[test]
fn aoe_lists_tiles() {
    cli()
        .args([
            "aoe",
            "--shape",
            "cone",
            "--length",
            "15",
            "--direction",
            "east",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("7 tiles"));
}

#[test]
fn save_honors_condition_auto_fail() {
    cli()
        .args([
            "save",
            "--ability",
            "dex",
            "--dc",
            "10",
            "--conditions",
            "paralyzed",
            "--seed",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"auto_fail\": true"));
}

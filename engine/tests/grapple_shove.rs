use rules_engine::combat::actions::{
    attempt_escape_grapple, attempt_grapple, attempt_shove_prone, ManeuverInput,
};
use rules_engine::{ConditionKind, ContestOutcome, Dice};

fn scripted(overrides: (i32, i32)) -> (Dice, ManeuverInput) {
    let input = ManeuverInput {
        attacker_athletics: 3,
        defender_str_mod: 1,
        defender_dex_mod: 2,
        attacker_override_roll: Some(overrides.0),
        defender_override_roll: Some(overrides.1),
    };
    (Dice::from_scripted(vec![]), input)
}

#[test]
fn grapple_applies_grappled_on_win() {
    let (mut dice, input) = scripted((15, 10));
    let mut conds = vec![];
    let res = attempt_grapple(&mut dice, input, &mut conds);
    assert!(res.applied);
    assert_eq!(res.contest.outcome, ContestOutcome::AttackerWins);
    assert!(conds.contains(&ConditionKind::Grappled));
}

#[test]
fn grapple_uses_defender_best_of_str_dex() {
    // Attacker 10+3 = 13 vs defender 11+2 (DEX beats STR) = 13: tie.
    let (mut dice, input) = scripted((10, 11));
    let mut conds = vec![];
    let res = attempt_grapple(&mut dice, input, &mut conds);
    assert_eq!(res.contest.outcome, ContestOutcome::Tie);
    assert!(!res.applied);
    assert!(conds.is_empty());
}

#[test]
fn grapple_never_duplicates_the_condition() {
    let mut conds = vec![ConditionKind::Grappled];
    let (mut dice, input) = scripted((18, 2));
    let res = attempt_grapple(&mut dice, input, &mut conds);
    assert!(res.applied);
    assert_eq!(
        conds
            .iter()
            .filter(|c| **c == ConditionKind::Grappled)
            .count(),
        1
    );
}

#[test]
fn shove_sets_prone_on_win() {
    let (mut dice, input) = scripted((12, 5));
    let mut conds = vec![];
    let res = attempt_shove_prone(&mut dice, input, &mut conds);
    assert!(res.applied);
    assert!(conds.contains(&ConditionKind::Prone));
}

#[test]
fn losing_the_contest_changes_nothing() {
    let (mut dice, input) = scripted((2, 18));
    let mut conds = vec![];
    let res = attempt_shove_prone(&mut dice, input, &mut conds);
    assert_eq!(res.contest.outcome, ContestOutcome::DefenderWins);
    assert!(!res.applied);
    assert!(conds.is_empty());
}

#[test]
fn escape_grapple_removes_the_condition_on_win() {
    let (mut dice, input) = scripted((14, 6));
    let mut conds = vec![ConditionKind::Grappled, ConditionKind::Prone];
    let res = attempt_escape_grapple(&mut dice, input, &mut conds);
    assert!(res.applied);
    assert!(!conds.contains(&ConditionKind::Grappled));
    // Unrelated conditions stay.
    assert!(conds.contains(&ConditionKind::Prone));
}

#[test]
fn failed_escape_stays_grappled() {
    let (mut dice, input) = scripted((4, 16));
    let mut conds = vec![ConditionKind::Grappled];
    let res = attempt_escape_grapple(&mut dice, input, &mut conds);
    assert!(!res.applied);
    assert!(conds.contains(&ConditionKind::Grappled));
}

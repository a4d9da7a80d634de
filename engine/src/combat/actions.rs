//! Contested combat maneuvers: grapple, shove, escape. Each is a contested
//! check where exact ties leave the situation unchanged.

use serde::{Deserialize, Serialize};

use crate::checks::{best_of_str_dex, contested_check, ContestOutcome, ContestResult, ContestSide};
use crate::conditions::ConditionKind;
use crate::dice::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManeuverInput {
    /// Attacker's Athletics (STR) modifier.
    pub attacker_athletics: i32,
    /// Defender contests with the better of Athletics (STR) or
    /// Acrobatics (DEX).
    pub defender_str_mod: i32,
    pub defender_dex_mod: i32,
    #[serde(default)]
    pub attacker_override_roll: Option<i32>,
    #[serde(default)]
    pub defender_override_roll: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManeuverResult {
    pub contest: ContestResult,
    /// True when the condition was applied (or removed, for escapes).
    pub applied: bool,
}

fn run_contest(dice: &mut Dice, input: ManeuverInput) -> ContestResult {
    let (_, defender_mod) = best_of_str_dex(input.defender_str_mod, input.defender_dex_mod);
    contested_check(
        dice,
        ContestSide {
            modifier: input.attacker_athletics,
            override_roll: input.attacker_override_roll,
            ..ContestSide::default()
        },
        ContestSide {
            modifier: defender_mod,
            override_roll: input.defender_override_roll,
            ..ContestSide::default()
        },
    )
}

fn add_condition(conditions: &mut Vec<ConditionKind>, kind: ConditionKind) {
    if !conditions.contains(&kind) {
        conditions.push(kind);
    }
}

/// Grapple: on an attacker win the defender gains Grappled (speed 0).
pub fn attempt_grapple(
    dice: &mut Dice,
    input: ManeuverInput,
    defender_conditions: &mut Vec<ConditionKind>,
) -> ManeuverResult {
    let contest = run_contest(dice, input);
    let applied = contest.outcome == ContestOutcome::AttackerWins;
    if applied {
        add_condition(defender_conditions, ConditionKind::Grappled);
    }
    ManeuverResult { contest, applied }
}

/// Shove: on an attacker win the defender is knocked Prone.
pub fn attempt_shove_prone(
    dice: &mut Dice,
    input: ManeuverInput,
    defender_conditions: &mut Vec<ConditionKind>,
) -> ManeuverResult {
    let contest = run_contest(dice, input);
    let applied = contest.outcome == ContestOutcome::AttackerWins;
    if applied {
        add_condition(defender_conditions, ConditionKind::Prone);
    }
    ManeuverResult { contest, applied }
}

/// Escape a grapple: the grappled creature is the "attacker" of the
/// contest; winning removes Grappled from its own condition list.
pub fn attempt_escape_grapple(
    dice: &mut Dice,
    input: ManeuverInput,
    own_conditions: &mut Vec<ConditionKind>,
) -> ManeuverResult {
    let contest = run_contest(dice, input);
    let applied = contest.outcome == ContestOutcome::AttackerWins;
    if applied {
        own_conditions.retain(|c| *c != ConditionKind::Grappled);
    }
    ManeuverResult { contest, applied }
}

//! Ability checks, saving throws and contested checks.
//!
//! A natural 20 or 1 is reported on every result but only attacks give
//! them special-cased outcomes; checks and saves succeed or fail purely on
//! total vs DC.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conditions::{ConditionEffects, ConditionKind};
use crate::dice::{roll_d20_vantage, Dice, Vantage};
use crate::Ability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInput {
    pub dc: i32,
    pub modifier: i32,
    #[serde(default)]
    pub vantage: Vantage,
    #[serde(default)]
    pub proficient: bool,
    #[serde(default)]
    pub proficiency_bonus: i32,
    #[serde(default)]
    pub override_roll: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub raw_rolls: Vec<i32>,
    pub roll: i32,
    pub total: i32,
    pub dc: i32,
    pub passed: bool,
    pub nat20: bool,
    pub nat1: bool,
}

/// Roll a d20 under the given vantage, add modifier (+proficiency if
/// proficient), succeed iff total >= DC.
pub fn ability_check(dice: &mut Dice, input: CheckInput) -> CheckResult {
    let d20 = roll_d20_vantage(dice, input.vantage, input.override_roll.map(|r| (r, r)));
    let bonus = input.modifier
        + if input.proficient {
            input.proficiency_bonus
        } else {
            0
        };
    let total = d20.roll + bonus;
    debug!(roll = d20.roll, total, dc = input.dc, "ability check");
    CheckResult {
        raw_rolls: d20.raw_rolls,
        roll: d20.roll,
        total,
        dc: input.dc,
        passed: total >= input.dc,
        nat20: d20.nat20,
        nat1: d20.nat1,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveInput {
    pub ability: Ability,
    pub dc: i32,
    pub modifier: i32,
    #[serde(default)]
    pub vantage: Vantage,
    #[serde(default)]
    pub proficient: bool,
    #[serde(default)]
    pub proficiency_bonus: i32,
    #[serde(default)]
    pub conditions: Vec<ConditionKind>,
    #[serde(default)]
    pub override_roll: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub raw_rolls: Vec<i32>,
    pub roll: i32,
    pub total: i32,
    pub dc: i32,
    pub passed: bool,
    pub nat20: bool,
    pub nat1: bool,
    /// True when a condition forced the failure before any die was rolled.
    pub auto_fail: bool,
}

/// A saving throw. Conditions on the saving creature can auto-fail the STR
/// or DEX axis outright (no roll, total 0) and can force disadvantage on
/// top of the explicit vantage.
pub fn saving_throw(dice: &mut Dice, input: SaveInput) -> SaveResult {
    let effects = ConditionEffects::combined(&input.conditions);
    let auto_fail = match input.ability {
        Ability::Str => effects.auto_fail_str_saves,
        Ability::Dex => effects.auto_fail_dex_saves,
        _ => false,
    };
    if auto_fail {
        debug!(ability = ?input.ability, dc = input.dc, "saving throw auto-fails");
        return SaveResult {
            raw_rolls: Vec::new(),
            roll: 0,
            total: 0,
            dc: input.dc,
            passed: false,
            nat20: false,
            nat1: false,
            auto_fail: true,
        };
    }

    let mut vantage = input.vantage;
    if effects.save_disadvantage
        || (input.ability == Ability::Dex && effects.dex_save_disadvantage)
    {
        vantage = vantage.combine(Vantage::Disadvantage);
    }

    let check = ability_check(
        dice,
        CheckInput {
            dc: input.dc,
            modifier: input.modifier,
            vantage,
            proficient: input.proficient,
            proficiency_bonus: input.proficiency_bonus,
            override_roll: input.override_roll,
        },
    );
    SaveResult {
        raw_rolls: check.raw_rolls,
        roll: check.roll,
        total: check.total,
        dc: check.dc,
        passed: check.passed,
        nat20: check.nat20,
        nat1: check.nat1,
        auto_fail: false,
    }
}

/// One side of a contested check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContestSide {
    pub modifier: i32,
    #[serde(default)]
    pub vantage: Vantage,
    #[serde(default)]
    pub override_roll: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestOutcome {
    AttackerWins,
    DefenderWins,
    /// RAW gives no tie policy; the caller must decide what a tie means
    /// for the specific contest.
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestResult {
    pub attacker: CheckResult,
    pub defender: CheckResult,
    pub outcome: ContestOutcome,
}

/// Both sides roll a plain check (DC 0, pure totals); the strictly higher
/// total wins and exact ties stay ties.
pub fn contested_check(
    dice: &mut Dice,
    attacker: ContestSide,
    defender: ContestSide,
) -> ContestResult {
    let roll_side = |dice: &mut Dice, side: ContestSide| {
        ability_check(
            dice,
            CheckInput {
                dc: 0,
                modifier: side.modifier,
                vantage: side.vantage,
                proficient: false,
                proficiency_bonus: 0,
                override_roll: side.override_roll,
            },
        )
    };
    let attacker = roll_side(dice, attacker);
    let defender = roll_side(dice, defender);
    let outcome = if attacker.total > defender.total {
        ContestOutcome::AttackerWins
    } else if defender.total > attacker.total {
        ContestOutcome::DefenderWins
    } else {
        ContestOutcome::Tie
    };
    ContestResult {
        attacker,
        defender,
        outcome,
    }
}

/// Passive score: 10 + modifier (+proficiency), shifted ±5 by uncancelled
/// vantage.
pub fn passive_score(
    modifier: i32,
    proficient: bool,
    proficiency_bonus: i32,
    vantage: Vantage,
) -> i32 {
    let base = 10 + modifier + if proficient { proficiency_bonus } else { 0 };
    match vantage {
        Vantage::Advantage => base + 5,
        Vantage::Disadvantage => base - 5,
        Vantage::Normal => base,
    }
}

/// Defender's better of STR or DEX for grapple/shove style contests.
pub fn best_of_str_dex(str_mod: i32, dex_mod: i32) -> (Ability, i32) {
    if dex_mod > str_mod {
        (Ability::Dex, dex_mod)
    } else {
        (Ability::Str, str_mod)
    }
}

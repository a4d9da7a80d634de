//! Attack resolution, damage with target defenses, and initiative.

pub mod actions;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conditions::{attack_vantage, AttackStyle, ConditionEffects, ConditionKind};
use crate::dice::{roll_d20_vantage, roll_formula, Dice, DiceFormula, Vantage};

/// Adjacency threshold for melee interactions (prone split, auto-crit).
pub const MELEE_RANGE_FT: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cover {
    #[default]
    None,
    Half,
    ThreeQuarters,
}

impl Cover {
    pub fn ac_bonus(self) -> i32 {
        match self {
            Cover::None => 0,
            Cover::Half => 2,
            Cover::ThreeQuarters => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Bludgeoning,
    Piercing,
    Slashing,
    Fire,
    Cold,
    Lightning,
    Acid,
    Poison,
    Psychic,
    Radiant,
    Necrotic,
    Thunder,
    Force,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackInput {
    pub attack_bonus: i32,
    pub target_ac: i32,
    #[serde(default)]
    pub vantage: Vantage,
    #[serde(default)]
    pub cover: Cover,
    #[serde(default)]
    pub override_roll: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub raw_rolls: Vec<i32>,
    pub roll: i32,
    pub total: i32,
    pub ac: i32,
    pub hit: bool,
    pub is_crit: bool,
    pub nat20: bool,
    pub nat1: bool,
}

/// Attack roll vs AC. A natural 20 always hits and is a critical regardless
/// of AC; a natural 1 always misses regardless of total.
pub fn resolve_attack(dice: &mut Dice, input: AttackInput) -> AttackOutcome {
    let d20 = roll_d20_vantage(dice, input.vantage, input.override_roll.map(|r| (r, r)));
    let total = d20.roll + input.attack_bonus;
    let ac = input.target_ac + input.cover.ac_bonus();
    let hit = d20.nat20 || (!d20.nat1 && total >= ac);
    debug!(roll = d20.roll, total, ac, hit, "attack resolved");
    AttackOutcome {
        raw_rolls: d20.raw_rolls,
        roll: d20.roll,
        total,
        ac,
        hit,
        is_crit: d20.nat20,
        nat20: d20.nat20,
        nat1: d20.nat1,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionedAttackInput {
    pub attack: AttackInput,
    /// Distance between attacker and target; decides melee interactions.
    pub distance_ft: i32,
    #[serde(default)]
    pub attacker_conditions: Vec<ConditionKind>,
    #[serde(default)]
    pub defender_conditions: Vec<ConditionKind>,
}

/// Attack roll with vantage derived from both sides' conditions on top of
/// the explicit flags. A hit against a defender whose combined effects
/// include melee auto-crit is promoted to a critical when in reach.
pub fn resolve_attack_with_conditions(
    dice: &mut Dice,
    input: ConditionedAttackInput,
) -> AttackOutcome {
    let melee = input.distance_ft <= MELEE_RANGE_FT;
    let style = if melee {
        AttackStyle::Melee
    } else {
        AttackStyle::Ranged
    };
    let vantage = input.attack.vantage.combine(attack_vantage(
        &input.attacker_conditions,
        &input.defender_conditions,
        style,
    ));
    let mut outcome = resolve_attack(
        dice,
        AttackInput {
            vantage,
            ..input.attack
        },
    );
    let defender = ConditionEffects::combined(&input.defender_conditions);
    if outcome.hit && melee && defender.auto_crit_when_hit_in_melee {
        outcome.is_crit = true;
    }
    outcome
}

/// A target's damage-type defenses. Per check exactly one bucket applies,
/// in precedence order immune, resistant, vulnerable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Defenses {
    #[serde(default)]
    pub resistances: HashSet<DamageType>,
    #[serde(default)]
    pub vulnerabilities: HashSet<DamageType>,
    #[serde(default)]
    pub immunities: HashSet<DamageType>,
}

impl Defenses {
    fn classify(&self, damage_type: DamageType) -> DamageModifier {
        if self.immunities.contains(&damage_type) {
            DamageModifier::Immune
        } else if self.resistances.contains(&damage_type) {
            DamageModifier::Resistant
        } else if self.vulnerabilities.contains(&damage_type) {
            DamageModifier::Vulnerable
        } else {
            DamageModifier::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DamageModifier {
    Immune,
    Resistant,
    Vulnerable,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageInput {
    pub dice: DiceFormula,
    pub damage_type: DamageType,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub override_roll: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub rolls: Vec<i32>,
    pub damage_type: DamageType,
    pub base_damage: i32,
    pub final_damage: i32,
    pub was_immune: bool,
    pub was_resisted: bool,
    pub was_vulnerable: bool,
}

/// Roll damage (doubled die count on a critical) and apply the target's
/// single applicable defense bucket.
pub fn resolve_damage(
    dice: &mut Dice,
    input: DamageInput,
    defenses: Option<&Defenses>,
) -> DamageOutcome {
    let formula = if input.is_critical {
        input.dice.critical()
    } else {
        input.dice
    };
    let roll = roll_formula(dice, formula, input.override_roll);
    let base_damage = roll.total.max(0);
    let modifier = defenses
        .map(|d| d.classify(input.damage_type))
        .unwrap_or(DamageModifier::Normal);
    let final_damage = match modifier {
        DamageModifier::Immune => 0,
        DamageModifier::Resistant => base_damage / 2,
        DamageModifier::Vulnerable => base_damage * 2,
        DamageModifier::Normal => base_damage,
    };
    debug!(
        damage_type = ?input.damage_type,
        base_damage, final_damage, "damage resolved"
    );
    DamageOutcome {
        rolls: roll.rolls,
        damage_type: input.damage_type,
        base_damage,
        final_damage,
        was_immune: modifier == DamageModifier::Immune,
        was_resisted: modifier == DamageModifier::Resistant,
        was_vulnerable: modifier == DamageModifier::Vulnerable,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    pub roll: i32,
    pub total: i32,
}

/// d20 + DEX modifier.
pub fn roll_initiative(
    dice: &mut Dice,
    dex_mod: i32,
    override_roll: Option<i32>,
) -> InitiativeRoll {
    let roll = match override_roll {
        Some(r) => r,
        None => dice.d20(Vantage::Normal),
    };
    InitiativeRoll {
        roll,
        total: roll + dex_mod,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    pub name: String,
    pub total: i32,
    pub dex_score: i32,
}

/// Descending by total, ties broken by higher DEX score, stable beyond
/// that.
pub fn sort_by_initiative(entries: &mut [InitiativeEntry]) {
    entries.sort_by(|a, b| b.total.cmp(&a.total).then(b.dex_score.cmp(&a.dex_score)));
}

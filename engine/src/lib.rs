//! Deterministic, side-effect-free rules interpreter for tabletop 5e-style
//! mechanics: dice, checks, saves, conditions, combat, death saves and
//! spellcasting. Every operation is a pure function of its inputs plus an
//! explicit caller-owned [`Dice`] rolling context.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub mod aoe;
pub mod api;
pub mod checks;
pub mod combat;
pub mod conditions;
pub mod content;
pub mod dice;
pub mod errors;
pub mod life;
pub mod spells;

pub use checks::{
    ability_check, contested_check, passive_score, saving_throw, CheckInput, CheckResult,
    ContestOutcome, ContestResult, ContestSide, SaveInput, SaveResult,
};
pub use combat::{
    resolve_attack, resolve_attack_with_conditions, resolve_damage, roll_initiative,
    sort_by_initiative, AttackInput, AttackOutcome, ConditionedAttackInput, Cover, DamageInput,
    DamageOutcome, DamageType, Defenses, InitiativeEntry, InitiativeRoll,
};
pub use conditions::{
    attack_vantage, exhaustion_effects, AttackStyle, ConditionEffects, ConditionKind,
};
pub use dice::{
    roll_d20_vantage, roll_formula, D20Roll, Dice, DiceFormula, DieSize, RollResult, Vantage,
};
pub use errors::RulesError;

/// The six ability axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

/// Raw ability scores. Modifiers are always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub str_: i32,
    pub dex: i32,
    pub con: i32,
    pub int_: i32,
    pub wis: i32,
    pub cha: i32,
}

impl AbilityScores {
    pub fn score_of(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str_,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int_,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    pub fn mod_of(&self, ability: Ability) -> i32 {
        ability_mod(self.score_of(ability))
    }
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - 10).div_euclid(2)
}

/// Proficiency bonus by character level (+2 at 1-4, +3 at 5-8, ...).
pub fn proficiency_bonus(level: u8) -> i32 {
    (level.max(1) as i32 - 1) / 4 + 2
}

/// The 18 standard skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    /// The ability each skill keys off.
    pub fn ability(self) -> Ability {
        use Skill::*;
        match self {
            Athletics => Ability::Str,
            Acrobatics | SleightOfHand | Stealth => Ability::Dex,
            Arcana | History | Investigation | Nature | Religion => Ability::Int,
            AnimalHandling | Insight | Medicine | Perception | Survival => Ability::Wis,
            Deception | Intimidation | Performance | Persuasion => Ability::Cha,
        }
    }

    /// Lookup by snake_case name. Unknown names have no mapping; the caller
    /// decides what to do with `None`.
    pub fn from_name(name: &str) -> Option<Skill> {
        use Skill::*;
        match name.trim().to_ascii_lowercase().as_str() {
            "acrobatics" => Some(Acrobatics),
            "animal_handling" => Some(AnimalHandling),
            "arcana" => Some(Arcana),
            "athletics" => Some(Athletics),
            "deception" => Some(Deception),
            "history" => Some(History),
            "insight" => Some(Insight),
            "intimidation" => Some(Intimidation),
            "investigation" => Some(Investigation),
            "medicine" => Some(Medicine),
            "nature" => Some(Nature),
            "perception" => Some(Perception),
            "performance" => Some(Performance),
            "persuasion" => Some(Persuasion),
            "religion" => Some(Religion),
            "sleight_of_hand" => Some(SleightOfHand),
            "stealth" => Some(Stealth),
            "survival" => Some(Survival),
            _ => None,
        }
    }
}

/// A saving throw demand: which axis, against what DC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrow {
    pub ability: Ability,
    pub dc: i32,
}

/// A creature's check-relevant sheet: scores plus proficiencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub abilities: AbilityScores,
    pub proficiency_bonus: i32,
    #[serde(default)]
    pub save_proficiencies: HashSet<Ability>,
    #[serde(default)]
    pub skill_proficiencies: HashSet<Skill>,
}

impl Actor {
    pub fn ability_mod(&self, ability: Ability) -> i32 {
        self.abilities.mod_of(ability)
    }

    pub fn save_mod(&self, ability: Ability) -> i32 {
        let prof = if self.save_proficiencies.contains(&ability) {
            self.proficiency_bonus
        } else {
            0
        };
        self.ability_mod(ability) + prof
    }

    pub fn skill_mod(&self, skill: Skill) -> i32 {
        let prof = if self.skill_proficiencies.contains(&skill) {
            self.proficiency_bonus
        } else {
            0
        };
        self.ability_mod(skill.ability()) + prof
    }

    pub fn skill_check(
        &self,
        dice: &mut Dice,
        skill: Skill,
        vantage: Vantage,
        dc: i32,
    ) -> CheckResult {
        ability_check(
            dice,
            CheckInput {
                dc,
                modifier: self.skill_mod(skill),
                vantage,
                proficient: false,
                proficiency_bonus: 0,
                override_roll: None,
            },
        )
    }

    pub fn saving_throw(
        &self,
        dice: &mut Dice,
        ability: Ability,
        dc: i32,
        vantage: Vantage,
        conditions: &[ConditionKind],
    ) -> SaveResult {
        saving_throw(
            dice,
            SaveInput {
                ability,
                dc,
                modifier: self.ability_mod(ability),
                vantage,
                proficient: self.save_proficiencies.contains(&ability),
                proficiency_bonus: self.proficiency_bonus,
                conditions: conditions.to_vec(),
                override_roll: None,
            },
        )
    }
}

/// Install a plain fmt subscriber; repeated calls are a no-op.
pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

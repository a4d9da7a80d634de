//! Spellcasting mechanics: save DC and attack bonus, the full-caster slot
//! table, concentration checks, cantrip scaling and upcast damage.

use serde::{Deserialize, Serialize};

use crate::dice::{Dice, DiceFormula, Vantage};
use crate::errors::RulesError;

pub fn spell_save_dc(proficiency_bonus: i32, ability_mod: i32) -> i32 {
    8 + proficiency_bonus + ability_mod
}

pub fn spell_attack_bonus(proficiency_bonus: i32, ability_mod: i32) -> i32 {
    proficiency_bonus + ability_mod
}

/// Slot counts for spell levels 1..=9, index 0 holding level 1.
/// Invariant: each count stays within 0..=table maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellSlots(pub [u8; 9]);

impl SpellSlots {
    pub fn slot(&self, level: u8) -> Result<u8, RulesError> {
        Ok(self.0[slot_index(level)?])
    }

    /// Consume one slot of `level`, returning the reduced copy; the input
    /// is never touched. Consuming at 0 is a contract violation.
    pub fn use_slot(&self, level: u8) -> Result<SpellSlots, RulesError> {
        let idx = slot_index(level)?;
        if self.0[idx] == 0 {
            return Err(RulesError::NoSlotAvailable { level });
        }
        let mut next = *self;
        next.0[idx] -= 1;
        Ok(next)
    }

    /// Regain one slot of `level`, clamped at the given maximum vector.
    /// Returns the increased copy.
    pub fn restore_slot(&self, level: u8, max: &SpellSlots) -> Result<SpellSlots, RulesError> {
        let idx = slot_index(level)?;
        let mut next = *self;
        next.0[idx] = (next.0[idx] + 1).min(max.0[idx]);
        Ok(next)
    }
}

fn slot_index(level: u8) -> Result<usize, RulesError> {
    if (1..=9).contains(&level) {
        Ok((level - 1) as usize)
    } else {
        Err(RulesError::InvalidSpellLevel(level))
    }
}

/// Standard full-caster progression, rows indexed by caster level 1..=20.
const FULL_CASTER_SLOTS: [[u8; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

/// Slot vector for a full caster of the given level, clamped to 1..=20.
pub fn full_caster_slots(caster_level: u8) -> SpellSlots {
    let level = caster_level.clamp(1, 20);
    SpellSlots(FULL_CASTER_SLOTS[(level - 1) as usize])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationResult {
    pub dc: i32,
    pub roll: i32,
    pub total: i32,
    pub maintained: bool,
}

/// Concentration check after taking damage: DC = max(10, damage / 2),
/// success iff d20 + CON modifier >= DC.
pub fn concentration_check(
    dice: &mut Dice,
    damage: i32,
    constitution_mod: i32,
    override_roll: Option<i32>,
) -> ConcentrationResult {
    let dc = (damage / 2).max(10);
    let roll = match override_roll {
        Some(r) => r,
        None => dice.d20(Vantage::Normal),
    };
    let total = roll + constitution_mod;
    ConcentrationResult {
        dc,
        roll,
        total,
        maintained: total >= dc,
    }
}

/// Cantrip damage scales by character level: die count x2 at 5, x3 at 11,
/// x4 at 17. Die size never changes.
pub fn cantrip_dice(base: DiceFormula, character_level: u8) -> DiceFormula {
    let multiplier = if character_level >= 17 {
        4
    } else if character_level >= 11 {
        3
    } else if character_level >= 5 {
        2
    } else {
        1
    };
    DiceFormula {
        count: base.count * multiplier,
        ..base
    }
}

/// Combine base damage with upcast bonus dice. A matching die size folds
/// into a single summed term; a different size stays a separate additive
/// term.
pub fn upcast_damage(
    base: DiceFormula,
    per_level: DiceFormula,
    levels_above: u8,
) -> Vec<DiceFormula> {
    let bonus_count = per_level.count * levels_above as u32;
    if bonus_count == 0 {
        return vec![base];
    }
    if per_level.size == base.size {
        vec![DiceFormula {
            count: base.count + bonus_count,
            ..base
        }]
    } else {
        vec![
            base,
            DiceFormula {
                count: bonus_count,
                size: per_level.size,
                modifier: per_level.modifier * levels_above as i32,
            },
        ]
    }
}

//! Hit points, temporary hit points and the death-save state machine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dice::{Dice, DieSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    Conscious,
    Unconscious { stable: bool },
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeathSaves {
    pub successes: u8, // 0..=3
    pub failures: u8,  // 0..=3
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub max_hp: i32,
    #[serde(default)]
    pub temp_hp: i32,
    pub state: LifeState,
    #[serde(default)]
    pub death: DeathSaves,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            temp_hp: 0,
            state: LifeState::Conscious,
            death: DeathSaves::default(),
        }
    }
}

/// What one application of damage did to a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageApplication {
    pub hp: i32,
    pub temp_hp: i32,
    pub absorbed_by_temp: i32,
    /// Damage beyond the HP that was left, reported for the
    /// massive-damage check; never applied automatically.
    pub excess_damage: i32,
    pub dropped_to_zero: bool,
}

/// Apply damage: temporary HP absorbs first and is consumed to zero before
/// real HP is touched; HP clamps at 0 with the excess reported.
pub fn apply_damage(health: &mut Health, damage: i32) -> DamageApplication {
    let damage = damage.max(0);
    let absorbed = damage.min(health.temp_hp);
    health.temp_hp -= absorbed;
    let remaining = damage - absorbed;
    let before = health.hp;
    health.hp = (health.hp - remaining).max(0);
    let excess = (remaining - before).max(0);
    let dropped = before > 0 && health.hp == 0;
    if dropped {
        health.state = LifeState::Unconscious { stable: false };
    }
    debug!(
        damage,
        absorbed,
        hp = health.hp,
        excess,
        "damage applied"
    );
    DamageApplication {
        hp: health.hp,
        temp_hp: health.temp_hp,
        absorbed_by_temp: absorbed,
        excess_damage: excess,
        dropped_to_zero: dropped,
    }
}

/// Massive damage: instant death when the excess reaches the creature's
/// maximum HP.
pub fn check_instant_death(max_hp: i32, excess_damage: i32) -> bool {
    max_hp > 0 && excess_damage >= max_hp
}

/// Healing; an unconscious creature brought above 0 wakes with death saves
/// reset. Healing never exceeds max HP and never touches temporary HP.
pub fn heal(health: &mut Health, amount: i32) {
    if amount <= 0 || matches!(health.state, LifeState::Dead) {
        return;
    }
    health.hp = (health.hp + amount).min(health.max_hp);
    if matches!(health.state, LifeState::Unconscious { .. }) && health.hp > 0 {
        health.state = LifeState::Conscious;
        health.death = DeathSaves::default();
    }
}

/// Temporary HP does not stack: the larger pool wins.
pub fn grant_temp_hp(health: &mut Health, amount: i32) {
    health.temp_hp = health.temp_hp.max(amount.max(0));
}

/// Stabilize an unconscious creature at 0 HP (no more death saves).
pub fn stabilize(health: &mut Health) {
    if let LifeState::Unconscious { .. } = health.state {
        health.state = LifeState::Unconscious { stable: true };
    }
}

/// One death-save die, expressed as counter deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaveRoll {
    pub roll: i32,
    pub successes_added: u8,
    pub failures_added: u8,
    /// Natural 20: back to 1 HP, both counters reset.
    pub regained_consciousness: bool,
}

/// Natural 1 counts two failures; natural 20 revives at 1 HP; 10+ is a
/// success; anything else a failure.
pub fn roll_death_save(dice: &mut Dice, override_roll: Option<i32>) -> DeathSaveRoll {
    let roll = match override_roll {
        Some(r) => r,
        None => dice.die(DieSize::D20),
    };
    let (successes_added, failures_added, regained) = if roll == 20 {
        (0, 0, true)
    } else if roll == 1 {
        (0, 2, false)
    } else if roll >= 10 {
        (1, 0, false)
    } else {
        (0, 1, false)
    };
    DeathSaveRoll {
        roll,
        successes_added,
        failures_added,
        regained_consciousness: regained,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathSaveStatus {
    InProgress,
    /// Three successes: unconscious but out of danger. Reset on the next
    /// damage taken is the caller's responsibility.
    Stabilized,
    /// Three failures: terminal.
    Dead,
    Revived,
}

/// Accumulate a rolled death save onto the counters. Three failures kill,
/// three successes stabilize, a revival zeroes both counters.
pub fn process_death_save(death: &mut DeathSaves, rolled: DeathSaveRoll) -> DeathSaveStatus {
    if rolled.regained_consciousness {
        *death = DeathSaves::default();
        return DeathSaveStatus::Revived;
    }
    death.successes = (death.successes + rolled.successes_added).min(3);
    death.failures = (death.failures + rolled.failures_added).min(3);
    if death.failures >= 3 {
        DeathSaveStatus::Dead
    } else if death.successes >= 3 {
        DeathSaveStatus::Stabilized
    } else {
        DeathSaveStatus::InProgress
    }
}

/// Roll and apply the start-of-turn death save for a dying creature,
/// carrying out the state transition. Returns `None` when no save is due
/// (conscious, stable or dead).
pub fn process_death_save_turn(
    health: &mut Health,
    dice: &mut Dice,
    override_roll: Option<i32>,
) -> Option<(DeathSaveRoll, DeathSaveStatus)> {
    match health.state {
        LifeState::Unconscious { stable } if !stable && health.hp == 0 => {
            let rolled = roll_death_save(dice, override_roll);
            let status = process_death_save(&mut health.death, rolled);
            match status {
                DeathSaveStatus::Revived => {
                    health.hp = 1;
                    health.state = LifeState::Conscious;
                }
                DeathSaveStatus::Dead => health.state = LifeState::Dead,
                DeathSaveStatus::Stabilized => {
                    health.state = LifeState::Unconscious { stable: true }
                }
                DeathSaveStatus::InProgress => {}
            }
            debug!(roll = rolled.roll, ?status, "death save");
            Some((rolled, status))
        }
        _ => None,
    }
}

//! Condition effect registry: each status condition maps to a fixed bundle
//! of mechanical flags, combined across simultaneous conditions by a
//! field-wise OR. Profiles are pure data; resolvers read them to decide
//! vantage, auto-fails and critical promotion.

use serde::{Deserialize, Serialize};

use crate::dice::Vantage;

/// The 15 named conditions (PHB appendix A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Blinded,
    Charmed,
    Deafened,
    Exhaustion,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
}

/// Mechanical consequences of one or more conditions. Every field is
/// monotonic: once any active condition sets it, it stays set through
/// [`ConditionEffects::combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionEffects {
    pub cannot_act: bool,
    pub cannot_react: bool,
    pub cannot_move: bool,
    pub cannot_speak: bool,
    pub cannot_see: bool,
    pub cannot_hear: bool,
    /// May not attack or target the source of the condition (charmer).
    pub cannot_target_source: bool,
    /// May not willingly move closer to the source (frightener).
    pub cannot_approach_source: bool,
    /// The creature's own attack rolls.
    pub attack_disadvantage: bool,
    pub attack_advantage: bool,
    /// Attack rolls against the creature.
    pub attacked_advantage: bool,
    pub attacked_disadvantage: bool,
    pub check_disadvantage: bool,
    pub save_disadvantage: bool,
    pub dex_save_disadvantage: bool,
    pub auto_fail_str_saves: bool,
    pub auto_fail_dex_saves: bool,
    /// Any hit from within 5 ft is a critical hit.
    pub auto_crit_when_hit_in_melee: bool,
    pub resist_all_damage: bool,
    pub speed_halved: bool,
    pub speed_zero: bool,
    /// Exhaustion 4+. The caller applies the halving; this core never
    /// mutates max HP.
    pub hp_max_halved: bool,
    /// Exhaustion 6. Death is entity state owned by the caller.
    pub dead: bool,
}

impl ConditionEffects {
    /// Field-wise OR. Associative and commutative, so folding a condition
    /// list is order-independent.
    pub fn combine(self, other: Self) -> Self {
        Self {
            cannot_act: self.cannot_act || other.cannot_act,
            cannot_react: self.cannot_react || other.cannot_react,
            cannot_move: self.cannot_move || other.cannot_move,
            cannot_speak: self.cannot_speak || other.cannot_speak,
            cannot_see: self.cannot_see || other.cannot_see,
            cannot_hear: self.cannot_hear || other.cannot_hear,
            cannot_target_source: self.cannot_target_source || other.cannot_target_source,
            cannot_approach_source: self.cannot_approach_source || other.cannot_approach_source,
            attack_disadvantage: self.attack_disadvantage || other.attack_disadvantage,
            attack_advantage: self.attack_advantage || other.attack_advantage,
            attacked_advantage: self.attacked_advantage || other.attacked_advantage,
            attacked_disadvantage: self.attacked_disadvantage || other.attacked_disadvantage,
            check_disadvantage: self.check_disadvantage || other.check_disadvantage,
            save_disadvantage: self.save_disadvantage || other.save_disadvantage,
            dex_save_disadvantage: self.dex_save_disadvantage || other.dex_save_disadvantage,
            auto_fail_str_saves: self.auto_fail_str_saves || other.auto_fail_str_saves,
            auto_fail_dex_saves: self.auto_fail_dex_saves || other.auto_fail_dex_saves,
            auto_crit_when_hit_in_melee: self.auto_crit_when_hit_in_melee
                || other.auto_crit_when_hit_in_melee,
            resist_all_damage: self.resist_all_damage || other.resist_all_damage,
            speed_halved: self.speed_halved || other.speed_halved,
            speed_zero: self.speed_zero || other.speed_zero,
            hp_max_halved: self.hp_max_halved || other.hp_max_halved,
            dead: self.dead || other.dead,
        }
    }

    /// Fold the profiles of every active condition.
    pub fn combined(conditions: &[ConditionKind]) -> Self {
        conditions
            .iter()
            .fold(Self::default(), |acc, c| acc.combine(c.effects()))
    }
}

impl ConditionKind {
    /// The fixed mechanical profile for this condition.
    pub fn effects(self) -> ConditionEffects {
        let none = ConditionEffects::default();
        match self {
            // PHB p.290: can't see, auto-fails sight checks; attack rolls
            // against it have advantage, its attacks have disadvantage.
            ConditionKind::Blinded => ConditionEffects {
                cannot_see: true,
                attack_disadvantage: true,
                attacked_advantage: true,
                ..none
            },
            // PHB p.290: can't attack the charmer or target them with
            // harmful effects. The social-check advantage belongs to the
            // charmer, not this creature.
            ConditionKind::Charmed => ConditionEffects {
                cannot_target_source: true,
                ..none
            },
            // PHB p.290: can't hear, auto-fails hearing checks.
            ConditionKind::Deafened => ConditionEffects {
                cannot_hear: true,
                ..none
            },
            // PHB p.291: level-gated. The bare condition reads as level 1;
            // callers tracking a level use `exhaustion_effects`.
            ConditionKind::Exhaustion => exhaustion_effects(1),
            // PHB p.290: disadvantage on checks and attacks while the source
            // is in sight; can't willingly approach the source.
            ConditionKind::Frightened => ConditionEffects {
                attack_disadvantage: true,
                check_disadvantage: true,
                cannot_approach_source: true,
                ..none
            },
            // PHB p.290: speed 0, no bonus from any source.
            ConditionKind::Grappled => ConditionEffects {
                speed_zero: true,
                ..none
            },
            // PHB p.290: can't take actions or reactions.
            ConditionKind::Incapacitated => ConditionEffects {
                cannot_act: true,
                cannot_react: true,
                ..none
            },
            // PHB p.291: attacks against it have disadvantage, its attacks
            // have advantage.
            ConditionKind::Invisible => ConditionEffects {
                attack_advantage: true,
                attacked_disadvantage: true,
                ..none
            },
            // PHB p.291: incapacitated, can't move or speak, auto-fails STR
            // and DEX saves, attacked at advantage, hits from within 5 ft
            // are criticals.
            ConditionKind::Paralyzed => ConditionEffects {
                cannot_act: true,
                cannot_react: true,
                cannot_move: true,
                cannot_speak: true,
                auto_fail_str_saves: true,
                auto_fail_dex_saves: true,
                attacked_advantage: true,
                auto_crit_when_hit_in_melee: true,
                ..none
            },
            // PHB p.291: incapacitated, can't move or speak, auto-fails STR
            // and DEX saves, attacked at advantage, resistance to all damage.
            ConditionKind::Petrified => ConditionEffects {
                cannot_act: true,
                cannot_react: true,
                cannot_move: true,
                cannot_speak: true,
                auto_fail_str_saves: true,
                auto_fail_dex_saves: true,
                attacked_advantage: true,
                resist_all_damage: true,
                ..none
            },
            // PHB p.292: disadvantage on attack rolls and ability checks.
            ConditionKind::Poisoned => ConditionEffects {
                attack_disadvantage: true,
                check_disadvantage: true,
                ..none
            },
            // PHB p.292: its attacks have disadvantage; attacks against it
            // split by range (advantage within 5 ft, disadvantage beyond),
            // which `attack_vantage` handles because a flat flag can't.
            ConditionKind::Prone => ConditionEffects {
                attack_disadvantage: true,
                ..none
            },
            // PHB p.292: speed 0, attacks against it have advantage, its
            // attacks and DEX saves have disadvantage.
            ConditionKind::Restrained => ConditionEffects {
                speed_zero: true,
                attack_disadvantage: true,
                attacked_advantage: true,
                dex_save_disadvantage: true,
                ..none
            },
            // PHB p.292: incapacitated, can't move, speaks falteringly,
            // auto-fails STR and DEX saves, attacked at advantage.
            ConditionKind::Stunned => ConditionEffects {
                cannot_act: true,
                cannot_react: true,
                cannot_move: true,
                auto_fail_str_saves: true,
                auto_fail_dex_saves: true,
                attacked_advantage: true,
                ..none
            },
            // PHB p.292: incapacitated, can't move or speak, unaware,
            // auto-fails STR and DEX saves, attacked at advantage, hits from
            // within 5 ft are criticals.
            ConditionKind::Unconscious => ConditionEffects {
                cannot_act: true,
                cannot_react: true,
                cannot_move: true,
                cannot_speak: true,
                auto_fail_str_saves: true,
                auto_fail_dex_saves: true,
                attacked_advantage: true,
                auto_crit_when_hit_in_melee: true,
                ..none
            },
        }
    }

    pub fn from_name(name: &str) -> Option<ConditionKind> {
        use ConditionKind::*;
        match name.trim().to_ascii_lowercase().as_str() {
            "blinded" => Some(Blinded),
            "charmed" => Some(Charmed),
            "deafened" => Some(Deafened),
            "exhaustion" => Some(Exhaustion),
            "frightened" => Some(Frightened),
            "grappled" => Some(Grappled),
            "incapacitated" => Some(Incapacitated),
            "invisible" => Some(Invisible),
            "paralyzed" => Some(Paralyzed),
            "petrified" => Some(Petrified),
            "poisoned" => Some(Poisoned),
            "prone" => Some(Prone),
            "restrained" => Some(Restrained),
            "stunned" => Some(Stunned),
            "unconscious" => Some(Unconscious),
            _ => None,
        }
    }
}

/// Cumulative exhaustion profile (PHB p.291). Levels stack: a level-3
/// creature also carries levels 1 and 2. Level is clamped to 0..=6.
pub fn exhaustion_effects(level: u8) -> ConditionEffects {
    let level = level.min(6);
    let mut effects = ConditionEffects::default();
    if level >= 1 {
        effects.check_disadvantage = true;
    }
    if level >= 2 {
        effects.speed_halved = true;
    }
    if level >= 3 {
        effects.attack_disadvantage = true;
        effects.save_disadvantage = true;
    }
    if level >= 4 {
        effects.hp_max_halved = true;
    }
    if level >= 5 {
        effects.speed_zero = true;
    }
    if level >= 6 {
        effects.dead = true;
    }
    effects
}

/// Whether the attack is melee or ranged (the prone interaction splits on
/// it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStyle {
    Melee,
    Ranged,
}

/// Net vantage an attack roll picks up from both sides' conditions.
///
/// Prone defenders are range-split (advantage in melee, disadvantage at
/// range) and handled by kind rather than by profile flag.
pub fn attack_vantage(
    attacker_conditions: &[ConditionKind],
    defender_conditions: &[ConditionKind],
    style: AttackStyle,
) -> Vantage {
    let mut net = Vantage::Normal;

    let attacker = ConditionEffects::combined(attacker_conditions);
    if attacker.attack_disadvantage {
        net = net.combine(Vantage::Disadvantage);
    }
    if attacker.attack_advantage {
        net = net.combine(Vantage::Advantage);
    }

    let defender = ConditionEffects::combined(defender_conditions);
    if defender.attacked_advantage {
        net = net.combine(Vantage::Advantage);
    }
    if defender.attacked_disadvantage {
        net = net.combine(Vantage::Disadvantage);
    }

    if defender_conditions.contains(&ConditionKind::Prone) {
        net = net.combine(match style {
            AttackStyle::Melee => Vantage::Advantage,
            AttackStyle::Ranged => Vantage::Disadvantage,
        });
    }

    net
}

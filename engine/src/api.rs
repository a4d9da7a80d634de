//! Scenario layer: a seeded one-on-one duel that exercises initiative,
//! condition-aware attacks, defenses, temporary HP and death saves in one
//! deterministic run. Configs and content arrive as strings or built-in
//! ids; this module never touches the filesystem.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::{
    resolve_attack_with_conditions, resolve_damage, roll_initiative, sort_by_initiative,
    AttackInput, AttackOutcome, ConditionedAttackInput, Cover, DamageInput, DamageType, Defenses,
    InitiativeEntry, MELEE_RANGE_FT,
};
use crate::conditions::ConditionKind;
use crate::content::{builtin_targets, builtin_weapons};
use crate::dice::{Dice, DiceFormula, Vantage};
use crate::errors::RulesError;
use crate::life::{
    apply_damage, check_instant_death, process_death_save_turn, DeathSaveStatus, Health, LifeState,
};
use crate::{Ability, AbilityScores, Actor, Skill};

const DEFAULT_ACTOR_AC: i32 = 16;
const DEFAULT_ACTOR_HP: i32 = 12;
const RANGED_DISTANCE_FT: i32 = 30;
const MAX_ROUNDS: u32 = 30;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Weapon {
    pub name: String,
    pub dice: DiceFormula,
    #[serde(default)]
    pub versatile: Option<DiceFormula>,
    #[serde(default)]
    pub finesse: bool,
    #[serde(default)]
    pub ranged: bool,
    #[serde(default)]
    pub damage_type: Option<DamageType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelConfig {
    /// Built-in target id, or...
    #[serde(default)]
    pub target_id: Option<String>,
    /// ...an inline target JSON document.
    #[serde(default)]
    pub target_json: Option<String>,
    #[serde(default)]
    pub weapons_id: Option<String>,
    #[serde(default)]
    pub weapons_json: Option<String>,
    pub weapon: String,
    #[serde(default)]
    pub actor_conditions: Vec<ConditionKind>,
    #[serde(default)]
    pub enemy_conditions: Vec<ConditionKind>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub actor_hp: Option<i32>,
    #[serde(default)]
    pub actor_temp_hp: i32,
}

impl DuelConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse duel config JSON")
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse duel config YAML")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelResult {
    pub winner: String,
    pub rounds: u32,
    pub actor_hp_end: i32,
    pub enemy_hp_end: i32,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelStats {
    pub samples: u32,
    pub actor_wins: u32,
    pub enemy_wins: u32,
    pub draws: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct TargetAttack {
    name: String,
    to_hit: i32,
    dice: DiceFormula,
    #[serde(default)]
    damage_type: Option<DamageType>,
    #[serde(default)]
    ranged: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct TargetData {
    name: String,
    ac: i32,
    hp: i32,
    #[serde(default)]
    dex_mod: i32,
    #[serde(default)]
    abilities: Option<AbilityScores>,
    #[serde(default)]
    attacks: Vec<TargetAttack>,
    #[serde(flatten)]
    defenses: Defenses,
    #[serde(default)]
    conditions: Vec<ConditionKind>,
    #[serde(default)]
    cover: Cover,
}

impl TargetData {
    fn dexterity_mod(&self) -> i32 {
        match &self.abilities {
            Some(scores) => scores.mod_of(Ability::Dex),
            None => self.dex_mod,
        }
    }

    fn dexterity_score(&self) -> i32 {
        match &self.abilities {
            Some(scores) => scores.dex,
            None => 10 + self.dex_mod * 2,
        }
    }
}

pub fn simulate_duel(cfg: DuelConfig) -> Result<DuelResult> {
    let mut logs = Vec::new();

    let target = resolve_target(&cfg)?;
    if target.attacks.is_empty() {
        bail!("target '{}' has no attacks", target.name);
    }
    let target_attack = target.attacks[0].clone();

    let weapons = resolve_weapons(&cfg)?;
    let weapon = weapons
        .iter()
        .find(|w| w.name.eq_ignore_ascii_case(&cfg.weapon))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("weapon '{}' not found", cfg.weapon))?;

    let actor = sample_fighter();
    let mut actor_health = Health::new(cfg.actor_hp.unwrap_or(DEFAULT_ACTOR_HP));
    if cfg.actor_temp_hp > 0 {
        crate::life::grant_temp_hp(&mut actor_health, cfg.actor_temp_hp);
        logs.push(format!("[TEMP][Actor] {} temporary HP", actor_health.temp_hp));
    }
    let mut enemy_health = Health::new(target.hp);

    let weapon_dice = weapon.versatile.unwrap_or(weapon.dice);
    let weapon_damage_type = weapon.damage_type.unwrap_or(DamageType::Slashing);
    let attack_ability = if weapon.ranged || weapon.finesse {
        Ability::Dex
    } else {
        Ability::Str
    };
    let attack_bonus = actor.ability_mod(attack_ability) + actor.proficiency_bonus;
    let damage_mod = actor.ability_mod(attack_ability);
    let actor_distance_ft = if weapon.ranged {
        RANGED_DISTANCE_FT
    } else {
        MELEE_RANGE_FT
    };

    let actor_conditions = cfg.actor_conditions.clone();
    for cond in &actor_conditions {
        logs.push(format!("[COND][Actor] starts with {:?}", cond));
    }
    let mut enemy_conditions = target.conditions.clone();
    enemy_conditions.extend(cfg.enemy_conditions.iter().copied());
    for cond in &enemy_conditions {
        logs.push(format!("[COND][{}] starts with {:?}", target.name, cond));
    }

    let mut dice = Dice::from_seed(cfg.seed);

    let actor_init = roll_initiative(&mut dice, actor.ability_mod(Ability::Dex), None);
    let enemy_init = roll_initiative(&mut dice, target.dexterity_mod(), None);
    let mut order = vec![
        InitiativeEntry {
            name: "Actor".to_string(),
            total: actor_init.total,
            dex_score: actor.abilities.dex,
        },
        InitiativeEntry {
            name: target.name.clone(),
            total: enemy_init.total,
            dex_score: target.dexterity_score(),
        },
    ];
    sort_by_initiative(&mut order);
    let mut actor_turn = order[0].name == "Actor";

    logs.push(format!(
        "[START] Actor (AC {}, HP {}) vs {} (AC {}, HP {})",
        DEFAULT_ACTOR_AC, actor_health.hp, target.name, target.ac, target.hp
    ));
    logs.push(format!(
        "[INIT] Actor {} vs {} {} -> {} starts",
        actor_init.total, target.name, enemy_init.total, order[0].name
    ));

    let mut rounds = 0u32;
    while rounds < MAX_ROUNDS
        && !matches!(actor_health.state, LifeState::Dead)
        && !matches!(enemy_health.state, LifeState::Dead)
        && enemy_health.hp > 0
    {
        rounds += 1;
        let turn_name = if actor_turn {
            "Actor"
        } else {
            target.name.as_str()
        };
        logs.push(format!("[ROUND] {} -> {}", rounds, turn_name));

        if actor_turn {
            if let Some((rolled, status)) =
                process_death_save_turn(&mut actor_health, &mut dice, None)
            {
                logs.push(format!(
                    "[DEATHSAVE][Actor] roll={} -> {:?} (S={}, F={})",
                    rolled.roll, status, actor_health.death.successes, actor_health.death.failures
                ));
                if status == DeathSaveStatus::Revived {
                    logs.push("[STATE][Actor] regains 1 HP and wakes".to_string());
                }
            }

            match actor_health.state {
                LifeState::Dead => logs.push("[TURN][Actor] is dead; skipping".to_string()),
                LifeState::Unconscious { .. } => {
                    logs.push("[TURN][Actor] is unconscious; skipping actions".to_string())
                }
                LifeState::Conscious => {
                    log_defense(&mut logs, &target.name, target.ac, target.cover);
                    let atk = resolve_attack_with_conditions(
                        &mut dice,
                        ConditionedAttackInput {
                            attack: AttackInput {
                                attack_bonus,
                                target_ac: target.ac,
                                vantage: Vantage::Normal,
                                cover: target.cover,
                                override_roll: None,
                            },
                            distance_ft: actor_distance_ft,
                            attacker_conditions: actor_conditions.clone(),
                            defender_conditions: enemy_conditions.clone(),
                        },
                    );
                    log_attack(&mut logs, "Actor", &atk);
                    if atk.hit {
                        let dmg = resolve_damage(
                            &mut dice,
                            DamageInput {
                                dice: DiceFormula {
                                    modifier: weapon_dice.modifier + damage_mod,
                                    ..weapon_dice
                                },
                                damage_type: weapon_damage_type,
                                is_critical: atk.is_crit,
                                override_roll: None,
                            },
                            Some(&target.defenses),
                        );
                        log_damage(&mut logs, "Actor", &dmg, atk.is_crit);
                        let before = enemy_health.hp;
                        let applied = apply_damage(&mut enemy_health, dmg.final_damage);
                        logs.push(format!(
                            "[HP][{}] {} -> {}",
                            target.name, before, enemy_health.hp
                        ));
                        if check_instant_death(enemy_health.max_hp, applied.excess_damage) {
                            enemy_health.state = LifeState::Dead;
                            logs.push(format!(
                                "[STATE][{}] dies outright (massive damage)",
                                target.name
                            ));
                        }
                    }
                }
            }
        } else if enemy_health.hp > 0 {
            let enemy_distance_ft = if target_attack.ranged {
                RANGED_DISTANCE_FT
            } else {
                MELEE_RANGE_FT
            };
            log_defense(&mut logs, "Actor", DEFAULT_ACTOR_AC, Cover::None);
            let atk = resolve_attack_with_conditions(
                &mut dice,
                ConditionedAttackInput {
                    attack: AttackInput {
                        attack_bonus: target_attack.to_hit,
                        target_ac: DEFAULT_ACTOR_AC,
                        vantage: Vantage::Normal,
                        cover: Cover::None,
                        override_roll: None,
                    },
                    distance_ft: enemy_distance_ft,
                    attacker_conditions: enemy_conditions.clone(),
                    defender_conditions: actor_conditions.clone(),
                },
            );
            log_attack(&mut logs, &target_attack.name, &atk);
            if atk.hit {
                let dmg = resolve_damage(
                    &mut dice,
                    DamageInput {
                        dice: target_attack.dice,
                        damage_type: target_attack.damage_type.unwrap_or(DamageType::Slashing),
                        is_critical: atk.is_crit,
                        override_roll: None,
                    },
                    None,
                );
                log_damage(&mut logs, &target_attack.name, &dmg, atk.is_crit);
                let applied = apply_damage(&mut actor_health, dmg.final_damage);
                logs.push(format!(
                    "[HP][Actor] {} HP ({} temp)",
                    actor_health.hp, actor_health.temp_hp
                ));
                if applied.dropped_to_zero {
                    logs.push("[STATE][Actor] drops to 0 HP -> Unconscious".to_string());
                }
                if check_instant_death(actor_health.max_hp, applied.excess_damage) {
                    actor_health.state = LifeState::Dead;
                    logs.push("[STATE][Actor] dies outright (massive damage)".to_string());
                }
            }
        }

        if matches!(actor_health.state, LifeState::Dead)
            || matches!(enemy_health.state, LifeState::Dead)
            || enemy_health.hp <= 0
        {
            break;
        }
        actor_turn = !actor_turn;
    }

    let actor_down =
        matches!(actor_health.state, LifeState::Dead) || actor_health.hp <= 0;
    let enemy_down =
        matches!(enemy_health.state, LifeState::Dead) || enemy_health.hp <= 0;
    let winner = match (actor_down, enemy_down) {
        (false, true) => "actor",
        (true, false) => "enemy",
        _ => "draw",
    };

    logs.push(format!(
        "[END] winner={} actor_hp={} enemy_hp={} rounds={}",
        winner, actor_health.hp, enemy_health.hp, rounds
    ));
    debug!(winner, rounds, "duel finished");

    Ok(DuelResult {
        winner: winner.to_string(),
        rounds,
        actor_hp_end: actor_health.hp,
        enemy_hp_end: enemy_health.hp,
        log: logs,
    })
}

/// Monte Carlo over `samples` duels, trial `i` seeded with `seed + i`.
pub fn simulate_duel_many(cfg: DuelConfig, samples: u32) -> Result<DuelStats> {
    let mut stats = DuelStats {
        samples,
        actor_wins: 0,
        enemy_wins: 0,
        draws: 0,
    };
    for i in 0..samples as u64 {
        let trial = DuelConfig {
            seed: cfg.seed + i,
            ..cfg.clone()
        };
        let result = simulate_duel(trial)?;
        match result.winner.as_str() {
            "actor" => stats.actor_wins += 1,
            "enemy" => stats.enemy_wins += 1,
            _ => stats.draws += 1,
        }
    }
    Ok(stats)
}

fn resolve_target(cfg: &DuelConfig) -> Result<TargetData> {
    let text: &str = if let Some(json) = &cfg.target_json {
        json
    } else if let Some(id) = &cfg.target_id {
        builtin_targets()
            .get(id.as_str())
            .copied()
            .ok_or(RulesError::UnknownContent(id.clone()))?
    } else {
        bail!("duel config needs target_id or target_json");
    };
    serde_json::from_str(text).context("failed to parse target JSON")
}

fn resolve_weapons(cfg: &DuelConfig) -> Result<Vec<Weapon>> {
    let text: &str = if let Some(json) = &cfg.weapons_json {
        json
    } else if let Some(id) = &cfg.weapons_id {
        builtin_weapons()
            .get(id.as_str())
            .copied()
            .ok_or(RulesError::UnknownContent(id.clone()))?
    } else {
        bail!("duel config needs weapons_id or weapons_json");
    };
    serde_json::from_str(text).context("failed to parse weapons JSON")
}

/// Baked-in L1 fighter: PB +2, STR/CON saves, Athletics + Perception.
pub fn sample_fighter() -> Actor {
    let abilities = AbilityScores {
        str_: 16,
        dex: 14,
        con: 14,
        int_: 10,
        wis: 12,
        cha: 8,
    };
    Actor {
        abilities,
        proficiency_bonus: 2,
        save_proficiencies: [Ability::Str, Ability::Con].into_iter().collect(),
        skill_proficiencies: [Skill::Athletics, Skill::Perception].into_iter().collect(),
    }
}

fn format_d20_sequence(raw: &[i32], kept: i32) -> String {
    match raw {
        [] => format!("d20=? (keep={})", kept),
        [only] => format!("d20={} (keep={})", only, kept),
        [first, second] => format!("d20={} vs d20={} (keep={})", first, second, kept),
        _ => {
            let joined = raw
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("d20s=[{}] (keep={})", joined, kept)
        }
    }
}

fn log_attack(logs: &mut Vec<String>, name: &str, atk: &AttackOutcome) {
    let rolls = format_d20_sequence(&atk.raw_rolls, atk.roll);
    let outcome = if atk.is_crit {
        "CRIT!"
    } else if atk.hit {
        "HIT"
    } else if atk.nat1 {
        "MISS (NAT1)"
    } else {
        "MISS"
    };
    logs.push(format!(
        "[ATTACK][{}] {} -> {} to-hit={} vs AC={}",
        name, rolls, outcome, atk.total, atk.ac
    ));
}

fn log_damage(logs: &mut Vec<String>, name: &str, dmg: &crate::combat::DamageOutcome, crit: bool) {
    let prefix = if crit { "crit: " } else { "" };
    let note = if dmg.was_immune {
        " (immune)"
    } else if dmg.was_resisted {
        " (resisted)"
    } else if dmg.was_vulnerable {
        " (vulnerable)"
    } else {
        ""
    };
    logs.push(format!(
        "[DMG][{}] {}rolled {:?} = {} -> {} [{:?}]{}",
        name, prefix, dmg.rolls, dmg.base_damage, dmg.final_damage, dmg.damage_type, note
    ));
}

fn log_defense(logs: &mut Vec<String>, name: &str, base_ac: i32, cover: Cover) {
    let bonus = cover.ac_bonus();
    logs.push(format!(
        "[DEF][{}] AC {} + cover({:+}) = {}",
        name,
        base_ac,
        bonus,
        base_ac + bonus
    ));
}

use std::{fs, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rules_engine::aoe::{aoe_tiles, AoeShape, Direction, GridPosition};
use rules_engine::api::{simulate_duel, simulate_duel_many, DuelConfig};
use rules_engine::life::{process_death_save, roll_death_save, DeathSaves};
use rules_engine::spells::full_caster_slots;
use rules_engine::{
    ability_check, resolve_attack, saving_throw, Ability, AttackInput, CheckInput, ConditionKind,
    Cover, Dice, DiceFormula, SaveInput, Vantage,
};

#[derive(Copy, Clone, ValueEnum)]
enum Adv {
    Normal,
    Advantage,
    Disadvantage,
}

impl From<Adv> for Vantage {
    fn from(adv: Adv) -> Vantage {
        match adv {
            Adv::Normal => Vantage::Normal,
            Adv::Advantage => Vantage::Advantage,
            Adv::Disadvantage => Vantage::Disadvantage,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CoverArg {
    None,
    Half,
    ThreeQuarters,
}

impl From<CoverArg> for Cover {
    fn from(cover: CoverArg) -> Cover {
        match cover {
            CoverArg::None => Cover::None,
            CoverArg::Half => Cover::Half,
            CoverArg::ThreeQuarters => Cover::ThreeQuarters,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum ShapeArg {
    Sphere,
    Cylinder,
    Cube,
    Cone,
    Line,
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll a dice formula like 2d6+3
    Roll {
        formula: String,
        /// RNG seed for determinism; omit for entropy
        #[arg(long)]
        seed: Option<u64>,
        /// Double the die count (critical damage)
        #[arg(long, default_value_t = false)]
        crit: bool,
    },
    /// Ability check against a DC
    Check {
        #[arg(long)]
        dc: i32,
        #[arg(long, default_value_t = 0)]
        modifier: i32,
        #[arg(long, value_enum, default_value_t = Adv::Normal)]
        adv: Adv,
        #[arg(long, default_value_t = false)]
        proficient: bool,
        #[arg(long, default_value_t = 2)]
        pb: i32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Saving throw, condition-aware
    Save {
        /// str | dex | con | int | wis | cha
        #[arg(long)]
        ability: String,
        #[arg(long)]
        dc: i32,
        #[arg(long, default_value_t = 0)]
        modifier: i32,
        #[arg(long, value_enum, default_value_t = Adv::Normal)]
        adv: Adv,
        /// Comma-separated condition names (e.g. restrained,poisoned)
        #[arg(long, default_value = "")]
        conditions: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Attack roll vs AC
    Attack {
        #[arg(long)]
        bonus: i32,
        #[arg(long)]
        ac: i32,
        #[arg(long, value_enum, default_value_t = Adv::Normal)]
        adv: Adv,
        #[arg(long, value_enum, default_value_t = CoverArg::None)]
        cover: CoverArg,
        #[arg(long)]
        override_roll: Option<i32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a seeded duel from a config file or builtin target
    Duel {
        /// JSON or YAML duel config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Builtin target id (e.g. goblin) when no config file is given
        #[arg(long, default_value = "goblin")]
        target: String,
        #[arg(long, default_value = "longsword")]
        weapon: String,
        #[arg(long, default_value_t = 2025)]
        seed: u64,
        /// Run many trials and print the summary instead of one log
        #[arg(long)]
        trials: Option<u32>,
    },
    /// Full-caster spell slots for a level
    Slots {
        #[arg(long)]
        level: u8,
    },
    /// Death save rolls until the state machine terminates
    DeathSave {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Tiles covered by an area of effect
    Aoe {
        #[arg(long, value_enum)]
        shape: ShapeArg,
        /// Radius in feet (sphere, cylinder)
        #[arg(long, default_value_t = 20)]
        radius: i32,
        /// Side in feet (cube)
        #[arg(long, default_value_t = 15)]
        size: i32,
        /// Length in feet (cone, line)
        #[arg(long, default_value_t = 30)]
        length: i32,
        /// Width in feet (line)
        #[arg(long, default_value_t = 5)]
        width: i32,
        /// north | northeast | east | ... (cone, line)
        #[arg(long, default_value = "north")]
        direction: String,
        #[arg(long, default_value_t = 0)]
        x: i32,
        #[arg(long, default_value_t = 0)]
        y: i32,
    },
}

#[derive(Parser)]
#[command(name = "rules-cli", about = "Drive the rules engine from the shell")]
struct Args {
    /// Verbose tracing output
    #[arg(long, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn dice_from(seed: Option<u64>) -> Dice {
    match seed {
        Some(seed) => Dice::from_seed(seed),
        None => Dice::from_entropy(),
    }
}

fn parse_ability(name: &str) -> Result<Ability> {
    match name.trim().to_ascii_lowercase().as_str() {
        "str" => Ok(Ability::Str),
        "dex" => Ok(Ability::Dex),
        "con" => Ok(Ability::Con),
        "int" => Ok(Ability::Int),
        "wis" => Ok(Ability::Wis),
        "cha" => Ok(Ability::Cha),
        other => bail!("unknown ability: {other}"),
    }
}

fn parse_conditions(list: &str) -> Result<Vec<ConditionKind>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ConditionKind::from_name(s).ok_or_else(|| anyhow!("unknown condition: {s}")))
        .collect()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    rules_engine::init_tracing(args.verbose);

    match args.cmd {
        Cmd::Roll {
            formula,
            seed,
            crit,
        } => {
            let mut formula: DiceFormula = formula.parse()?;
            if crit {
                formula = formula.critical();
            }
            let mut dice = dice_from(seed);
            let result = rules_engine::roll_formula(&mut dice, formula, None);
            print_json(&result)?;
        }
        Cmd::Check {
            dc,
            modifier,
            adv,
            proficient,
            pb,
            seed,
        } => {
            let mut dice = dice_from(seed);
            let result = ability_check(
                &mut dice,
                CheckInput {
                    dc,
                    modifier,
                    vantage: adv.into(),
                    proficient,
                    proficiency_bonus: pb,
                    override_roll: None,
                },
            );
            print_json(&result)?;
        }
        Cmd::Save {
            ability,
            dc,
            modifier,
            adv,
            conditions,
            seed,
        } => {
            let mut dice = dice_from(seed);
            let result = saving_throw(
                &mut dice,
                SaveInput {
                    ability: parse_ability(&ability)?,
                    dc,
                    modifier,
                    vantage: adv.into(),
                    proficient: false,
                    proficiency_bonus: 0,
                    conditions: parse_conditions(&conditions)?,
                    override_roll: None,
                },
            );
            print_json(&result)?;
        }
        Cmd::Attack {
            bonus,
            ac,
            adv,
            cover,
            override_roll,
            seed,
        } => {
            let mut dice = dice_from(seed);
            let result = resolve_attack(
                &mut dice,
                AttackInput {
                    attack_bonus: bonus,
                    target_ac: ac,
                    vantage: adv.into(),
                    cover: cover.into(),
                    override_roll,
                },
            );
            print_json(&result)?;
        }
        Cmd::Duel {
            config,
            target,
            weapon,
            seed,
            trials,
        } => {
            let cfg = match config {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let yaml = matches!(
                        path.extension().and_then(|e| e.to_str()),
                        Some("yml") | Some("yaml")
                    );
                    if yaml {
                        DuelConfig::from_yaml_str(&text)?
                    } else {
                        DuelConfig::from_json_str(&text)?
                    }
                }
                None => DuelConfig {
                    target_id: Some(target),
                    target_json: None,
                    weapons_id: Some("basic".to_string()),
                    weapons_json: None,
                    weapon,
                    actor_conditions: vec![],
                    enemy_conditions: vec![],
                    seed,
                    actor_hp: None,
                    actor_temp_hp: 0,
                },
            };
            match trials {
                Some(n) => print_json(&simulate_duel_many(cfg, n)?)?,
                None => {
                    let result = simulate_duel(cfg)?;
                    for line in &result.log {
                        println!("{line}");
                    }
                    println!(
                        "winner={} rounds={} actor_hp={} enemy_hp={}",
                        result.winner, result.rounds, result.actor_hp_end, result.enemy_hp_end
                    );
                }
            }
        }
        Cmd::Slots { level } => {
            print_json(&full_caster_slots(level))?;
        }
        Cmd::DeathSave { seed } => {
            let mut dice = dice_from(seed);
            let mut death = DeathSaves::default();
            loop {
                let rolled = roll_death_save(&mut dice, None);
                let status = process_death_save(&mut death, rolled);
                println!(
                    "roll={} -> {:?} (S={}, F={})",
                    rolled.roll, status, death.successes, death.failures
                );
                if !matches!(status, rules_engine::life::DeathSaveStatus::InProgress) {
                    break;
                }
            }
        }
        Cmd::Aoe {
            shape,
            radius,
            size,
            length,
            width,
            direction,
            x,
            y,
        } => {
            let direction = Direction::from_str(&direction)?;
            let shape = match shape {
                ShapeArg::Sphere => AoeShape::Sphere { radius_ft: radius },
                ShapeArg::Cylinder => AoeShape::Cylinder { radius_ft: radius },
                ShapeArg::Cube => AoeShape::Cube { size_ft: size },
                ShapeArg::Cone => AoeShape::Cone {
                    length_ft: length,
                    direction,
                },
                ShapeArg::Line => AoeShape::Line {
                    length_ft: length,
                    width_ft: width,
                    direction,
                },
            };
            let tiles = aoe_tiles(shape, GridPosition::new(x, y));
            println!("{} tiles", tiles.len());
            for tile in &tiles {
                println!("({}, {})", tile.x, tile.y);
            }
        }
    }

    Ok(())
}

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::errors::RulesError;

/// The supported die sizes. Anything else in a formula is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DieSize {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieSize {
    pub const ALL: [DieSize; 7] = [
        DieSize::D4,
        DieSize::D6,
        DieSize::D8,
        DieSize::D10,
        DieSize::D12,
        DieSize::D20,
        DieSize::D100,
    ];

    pub fn sides(self) -> u32 {
        match self {
            DieSize::D4 => 4,
            DieSize::D6 => 6,
            DieSize::D8 => 8,
            DieSize::D10 => 10,
            DieSize::D12 => 12,
            DieSize::D20 => 20,
            DieSize::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Result<Self, RulesError> {
        DieSize::ALL
            .into_iter()
            .find(|d| d.sides() == sides)
            .ok_or(RulesError::InvalidDieSize(sides))
    }
}

impl TryFrom<u32> for DieSize {
    type Error = RulesError;

    fn try_from(sides: u32) -> Result<Self, Self::Error> {
        DieSize::from_sides(sides)
    }
}

impl From<DieSize> for u32 {
    fn from(size: DieSize) -> u32 {
        size.sides()
    }
}

/// Net advantage state for a d20 roll. Advantage and disadvantage from any
/// number of sources cancel pairwise; `combine` is associative and
/// commutative with `Normal` as identity, so folds are order-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Vantage {
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, false) => Vantage::Advantage,
            (false, true) => Vantage::Disadvantage,
            // Both flags cancel to a plain roll.
            _ => Vantage::Normal,
        }
    }

    pub fn combine(self, other: Vantage) -> Vantage {
        use Vantage::*;
        match (self, other) {
            (Disadvantage, Advantage) | (Advantage, Disadvantage) => Normal,
            (Normal, x) => x,
            (x, Normal) => x,
            (Advantage, Advantage) => Advantage,
            (Disadvantage, Disadvantage) => Disadvantage,
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Rng(ChaCha8Rng),
    Scripted(VecDeque<i32>),
}

/// The rolling context. Every operation that rolls takes `&mut Dice`, so
/// determinism is scoped to the value the caller constructs; there is no
/// process-global seed.
#[derive(Debug, Clone)]
pub struct Dice {
    source: Source,
}

impl Dice {
    /// Reproducible source: identical seed + call sequence gives identical
    /// results.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Rng(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            source: Source::Rng(ChaCha8Rng::from_entropy()),
        }
    }

    /// Replays a fixed sequence of rolls; an exhausted script yields 1.
    pub fn from_scripted(rolls: Vec<i32>) -> Self {
        Self {
            source: Source::Scripted(rolls.into()),
        }
    }

    pub fn die(&mut self, size: DieSize) -> i32 {
        match &mut self.source {
            Source::Rng(rng) => rng.gen_range(1..=size.sides() as i32),
            Source::Scripted(queue) => queue.pop_front().unwrap_or(1),
        }
    }

    pub fn d20(&mut self, vantage: Vantage) -> i32 {
        roll_d20_vantage(self, vantage, None).roll
    }
}

/// A parsed `[count]d<size>[+/-modifier]` formula such as `"2d6+3"`.
/// Serializes as its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceFormula {
    pub count: u32,
    pub size: DieSize,
    pub modifier: i32,
}

impl DiceFormula {
    pub fn new(count: u32, size: DieSize, modifier: i32) -> Self {
        Self {
            count,
            size,
            modifier,
        }
    }

    /// Critical hits double the die count, never the modifier:
    /// `2d6+3` becomes `4d6+3`.
    pub fn critical(self) -> Self {
        Self {
            count: self.count * 2,
            ..self
        }
    }
}

impl FromStr for DiceFormula {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RulesError::InvalidFormula(s.to_string());
        let text = s.trim().to_ascii_lowercase();

        let d_pos = text.find('d').ok_or_else(invalid)?;
        let count: u32 = if d_pos == 0 {
            1
        } else {
            text[..d_pos].parse().map_err(|_| invalid())?
        };
        if count == 0 {
            return Err(invalid());
        }

        let rest = &text[d_pos + 1..];
        let (sides_str, modifier) = match rest.find(|c| c == '+' || c == '-') {
            Some(pos) if pos > 0 => {
                let modifier: i32 = rest[pos..].parse().map_err(|_| invalid())?;
                (&rest[..pos], modifier)
            }
            Some(_) => return Err(invalid()),
            None => (rest, 0),
        };

        let sides: u32 = sides_str.parse().map_err(|_| invalid())?;
        let size = DieSize::from_sides(sides)?;

        Ok(Self {
            count,
            size,
            modifier,
        })
    }
}

impl TryFrom<String> for DiceFormula {
    type Error = RulesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DiceFormula> for String {
    fn from(f: DiceFormula) -> String {
        f.to_string()
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.size.sides())?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }
        Ok(())
    }
}

/// Outcome of rolling a formula. The natural-20/1 flags are only meaningful
/// for a single d20.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub rolls: Vec<i32>,
    pub modifier: i32,
    pub total: i32,
    pub nat20: bool,
    pub nat1: bool,
}

/// Roll every die of `formula` and add the modifier. An override total
/// bypasses the source entirely: it is split evenly across the die slots
/// with the remainder landing on the first die.
pub fn roll_formula(
    dice: &mut Dice,
    formula: DiceFormula,
    override_total: Option<i32>,
) -> RollResult {
    let rolls: Vec<i32> = match override_total {
        Some(total) => distribute_override(total, formula.count),
        None => (0..formula.count).map(|_| dice.die(formula.size)).collect(),
    };
    let sum: i32 = rolls.iter().sum();
    let total = sum + formula.modifier;
    let single_d20 = formula.count == 1 && formula.size == DieSize::D20;
    RollResult {
        nat20: single_d20 && rolls[0] == 20,
        nat1: single_d20 && rolls[0] == 1,
        rolls,
        modifier: formula.modifier,
        total,
    }
}

fn distribute_override(total: i32, count: u32) -> Vec<i32> {
    let count = count.max(1) as i32;
    let per_die = total.div_euclid(count);
    let remainder = total - per_die * count;
    (0..count)
        .map(|i| if i == 0 { per_die + remainder } else { per_die })
        .collect()
}

/// A single d20 roll under a vantage state: every raw die plus the kept one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Roll {
    pub raw_rolls: Vec<i32>,
    pub roll: i32,
    pub nat20: bool,
    pub nat1: bool,
}

/// Roll a d20, twice under advantage (keep max) or disadvantage (keep min).
/// `overrides` replaces the first and second die for deterministic tests.
pub fn roll_d20_vantage(
    dice: &mut Dice,
    vantage: Vantage,
    overrides: Option<(i32, i32)>,
) -> D20Roll {
    let first = match overrides {
        Some((a, _)) => a,
        None => dice.die(DieSize::D20),
    };
    let (raw_rolls, roll) = match vantage {
        Vantage::Normal => (vec![first], first),
        Vantage::Advantage => {
            let second = match overrides {
                Some((_, b)) => b,
                None => dice.die(DieSize::D20),
            };
            (vec![first, second], first.max(second))
        }
        Vantage::Disadvantage => {
            let second = match overrides {
                Some((_, b)) => b,
                None => dice.die(DieSize::D20),
            };
            (vec![first, second], first.min(second))
        }
    };
    D20Roll {
        raw_rolls,
        roll,
        nat20: roll == 20,
        nat1: roll == 1,
    }
}

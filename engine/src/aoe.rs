//! Area-of-effect geometry on a 5-foot grid. All functions are pure and
//! return deduplicated, deterministically ordered tile sets.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RulesError;

pub const FEET_PER_SQUARE: i32 = 5;

/// A position on the game grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &GridPosition) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Eight compass directions; y grows northward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Direction {
    pub fn unit(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::Northeast => (1, 1),
            Direction::East => (1, 0),
            Direction::Southeast => (1, -1),
            Direction::South => (0, -1),
            Direction::Southwest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::Northwest => (-1, 1),
        }
    }
}

impl FromStr for Direction {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Direction::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(North),
            "northeast" | "ne" => Ok(Northeast),
            "east" | "e" => Ok(East),
            "southeast" | "se" => Ok(Southeast),
            "south" | "s" => Ok(South),
            "southwest" | "sw" => Ok(Southwest),
            "west" | "w" => Ok(West),
            "northwest" | "nw" => Ok(Northwest),
            other => Err(RulesError::UnknownContent(other.to_string())),
        }
    }
}

/// The spell area shapes. Distances are in feet and converted to whole
/// squares before any geometry runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AoeShape {
    Sphere { radius_ft: i32 },
    Cylinder { radius_ft: i32 },
    Cube { size_ft: i32 },
    Cone { length_ft: i32, direction: Direction },
    Line { length_ft: i32, width_ft: i32, direction: Direction },
}

fn feet_to_squares(feet: i32) -> i32 {
    (feet / FEET_PER_SQUARE).max(0)
}

/// Every grid cell the area covers, deduplicated.
pub fn aoe_tiles(shape: AoeShape, origin: GridPosition) -> BTreeSet<GridPosition> {
    match shape {
        // A cylinder's footprint on the grid is its circular cross-section.
        AoeShape::Sphere { radius_ft } | AoeShape::Cylinder { radius_ft } => {
            radial_tiles(origin, feet_to_squares(radius_ft))
        }
        AoeShape::Cube { size_ft } => cube_tiles(origin, feet_to_squares(size_ft)),
        AoeShape::Cone {
            length_ft,
            direction,
        } => cone_tiles(origin, feet_to_squares(length_ft), direction),
        AoeShape::Line {
            length_ft,
            width_ft,
            direction,
        } => line_tiles(
            origin,
            feet_to_squares(length_ft),
            feet_to_squares(width_ft).max(1),
            direction,
        ),
    }
}

/// Every cell whose Euclidean distance from the origin is within the
/// radius.
fn radial_tiles(origin: GridPosition, radius: i32) -> BTreeSet<GridPosition> {
    let mut tiles = BTreeSet::new();
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            if distance <= radius as f64 {
                tiles.insert(GridPosition::new(origin.x + dx, origin.y + dy));
            }
        }
    }
    tiles
}

/// Axis-aligned block of `size` squares per side, anchored at the origin
/// corner.
fn cube_tiles(origin: GridPosition, size: i32) -> BTreeSet<GridPosition> {
    let mut tiles = BTreeSet::new();
    for dx in 0..size {
        for dy in 0..size {
            tiles.insert(GridPosition::new(origin.x + dx, origin.y + dy));
        }
    }
    tiles
}

/// 60-degree cone approximation: at each step away from the origin the
/// half-width grows by a square every two steps. The origin square itself
/// is not part of the area.
fn cone_tiles(origin: GridPosition, length: i32, direction: Direction) -> BTreeSet<GridPosition> {
    let (dx, dy) = direction.unit();
    let (px, py) = (-dy, dx);
    let mut tiles = BTreeSet::new();
    for step in 1..=length {
        let half_width = step / 2;
        let cx = origin.x + dx * step;
        let cy = origin.y + dy * step;
        for offset in -half_width..=half_width {
            tiles.insert(GridPosition::new(cx + px * offset, cy + py * offset));
        }
    }
    tiles
}

/// Directed strip: `length` squares along the direction, `width` squares
/// across it (default one).
fn line_tiles(
    origin: GridPosition,
    length: i32,
    width: i32,
    direction: Direction,
) -> BTreeSet<GridPosition> {
    let (dx, dy) = direction.unit();
    let (px, py) = (-dy, dx);
    let shift = (width - 1) / 2;
    let mut tiles = BTreeSet::new();
    for step in 1..=length {
        let cx = origin.x + dx * step;
        let cy = origin.y + dy * step;
        for w in 0..width {
            let offset = w - shift;
            tiles.insert(GridPosition::new(cx + px * offset, cy + py * offset));
        }
    }
    tiles
}

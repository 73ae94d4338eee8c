use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::Error;

/// Integer grid coordinate. `x`/`y` address the surface, `z` the depth on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring coordinate one step in `direction`, or `None` if it
    /// would leave the `i32` range.
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dx, dy, dz) = direction.delta();
        Some(Position {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    pub fn surface(self) -> SurfaceKey {
        SurfaceKey {
            x: self.x,
            y: self.y,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Position { x, y, z }
    }
}

/// Key of a surface: every layer sharing the same `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceKey {
    pub x: i32,
    pub y: i32,
}

/// Edge slot on a layer. Lateral directions move on the surface, `Above` and
/// `Below` move through depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Above,
    Below,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Above,
        Direction::Below,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Above => Direction::Below,
            Direction::Below => Direction::Above,
        }
    }

    /// Unit offset as `(dx, dy, dz)`.
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
            Direction::Left => (-1, 0, 0),
            Direction::Right => (1, 0, 0),
            Direction::Above => (0, 0, 1),
            Direction::Below => (0, 0, -1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "above" | "forward" => Ok(Direction::Above),
            "below" | "backward" => Ok(Direction::Below),
            other => Err(Error::Other(format!("unknown direction '{other}'"))),
        }
    }
}

/// Input accepted by `Workspace::navigate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Backward,
    /// Top of the active surface's depth stack (highest `z`).
    First,
    /// Bottom of the active surface's depth stack (lowest `z`).
    Last,
}

impl NavDirection {
    /// The edge slot followed by this move; `None` for the stack jumps.
    pub fn edge(self) -> Option<Direction> {
        match self {
            NavDirection::Up => Some(Direction::Up),
            NavDirection::Down => Some(Direction::Down),
            NavDirection::Left => Some(Direction::Left),
            NavDirection::Right => Some(Direction::Right),
            NavDirection::Forward => Some(Direction::Above),
            NavDirection::Backward => Some(Direction::Below),
            NavDirection::First | NavDirection::Last => None,
        }
    }
}

impl From<Direction> for NavDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => NavDirection::Up,
            Direction::Down => NavDirection::Down,
            Direction::Left => NavDirection::Left,
            Direction::Right => NavDirection::Right,
            Direction::Above => NavDirection::Forward,
            Direction::Below => NavDirection::Backward,
        }
    }
}

impl FromStr for NavDirection {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "first" => Ok(NavDirection::First),
            "last" => Ok(NavDirection::Last),
            other => other.parse::<Direction>().map(NavDirection::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn stepping_there_and_back_returns_home() {
        let start = Position::new(3, -2, 1);
        for direction in Direction::ALL {
            let there = start.step(direction).unwrap();
            assert_ne!(there, start);
            assert_eq!(there.step(direction.opposite()), Some(start));
        }
    }

    #[test]
    fn lateral_steps_stay_on_depth() {
        let origin = Position::ORIGIN;
        assert_eq!(origin.step(Direction::Up), Some(Position::new(0, 1, 0)));
        assert_eq!(origin.step(Direction::Left), Some(Position::new(-1, 0, 0)));
        assert_eq!(origin.step(Direction::Above), Some(Position::new(0, 0, 1)));
        assert_eq!(origin.step(Direction::Below).unwrap().surface(), origin.surface());
    }

    #[test]
    fn step_past_i32_range_is_none() {
        let edge = Position::new(i32::MAX, 0, 0);
        assert_eq!(edge.step(Direction::Right), None);
    }

    #[test]
    fn parses_depth_aliases() {
        assert_eq!("forward".parse::<Direction>().unwrap(), Direction::Above);
        assert_eq!("Below".parse::<Direction>().unwrap(), Direction::Below);
        assert_eq!("backward".parse::<NavDirection>().unwrap(), NavDirection::Backward);
        assert_eq!("last".parse::<NavDirection>().unwrap(), NavDirection::Last);
        assert!("sideways".parse::<NavDirection>().is_err());
    }
}

//! Cardinal directions and device connection ports.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GratingError;
use crate::geometry::types::Point;

/// One of the four cardinal directions a device or port can face.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Direction {
    /// `+y`.
    North,
    /// `-y`.
    South,
    /// `+x`.
    #[default]
    East,
    /// `-x`.
    West,
}

impl Direction {
    /// All directions, in declaration order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Returns the opposite direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use picgrate_wasm::coupler::port::Direction;
    /// assert_eq!(Direction::East.flip(), Direction::West);
    /// assert_eq!(Direction::North.flip(), Direction::South);
    /// ```
    pub const fn flip(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Counter-clockwise rotation, in radians, that turns geometry authored
    /// facing `+y` so that it faces this direction.
    pub const fn rotation(self) -> f64 {
        match self {
            Self::North => 0.0,
            Self::West => FRAC_PI_2,
            Self::South => PI,
            Self::East => -FRAC_PI_2,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::North => write!(f, "NORTH"),
            Self::South => write!(f, "SOUTH"),
            Self::East => write!(f, "EAST"),
            Self::West => write!(f, "WEST"),
        }
    }
}

impl FromStr for Direction {
    type Err = GratingError;

    /// Parses a cardinal name, ignoring case. Unknown names are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GratingError::invalid(format!("unknown direction `{s}`")))
    }
}

impl TryFrom<String> for Direction {
    type Error = GratingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A connection point on a device boundary.
///
/// Another device attaches here by placing a port at the same position
/// facing the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Connection point.
    pub position: Point,
    /// Direction the port faces. A mating port faces the opposite way.
    pub direction: Direction,
}

impl Port {
    /// Creates a port.
    pub const fn new(position: Point, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Returns `true` if `other` can attach to this port.
    pub fn mates_with(&self, other: &Self) -> bool {
        (self.position.x - other.position.x).abs() <= f64::EPSILON
            && (self.position.y - other.position.y).abs() <= f64::EPSILON
            && self.direction.flip() == other.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_prt_001_flip_is_an_involution() {
        for d in Direction::ALL {
            assert_ne!(d.flip(), d);
            assert_eq!(d.flip().flip(), d);
        }
    }

    #[test]
    fn ut_prt_002_rotation_angles() {
        assert!((Direction::West.rotation() - FRAC_PI_2).abs() < f64::EPSILON);
        assert!((Direction::South.rotation() - PI).abs() < f64::EPSILON);
        assert!((Direction::East.rotation() + FRAC_PI_2).abs() < f64::EPSILON);
        assert!(Direction::North.rotation().abs() < f64::EPSILON);
    }

    #[test]
    fn ut_prt_003_parse_is_case_insensitive() {
        assert_eq!("EAST".parse::<Direction>(), Ok(Direction::East));
        assert_eq!("west".parse::<Direction>(), Ok(Direction::West));
        assert_eq!(" North ".parse::<Direction>(), Ok(Direction::North));
    }

    #[test]
    fn ut_prt_004_unknown_direction_fails_closed() {
        let result = "NORTHEAST".parse::<Direction>();
        assert!(matches!(result, Err(GratingError::InvalidParameter(_))));
    }

    #[test]
    fn ut_prt_005_default_is_east() {
        assert_eq!(Direction::default(), Direction::East);
    }

    #[test]
    fn ut_prt_006_ports_mate_when_facing_each_other() {
        let a = Port::new(Point::new(3.0, 4.0), Direction::West);
        let b = Port::new(Point::new(3.0, 4.0), Direction::East);
        let c = Port::new(Point::new(3.0, 4.0), Direction::West);
        assert!(a.mates_with(&b));
        assert!(!a.mates_with(&c));
    }
}

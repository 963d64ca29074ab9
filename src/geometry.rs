use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cell on the grid. `y` grows southward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Location {
        Location { x, y }
    }

    pub fn add(self, direction: Direction) -> Location {
        let (dx, dy) = direction.delta();

        Location::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance.
    pub fn distance_to(self, other: Location) -> f64 {
        let dx = (self.x - other.x).abs() as f64;
        let dy = (self.y - other.y).abs() as f64;

        dx.hypot(dy)
    }

    /// Chebyshev distance (number of king moves).
    pub fn range_to(self, other: Location) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    pub fn is_adjacent(self, other: Location) -> bool {
        self.range_to(other) == 1
    }

    /// Direction to take toward `goal`, quantized by the sign of dx and dy.
    /// `None` when already there.
    pub fn direction_to(self, goal: Location) -> Option<Direction> {
        Direction::from_delta((goal.x - self.x).signum(), (goal.y - self.y).signum())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Order in which a coordinator tries adjacent cells when spawning.
    pub const SPAWN_ORDER: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Direction::North),
            (1, -1) => Some(Direction::NorthEast),
            (1, 0) => Some(Direction::East),
            (1, 1) => Some(Direction::SouthEast),
            (0, 1) => Some(Direction::South),
            (-1, 1) => Some(Direction::SouthWest),
            (-1, 0) => Some(Direction::West),
            (-1, -1) => Some(Direction::NorthWest),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// One 45° step clockwise.
    pub fn rotate_right(self) -> Direction {
        Direction::ALL[(self.index() + 1) % 8]
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 4) % 8]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::NorthEast => "NORTH_EAST",
            Direction::East => "EAST",
            Direction::SouthEast => "SOUTH_EAST",
            Direction::South => "SOUTH",
            Direction::SouthWest => "SOUTH_WEST",
            Direction::West => "WEST",
            Direction::NorthWest => "NORTH_WEST",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown compass direction '{}'", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

/// Largest Euclidean distance from `origin` to any of `others`, 0 when empty.
pub fn furthest_distance<I>(origin: Location, others: I) -> f64
where
    I: IntoIterator<Item = Location>,
{
    others.into_iter().map(|l| origin.distance_to(l)).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_quantizes_by_sign() {
        let origin = Location::new(5, 5);

        assert_eq!(origin.direction_to(Location::new(9, 1)), Some(Direction::NorthEast));
        assert_eq!(origin.direction_to(Location::new(5, 30)), Some(Direction::South));
        assert_eq!(origin.direction_to(Location::new(4, 5)), Some(Direction::West));
        assert_eq!(origin.direction_to(Location::new(0, 100)), Some(Direction::SouthWest));
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn rotation_walks_the_full_compass() {
        let mut dir = Direction::North;
        for _ in 0..8 {
            dir = dir.rotate_right();
        }
        assert_eq!(dir, Direction::North);
        assert_eq!(Direction::East.rotate_right(), Direction::SouthEast);
        assert_eq!(Direction::NorthWest.opposite(), Direction::SouthEast);
    }

    #[test]
    fn distances() {
        let a = Location::new(0, 0);
        let b = Location::new(3, 4);

        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.range_to(b), 4);
        assert!(a.is_adjacent(Location::new(1, 1)));
        assert!(!a.is_adjacent(a));
        assert_eq!(furthest_distance(a, vec![b, Location::new(1, 0)]), 5.0);
        assert_eq!(furthest_distance(a, Vec::new()), 0.0);
    }

    #[test]
    fn compass_names_parse_case_insensitively() {
        assert_eq!("north_east".parse::<Direction>(), Ok(Direction::NorthEast));
        assert_eq!("WEST".parse::<Direction>(), Ok(Direction::West));
        assert!("UP".parse::<Direction>().is_err());
        assert_eq!(Direction::SouthWest.to_string(), "SOUTH_WEST");
    }
}

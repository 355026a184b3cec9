//! Positions and cardinal directions on the program grid.

use std::fmt;

/// One of the four cardinal unit vectors a pointer can travel along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector as `(dx, dy)`; y grows downwards.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    fn from_delta(dx: i64, dy: i64) -> Self {
        match (dx, dy) {
            (1, 0) => Direction::Right,
            (-1, 0) => Direction::Left,
            (0, -1) => Direction::Up,
            _ => Direction::Down,
        }
    }

    /// Direction named by an arrow instruction (`< > ^ v`).
    pub fn from_arrow(ch: char) -> Option<Self> {
        match ch {
            '>' => Some(Direction::Right),
            '<' => Some(Direction::Left),
            '^' => Some(Direction::Up),
            'v' => Some(Direction::Down),
            _ => None,
        }
    }

    /// Reflect off one of the fixed mirrors `/ \ | _`.
    ///
    /// Returns `None` for any other character, including the random mirror,
    /// whose outcome is chosen by the caller.
    pub fn reflect(self, mirror: char) -> Option<Self> {
        let (dx, dy) = self.delta();
        let (nx, ny) = match mirror {
            '/' => (-dy, -dx),
            '\\' => (dy, dx),
            '|' => (-dx, dy),
            '_' => (dx, -dy),
            _ => return None,
        };
        Some(Self::from_delta(nx, ny))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self {
            Direction::Right => '>',
            Direction::Left => '<',
            Direction::Up => '^',
            Direction::Down => 'v',
        };
        write!(f, "{}", arrow)
    }
}

/// A grid coordinate. Either component may go negative between a move and
/// its wrap-around correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:>2}, {:>2})", self.x, self.y)
    }
}

use crate::{Position, SimError};
use rand::Rng;

/// The eight compass moves. `Up` decreases the row, `Left` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// (row, column) offset
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::Up => (-1, 0),
            Direction::UpRight => (-1, 1),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::DownLeft => (1, -1),
            Direction::Down => (1, 0),
            Direction::DownRight => (1, 1),
        }
    }

    /// Move `pos` one step, clamping each axis to `[0, size - 1]`.
    /// Stepping into an edge leaves that axis unchanged.
    pub fn apply(self, pos: Position, size: usize) -> Position {
        let (dx, dy) = self.offset();
        let last = size.saturating_sub(1) as isize;
        Position {
            x: (pos.x as isize + dx).clamp(0, last) as usize,
            y: (pos.y as isize + dy).clamp(0, last) as usize,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Subset of the eight directions, one bit each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn full() -> Self {
        DirectionSet(u8::MAX)
    }

    pub fn empty() -> Self {
        DirectionSet(0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn without(self, direction: Direction) -> Self {
        DirectionSet(self.0 & !direction.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }

    /// Pick one remaining direction uniformly and return it with the set
    /// that is left once it is removed.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Result<(Direction, Self), SimError> {
        if self.is_empty() {
            return Err(SimError::EmptyDistribution);
        }

        let pick = rng.gen_range(0..self.len());
        let direction = self
            .iter()
            .nth(pick)
            .ok_or(SimError::EmptyDistribution)?;

        Ok((direction, self.without(direction)))
    }
}

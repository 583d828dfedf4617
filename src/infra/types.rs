use std::fmt;

/// Path and edge cost. Signed so malformed weights can be represented and rejected.
pub type Cost = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile coordinate, used by the harness to answer distance-to-orb queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    pub fn neighbors(&self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1), // North
            Position::new(self.x + 1, self.y), // East
            Position::new(self.x, self.y + 1), // South
            Position::new(self.x - 1, self.y), // West
        ]
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }
}

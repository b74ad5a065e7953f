//! The single move emitted per tick.

use super::tile::TileId;

/// Move the army on `source` into the adjacent `dest`, optionally leaving
/// half of it behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: TileId,
    pub dest: TileId,
    pub halve: bool,
}

impl Move {
    pub const fn new(source: TileId, dest: TileId, halve: bool) -> Self {
        Self { source, dest, halve }
    }

    /// Returns the same move with the halve flag replaced.
    pub const fn with_halve(self, halve: bool) -> Self {
        Self { halve, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_halve_keeps_endpoints() {
        let mv = Move::new(3, 4, false).with_halve(true);
        assert_eq!(mv, Move::new(3, 4, true));
    }
}

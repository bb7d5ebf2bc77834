//! Squares vacated since the last confirmed move.
//!
//! A capture on the board is usually made by first taking the captured piece
//! off, then moving the capturing piece onto its square. Comparing against the
//! last confirmed position alone loses the first step once the square is
//! occupied again, so every vacated square is remembered until the next move,
//! reset or takeback.

use crate::board::physical_position::{PhysicalPosition, SquareSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiftedPieces {
    squares: SquareSet,
}

impl LiftedPieces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every square occupied in `known` but empty in `physical`.
    /// The set only grows until [`LiftedPieces::clear`].
    pub fn observe(&mut self, known: &PhysicalPosition, physical: &PhysicalPosition) {
        let vacated = known
            .occupied_squares()
            .difference(physical.occupied_squares());
        self.squares = self.squares.union(vacated);
    }

    /// Lifted squares that `physical` shows occupied again.
    pub fn temporarily_lifted(&self, physical: &PhysicalPosition) -> SquareSet {
        self.squares.intersection(physical.occupied_squares())
    }

    pub fn squares(&self) -> SquareSet {
        self.squares
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn clear(&mut self) {
        self.squares = SquareSet::EMPTY;
    }
}

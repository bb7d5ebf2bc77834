//! Raw sensor snapshot of the board.
//!
//! A frame is eight bytes, one per file line of the sensor matrix. Bit `r` of
//! byte `f` is the sensor on square `8 * r + (7 - f)`: the board wires its
//! files in reverse order. Equality and hashing are on the decoded bits, which
//! is the same as comparing the raw bytes.

use std::fmt;

use crate::errors::PositionError;
use crate::game_state::{chess_rules::STARTING_OCCUPANCY, chess_types::Square, game_state::GameState};
use crate::utils::render::render_occupancy;

pub const FRAME_LEN: usize = 8;

/// Set of square indices backed by one bit per square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(u64);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(0);

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn difference(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 & !other.0)
    }

    #[inline]
    pub const fn intersection(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 & other.0)
    }

    #[inline]
    pub const fn union(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 | other.0)
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, square: Square) -> bool {
        square < 64 && self.0 & (1u64 << square) != 0
    }

    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << (square & 63);
    }

    /// Squares in ascending index order.
    pub fn iter(self) -> SquareIter {
        SquareIter(self.0)
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareIter;

    fn into_iter(self) -> SquareIter {
        self.iter()
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for square in iter {
            set.insert(square);
        }
        set
    }
}

pub struct SquareIter(u64);

impl Iterator for SquareIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let square = self.0.trailing_zeros() as Square;
        self.0 &= self.0 - 1;
        Some(square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SquareIter {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalPosition {
    occupied: SquareSet,
}

/// Occupancy of the standard starting layout.
pub const STARTING_POSITION: PhysicalPosition = PhysicalPosition::from_bitboard(STARTING_OCCUPANCY);

impl PhysicalPosition {
    /// Decodes one sensor frame.
    pub fn decode(frame: &[u8]) -> Result<Self, PositionError> {
        let bytes: &[u8; FRAME_LEN] = frame
            .try_into()
            .map_err(|_| PositionError::InvalidLength { len: frame.len() })?;

        let mut bits = 0u64;
        for (file_line, byte) in bytes.iter().enumerate() {
            for rank in 0..8 {
                if *byte & (1u8 << rank) != 0 {
                    bits |= 1u64 << (8 * rank + (7 - file_line));
                }
            }
        }
        Ok(Self::from_bitboard(bits))
    }

    #[inline]
    pub const fn from_bitboard(bits: u64) -> Self {
        Self {
            occupied: SquareSet::from_bits(bits),
        }
    }

    /// Occupancy the sensors report when the board matches `game_state`.
    pub fn from_game_state(game_state: &GameState) -> Self {
        Self::from_bitboard(game_state.occupancy_all)
    }

    /// Inverse of [`PhysicalPosition::decode`].
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        for square in self.occupied {
            let rank = square / 8;
            let file_line = 7 - (square % 8);
            bytes[usize::from(file_line)] |= 1u8 << rank;
        }
        bytes
    }

    /// Same position with one sensor flipped.
    pub fn toggled(&self, square: Square) -> Self {
        Self::from_bitboard(self.bitboard() ^ (1u64 << (square & 63)))
    }

    #[inline]
    pub const fn bitboard(&self) -> u64 {
        self.occupied.bits()
    }

    #[inline]
    pub const fn occupied_squares(&self) -> SquareSet {
        self.occupied
    }

    pub fn is_starting_position(&self) -> bool {
        *self == STARTING_POSITION
    }
}

impl fmt::Display for PhysicalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_occupancy(self.bitboard()))
    }
}

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_name;

pub const FLAG_CAPTURE: u8 = 1 << 0;
pub const FLAG_DOUBLE_PAWN_PUSH: u8 = 1 << 1;
pub const FLAG_EN_PASSANT: u8 = 1 << 2;
pub const FLAG_CASTLING: u8 = 1 << 3;

/// A fully described move as produced by the legal-move generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub moved: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub flags: u8,
}

/// How a move changes the occupancy of the board, which is all the sensors
/// can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveClass {
    /// One square vacated, one square filled.
    Normal,
    /// One square vacated, the destination stays occupied.
    NormalCapture,
    /// Two squares vacated, one filled.
    EnPassant,
    /// Two squares vacated, two filled.
    Castling,
}

impl ChessMove {
    #[inline]
    pub fn new(
        from: Square,
        to: Square,
        moved: PieceKind,
        captured: Option<PieceKind>,
        promotion: Option<PieceKind>,
        flags: u8,
    ) -> Self {
        Self {
            from,
            to,
            moved,
            captured,
            promotion,
            flags,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.flags & FLAG_CAPTURE != 0
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.flags & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        self.flags & FLAG_CASTLING != 0
    }

    #[inline]
    pub fn is_double_pawn_push(&self) -> bool {
        self.flags & FLAG_DOUBLE_PAWN_PUSH != 0
    }

    pub fn class(&self) -> MoveClass {
        if self.is_castling() {
            MoveClass::Castling
        } else if self.is_en_passant() {
            MoveClass::EnPassant
        } else if self.is_capture() {
            MoveClass::NormalCapture
        } else {
            MoveClass::Normal
        }
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from), square_name(self.to))?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

//! Canonical chess-rule constants.

use crate::game_state::chess_types::Square;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Occupancy of the standard starting position: ranks 1, 2, 7 and 8.
pub const STARTING_OCCUPANCY: u64 = 0xFFFF_0000_0000_FFFF;

/// Halfmove clock value at which the fifty-move rule makes the game a draw.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

pub const WHITE_KING_HOME: Square = 4;
pub const BLACK_KING_HOME: Square = 60;

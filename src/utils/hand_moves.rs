//! Sensor snapshots a player's hand produces while making a move.
//!
//! Used by the board simulator, the benches and the randomised tests to feed
//! the reconciliation engine realistic intermediate frames.

use crate::board::physical_position::PhysicalPosition;
use crate::game_state::chess_types::Color;
use crate::move_generation::chess_move::ChessMove;

/// Every intermediate and final occupancy, starting from `board`, for a
/// player making `mv`:
///
/// - quiet move: lift, then place
/// - capture: remove the victim, lift the mover, place it
/// - en passant: lift, place diagonally, then remove the passed pawn
/// - castling: king across, then the rook
pub fn hand_steps(board: PhysicalPosition, mv: &ChessMove, mover: Color) -> Vec<PhysicalPosition> {
    hand_steps_in_order(board, mv, mover, CaptureOrder::VictimFirst)
}

/// Which piece leaves the board first when a player captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrder {
    VictimFirst,
    /// Lift the mover, remove the victim, then place the mover.
    MoverFirst,
}

/// `hand_steps` with the capture order chosen by the caller.
pub fn hand_steps_in_order(
    board: PhysicalPosition,
    mv: &ChessMove,
    mover: Color,
    order: CaptureOrder,
) -> Vec<PhysicalPosition> {
    let mut steps = Vec::with_capacity(4);
    let mut push = |position: PhysicalPosition| {
        steps.push(position);
        position
    };

    if mv.is_castling() {
        let (rook_from, rook_to) = if mv.to > mv.from {
            (mv.from + 3, mv.from + 1)
        } else {
            (mv.from - 4, mv.from - 1)
        };
        let king_lifted = push(board.toggled(mv.from));
        let king_placed = push(king_lifted.toggled(mv.to));
        let rook_lifted = push(king_placed.toggled(rook_from));
        push(rook_lifted.toggled(rook_to));
    } else if mv.is_en_passant() {
        let passed = match mover {
            Color::White => mv.to - 8,
            Color::Black => mv.to + 8,
        };
        let lifted = push(board.toggled(mv.from));
        let placed = push(lifted.toggled(mv.to));
        push(placed.toggled(passed));
    } else if mv.is_capture() {
        let first = match order {
            CaptureOrder::VictimFirst => mv.to,
            CaptureOrder::MoverFirst => mv.from,
        };
        let second = if first == mv.to { mv.from } else { mv.to };
        let one_off = push(board.toggled(first));
        let both_off = push(one_off.toggled(second));
        push(both_off.toggled(mv.to));
    } else {
        let lifted = push(board.toggled(mv.from));
        push(lifted.toggled(mv.to));
    }

    steps
}

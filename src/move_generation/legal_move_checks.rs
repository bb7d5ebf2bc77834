use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.pieces_of(color, PieceKind::King);
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    // A pawn of the attacker attacks `square` exactly when a defender pawn on
    // `square` would attack the pawn's square.
    let pawns = game_state.pieces_of(attacker_color, PieceKind::Pawn);
    if pawn_attacks(attacker_color.opposite(), square) & pawns != 0 {
        return true;
    }

    if knight_attacks(square) & game_state.pieces_of(attacker_color, PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & game_state.pieces_of(attacker_color, PieceKind::King) != 0 {
        return true;
    }

    let queens = game_state.pieces_of(attacker_color, PieceKind::Queen);
    let bishops_queens = game_state.pieces_of(attacker_color, PieceKind::Bishop) | queens;
    if bishop_attacks(square, game_state.occupancy_all) & bishops_queens != 0 {
        return true;
    }

    let rooks_queens = game_state.pieces_of(attacker_color, PieceKind::Rook) | queens;
    rook_attacks(square, game_state.occupancy_all) & rooks_queens != 0
}

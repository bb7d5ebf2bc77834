//! Copy-make move application.
//!
//! `apply_move_unchecked` trusts the move description and only fails when the
//! position contradicts it (no piece on the origin square). Legality is the
//! oracle's concern; see `MoveOracle::apply_move`.

use crate::errors::{MoveGenResult, MoveGenerationError};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::chess_move::ChessMove;

pub fn apply_move_unchecked(game_state: &GameState, mv: &ChessMove) -> MoveGenResult<GameState> {
    let from_mask = 1u64 << mv.from;
    let to_mask = 1u64 << mv.to;

    let moving_color = game_state.side_to_move;
    let enemy_color = moving_color.opposite();

    let (owner, moved_piece) = game_state.piece_on(mv.from).ok_or_else(|| {
        MoveGenerationError::InvalidState(format!("no piece on from-square {}", mv.from))
    })?;
    if owner != moving_color {
        return Err(MoveGenerationError::InvalidState(format!(
            "piece on {} does not belong to the side to move",
            mv.from
        )));
    }

    let mut next = game_state.clone();

    next.pieces[moving_color.index()][moved_piece.index()] &= !from_mask;

    if mv.is_en_passant() {
        let capture_sq = match moving_color {
            Color::White => mv.to.checked_sub(8),
            Color::Black => mv.to.checked_add(8),
        }
        .ok_or_else(|| {
            MoveGenerationError::InvalidState(format!("invalid en-passant target {}", mv.to))
        })?;
        next.pieces[enemy_color.index()][PieceKind::Pawn.index()] &= !(1u64 << capture_sq);
    } else if mv.is_capture() {
        for kind in ALL_PIECE_KINDS {
            next.pieces[enemy_color.index()][kind.index()] &= !to_mask;
        }
    }

    let landed = mv.promotion.unwrap_or(moved_piece);
    next.pieces[moving_color.index()][landed.index()] |= to_mask;

    if mv.is_castling() && moved_piece == PieceKind::King {
        match (moving_color, mv.from, mv.to) {
            (Color::White, 4, 6) => move_rook(&mut next, moving_color, 7, 5)?,
            (Color::White, 4, 2) => move_rook(&mut next, moving_color, 0, 3)?,
            (Color::Black, 60, 62) => move_rook(&mut next, moving_color, 63, 61)?,
            (Color::Black, 60, 58) => move_rook(&mut next, moving_color, 56, 59)?,
            _ => {
                return Err(MoveGenerationError::InvalidState(format!(
                    "castling flag on non-castling king move {}",
                    mv
                )))
            }
        }
    }

    update_castling_rights(&mut next, moving_color, mv.from, mv.to, moved_piece);

    next.en_passant_square = if mv.is_double_pawn_push() {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || mv.is_capture() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.ply = next.ply.saturating_add(1);
    next.recalc_occupancy();

    Ok(next)
}

fn move_rook(game_state: &mut GameState, color: Color, from: Square, to: Square) -> MoveGenResult<()> {
    let rooks = &mut game_state.pieces[color.index()][PieceKind::Rook.index()];
    if *rooks & (1u64 << from) == 0 {
        return Err(MoveGenerationError::InvalidState(format!(
            "castling without a rook on {from}"
        )));
    }
    *rooks &= !(1u64 << from);
    *rooks |= 1u64 << to;
    Ok(())
}

fn update_castling_rights(
    game_state: &mut GameState,
    moving_color: Color,
    from: Square,
    to: Square,
    moved_piece: PieceKind,
) {
    if moved_piece == PieceKind::King {
        game_state.castling_rights &= match moving_color {
            Color::White => !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE),
            Color::Black => !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE),
        };
    }

    // A rook leaving its corner, or being captured there, loses that right.
    for square in [from, to] {
        game_state.castling_rights &= match square {
            0 => !CASTLE_WHITE_QUEENSIDE,
            7 => !CASTLE_WHITE_KINGSIDE,
            56 => !CASTLE_BLACK_QUEENSIDE,
            63 => !CASTLE_BLACK_KINGSIDE,
            _ => CastlingRights::MAX,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::apply_move_unchecked;
    use crate::game_state::chess_types::{Color, PieceKind, CASTLE_WHITE_KINGSIDE};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::chess_move::{
        ChessMove, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
    };

    #[test]
    fn double_push_sets_en_passant_target_and_flips_side() {
        let game = GameState::new_game();
        let mv = ChessMove::new(12, 28, PieceKind::Pawn, None, None, FLAG_DOUBLE_PAWN_PUSH);
        let next = apply_move_unchecked(&game, &mv).expect("e2e4 should apply");

        assert_eq!(next.en_passant_square, Some(20));
        assert_eq!(next.side_to_move, Color::Black);
        assert_eq!(next.piece_on(28), Some((Color::White, PieceKind::Pawn)));
        assert_eq!(next.piece_on(12), None);
        assert_eq!(next.ply, 1);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let game = GameState::from_fen("rnbqkbnr/pp2pppp/2p5/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
            .expect("FEN should parse");
        let mv = ChessMove::new(
            36,
            43,
            PieceKind::Pawn,
            Some(PieceKind::Pawn),
            None,
            FLAG_CAPTURE | FLAG_EN_PASSANT,
        );
        let next = apply_move_unchecked(&game, &mv).expect("exd6 should apply");

        assert_eq!(next.piece_on(35), None);
        assert_eq!(next.piece_on(36), None);
        assert_eq!(next.piece_on(43), Some((Color::White, PieceKind::Pawn)));
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let mv = ChessMove::new(4, 6, PieceKind::King, None, None, FLAG_CASTLING);
        let next = apply_move_unchecked(&game, &mv).expect("O-O should apply");

        assert_eq!(next.piece_on(5), Some((Color::White, PieceKind::Rook)));
        assert_eq!(next.piece_on(7), None);
        assert_eq!(next.castling_rights & CASTLE_WHITE_KINGSIDE, 0);
    }

    #[test]
    fn castling_without_a_corner_rook_fails() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").expect("FEN should parse");
        game.pieces[Color::White.index()][PieceKind::Rook.index()] = 0;
        game.recalc_occupancy();
        let mv = ChessMove::new(4, 6, PieceKind::King, None, None, FLAG_CASTLING);

        assert!(apply_move_unchecked(&game, &mv).is_err());
    }

    #[test]
    fn moving_from_an_empty_square_fails() {
        let game = GameState::new_game();
        let mv = ChessMove::new(28, 36, PieceKind::Pawn, None, None, 0);
        assert!(apply_move_unchecked(&game, &mv).is_err());
    }
}

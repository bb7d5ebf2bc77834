//! Full legal move generation pipeline.
//!
//! Generates pseudo-legal moves piece by piece, applies each candidate with
//! copy-make and drops those that leave the mover's own king in check.

use crate::errors::MoveGenResult;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use crate::move_generation::chess_move::{
    ChessMove, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};
use crate::move_generation::legal_move_apply::apply_move_unchecked;
use crate::move_generation::legal_move_checks::{
    is_king_in_check, is_square_attacked, king_square,
};

/// Queen first: callers matching only on from/to squares get the queen.
const PROMOTION_ORDER: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Legal moves together with the position each one leads to.
pub fn generate_legal_moves_with_successors(
    game_state: &GameState,
) -> MoveGenResult<Vec<(ChessMove, GameState)>> {
    let mut pseudo = Vec::<ChessMove>::with_capacity(64);
    generate_pseudo_legal_moves(game_state, &mut pseudo);

    let mut legal = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        let next = apply_move_unchecked(game_state, &mv)?;
        if is_king_in_check(&next, game_state.side_to_move) {
            continue;
        }
        legal.push((mv, next));
    }

    Ok(legal)
}

pub fn generate_legal_moves(game_state: &GameState) -> MoveGenResult<Vec<ChessMove>> {
    Ok(generate_legal_moves_with_successors(game_state)?
        .into_iter()
        .map(|(mv, _)| mv)
        .collect())
}

pub fn generate_pseudo_legal_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_pawn_moves(game_state, out);

    let side = game_state.side_to_move;
    let occupancy = game_state.occupancy_all;
    generate_piece_moves(game_state, PieceKind::Knight, out, knight_attacks);
    generate_piece_moves(game_state, PieceKind::Bishop, out, |sq| bishop_attacks(sq, occupancy));
    generate_piece_moves(game_state, PieceKind::Rook, out, |sq| rook_attacks(sq, occupancy));
    generate_piece_moves(game_state, PieceKind::Queen, out, |sq| queen_attacks(sq, occupancy));
    generate_piece_moves(game_state, PieceKind::King, out, king_attacks);

    if let Some(king_from) = king_square(game_state, side) {
        generate_castling_moves(game_state, king_from, out);
    }
}

fn generate_piece_moves(
    game_state: &GameState,
    kind: PieceKind,
    out: &mut Vec<ChessMove>,
    attacks_from: impl Fn(Square) -> u64,
) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];

    let mut pieces = game_state.pieces_of(side, kind);
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        let mut targets = attacks_from(from) & !own_occ;

        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            if (1u64 << to) & enemy_occ != 0 {
                let captured = game_state.piece_on(to).map(|(_, piece)| piece);
                out.push(ChessMove::new(from, to, kind, captured, None, FLAG_CAPTURE));
            } else {
                out.push(ChessMove::new(from, to, kind, None, None, 0));
            }
            targets &= targets - 1;
        }

        pieces &= pieces - 1;
    }
}

fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let (start_rank, promotion_rank) = match side {
        Color::White => (1, 7),
        Color::Black => (6, 0),
    };

    let mut pawns = game_state.pieces_of(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let one_step = match side {
            Color::White => from + 8,
            Color::Black => from - 8,
        };

        if (1u64 << one_step) & empty != 0 {
            push_pawn_move(out, from, one_step, None, 0, promotion_rank);

            if square_rank(from) == start_rank {
                let two_step = match side {
                    Color::White => from + 16,
                    Color::Black => from - 16,
                };
                if (1u64 << two_step) & empty != 0 {
                    out.push(ChessMove::new(
                        from,
                        two_step,
                        PieceKind::Pawn,
                        None,
                        None,
                        FLAG_DOUBLE_PAWN_PUSH,
                    ));
                }
            }
        }

        let mut targets = pawn_attacks(side, from);
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;

            if (1u64 << to) & enemy_occ != 0 {
                let captured = game_state.piece_on(to).map(|(_, piece)| piece);
                push_pawn_move(out, from, to, captured, FLAG_CAPTURE, promotion_rank);
            } else if game_state.en_passant_square == Some(to) {
                out.push(ChessMove::new(
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

fn push_pawn_move(
    out: &mut Vec<ChessMove>,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: u8,
    promotion_rank: u8,
) {
    if square_rank(to) == promotion_rank {
        for promotion in PROMOTION_ORDER {
            out.push(ChessMove::new(from, to, PieceKind::Pawn, captured, Some(promotion), flags));
        }
    } else {
        out.push(ChessMove::new(from, to, PieceKind::Pawn, captured, None, flags));
    }
}

fn generate_castling_moves(game_state: &GameState, king_from: Square, out: &mut Vec<ChessMove>) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let (home, kingside, queenside) = match side {
        Color::White => (4, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE),
        Color::Black => (60, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE),
    };

    if king_from != home || is_square_attacked(game_state, king_from, enemy) {
        return;
    }

    let kingside_path = (1u64 << (home + 1)) | (1u64 << (home + 2));
    let queenside_path = (1u64 << (home - 1)) | (1u64 << (home - 2)) | (1u64 << (home - 3));
    let options = [
        (kingside, kingside_path, [home + 1, home + 2], home + 2),
        (queenside, queenside_path, [home - 1, home - 2], home - 2),
    ];

    for (right, path, crossed, to) in options {
        if game_state.castling_rights & right == 0 || game_state.occupancy_all & path != 0 {
            continue;
        }
        if crossed.iter().any(|&sq| is_square_attacked(game_state, sq, enemy)) {
            continue;
        }
        out.push(ChessMove::new(home, to, PieceKind::King, None, None, FLAG_CASTLING));
    }
}

//! Standard algebraic notation for ledger export.

use crate::errors::NotationError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::chess_move::ChessMove;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{
    generate_legal_moves, generate_legal_moves_with_successors,
};
use crate::utils::algebraic::{file_char, rank_char, square_name};

/// SAN for `mv` played in `game_state`, including `+` / `#` suffixes.
pub fn move_to_san(game_state: &GameState, mv: &ChessMove) -> Result<String, NotationError> {
    let legal = generate_legal_moves_with_successors(game_state)?;
    let next = legal
        .iter()
        .find(|(candidate, _)| candidate == mv)
        .map(|(_, next)| next)
        .ok_or_else(|| NotationError::InvalidMove(format!("{mv} is not legal here")))?;

    let mut out = String::with_capacity(8);

    if mv.is_castling() {
        out.push_str(if mv.to > mv.from { "O-O" } else { "O-O-O" });
    } else if mv.moved == PieceKind::Pawn {
        if mv.is_capture() {
            out.push(file_char(mv.from));
            out.push('x');
        }
        out.push_str(&square_name(mv.to));
        if let Some(promotion) = mv.promotion {
            out.push('=');
            out.push(promotion.letter());
        }
    } else {
        out.push(mv.moved.letter());

        let rivals: Vec<&ChessMove> = legal
            .iter()
            .map(|(candidate, _)| candidate)
            .filter(|c| c.moved == mv.moved && c.to == mv.to && c.from != mv.from)
            .collect();
        if !rivals.is_empty() {
            let shares_file = rivals.iter().any(|c| square_file(c.from) == square_file(mv.from));
            let shares_rank = rivals.iter().any(|c| square_rank(c.from) == square_rank(mv.from));
            if !shares_file {
                out.push(file_char(mv.from));
            } else if !shares_rank {
                out.push(rank_char(mv.from));
            } else {
                out.push_str(&square_name(mv.from));
            }
        }

        if mv.is_capture() {
            out.push('x');
        }
        out.push_str(&square_name(mv.to));
    }

    if is_king_in_check(next, next.side_to_move) {
        if generate_legal_moves(next)?.is_empty() {
            out.push('#');
        } else {
            out.push('+');
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::move_to_san;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_oracle::{LegalMoveOracle, MoveOracle};

    fn san(fen: &str, from: u8, to: u8) -> String {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mv = LegalMoveOracle
            .find_move(&game, from, to)
            .expect("generation should succeed")
            .expect("move should be legal");
        move_to_san(&game, &mv).expect("SAN should render")
    }

    #[test]
    fn pawn_pushes_captures_and_promotions() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(san(start, 12, 28), "e4");
        assert_eq!(
            san("rnbqkbnr/pp2pppp/2p5/3p4/3PP3/8/PPP2PPP/RNBQKBNR w KQkq d6 0 3", 28, 35),
            "exd5"
        );
        assert_eq!(san("8/4P3/8/8/8/8/k7/4K3 w - - 0 1", 52, 60), "e8=Q");
    }

    #[test]
    fn castling_and_mate_markers() {
        assert_eq!(san("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", 4, 6), "O-O");
        assert_eq!(san("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", 4, 2), "O-O-O");
        assert_eq!(
            san("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", 39, 53),
            "Qxf7#"
        );
    }

    #[test]
    fn knights_are_disambiguated_by_file() {
        // Knights on b1 and f1 can both reach d2.
        assert_eq!(san("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1", 1, 11), "Nbd2");
    }
}

//! The legal-move oracle contract the reconciliation engine depends on.
//!
//! The engine never inspects rules itself: it asks an oracle which moves are
//! legal, how a move changes board occupancy, and for the successor position.

use crate::errors::{MoveGenResult, MoveGenerationError};
use crate::game_state::{chess_types::Square, game_state::GameState};
use crate::move_generation::chess_move::{ChessMove, MoveClass};
use crate::move_generation::legal_move_generator::{
    generate_legal_moves, generate_legal_moves_with_successors,
};

pub trait MoveOracle: Send + Sync {
    /// Every legal move in `game_state`. Promotions to a queen come before the
    /// other promotion choices on the same from/to pair.
    fn legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<ChessMove>>;

    fn classify(&self, game_state: &GameState, mv: &ChessMove) -> MoveClass;

    /// Validates `mv` against the legal set and returns the successor state.
    fn apply_move(&self, game_state: &GameState, mv: &ChessMove) -> MoveGenResult<GameState>;

    /// First legal move from `from` to `to`, if any.
    fn find_move(
        &self,
        game_state: &GameState,
        from: Square,
        to: Square,
    ) -> MoveGenResult<Option<ChessMove>> {
        Ok(self
            .legal_moves(game_state)?
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to))
    }
}

/// Bitboard oracle backed by this crate's legal move generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveOracle;

impl MoveOracle for LegalMoveOracle {
    fn legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<ChessMove>> {
        generate_legal_moves(game_state)
    }

    fn classify(&self, _game_state: &GameState, mv: &ChessMove) -> MoveClass {
        mv.class()
    }

    fn apply_move(&self, game_state: &GameState, mv: &ChessMove) -> MoveGenResult<GameState> {
        generate_legal_moves_with_successors(game_state)?
            .into_iter()
            .find(|(legal, _)| legal == mv)
            .map(|(_, next)| next)
            .ok_or(MoveGenerationError::IllegalMove {
                from: mv.from,
                to: mv.to,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{LegalMoveOracle, MoveOracle};
    use crate::errors::MoveGenerationError;
    use crate::game_state::chess_types::PieceKind;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::chess_move::{ChessMove, MoveClass};
    use crate::utils::algebraic::algebraic_to_square as sq;

    fn play(game: &GameState, moves: &[(&str, &str)]) -> GameState {
        let oracle = LegalMoveOracle;
        moves.iter().fold(game.clone(), |state, (from, to)| {
            let mv = oracle
                .find_move(&state, sq(from).expect("square"), sq(to).expect("square"))
                .expect("generation should succeed")
                .expect("move should be legal");
            oracle.apply_move(&state, &mv).expect("legal move should apply")
        })
    }

    #[test]
    fn finds_legal_and_rejects_illegal_normal_moves() {
        let oracle = LegalMoveOracle;
        let game = GameState::new_game();
        let e2 = sq("e2").expect("square");
        let e4 = sq("e4").expect("square");
        let a1 = sq("a1").expect("square");

        assert!(oracle.find_move(&game, e2, e4).expect("generation").is_some());
        assert!(oracle.find_move(&game, a1, e4).expect("generation").is_none());
    }

    #[test]
    fn classifies_the_four_occupancy_patterns() {
        let oracle = LegalMoveOracle;

        let start = GameState::new_game();
        let push = oracle
            .find_move(&start, 12, 28)
            .expect("generation")
            .expect("e2e4 is legal");
        assert_eq!(oracle.classify(&start, &push), MoveClass::Normal);

        let capture_game = play(&start, &[("e2", "e4"), ("c7", "c6"), ("d2", "d4"), ("d7", "d5")]);
        let exd5 = oracle
            .find_move(&capture_game, 28, 35)
            .expect("generation")
            .expect("exd5 is legal");
        assert_eq!(oracle.classify(&capture_game, &exd5), MoveClass::NormalCapture);

        let ep_game = play(&start, &[("e2", "e4"), ("c7", "c6"), ("e4", "e5"), ("d7", "d5")]);
        let exd6 = oracle
            .find_move(&ep_game, 36, 43)
            .expect("generation")
            .expect("exd6 e.p. is legal");
        assert_eq!(oracle.classify(&ep_game, &exd6), MoveClass::EnPassant);

        let castle_game = GameState::from_fen("r3k2r/pp2qppp/b1np4/4p3/8/1QN4P/PPP2PP1/R3K2R w KQkq - 4 16")
            .expect("FEN should parse");
        let long_castle = oracle
            .find_move(&castle_game, 4, 2)
            .expect("generation")
            .expect("O-O-O is legal");
        assert_eq!(oracle.classify(&castle_game, &long_castle), MoveClass::Castling);
    }

    #[test]
    fn apply_move_rejects_moves_outside_the_legal_set() {
        let oracle = LegalMoveOracle;
        let game = GameState::new_game();
        let bogus = ChessMove::new(0, 24, PieceKind::Rook, None, None, 0);

        assert_eq!(
            oracle.apply_move(&game, &bogus),
            Err(MoveGenerationError::IllegalMove { from: 0, to: 24 })
        );
    }

    #[test]
    fn find_move_prefers_queen_promotion() {
        let oracle = LegalMoveOracle;
        let game = GameState::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").expect("FEN should parse");
        let mv = oracle
            .find_move(&game, 52, 60)
            .expect("generation")
            .expect("promotion is legal");
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
    }
}

//! Perft node counting for validating the legal-move oracle.

use crate::errors::MoveGenResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::generate_legal_moves_with_successors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

pub fn perft(game_state: &GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for (mv, next) in generate_legal_moves_with_successors(game_state)? {
        if depth == 1 {
            total.nodes += 1;
            total.captures += u64::from(mv.is_capture());
            total.en_passant += u64::from(mv.is_en_passant());
            total.castles += u64::from(mv.is_castling());
            total.promotions += u64::from(mv.promotion.is_some());
        } else {
            total.merge(perft(&next, depth - 1)?);
        }
    }

    Ok(total)
}

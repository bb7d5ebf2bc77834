//! Matching an occupancy change to a single legal move.
//!
//! The sensors only see which squares are occupied. A delta between the last
//! confirmed occupancy and the current one is classified by how many squares
//! emptied and how many filled, and each class admits exactly one kind of
//! move:
//!
//! | vacated | filled | move kind                                         |
//! |---------|--------|---------------------------------------------------|
//! | 1       | 1      | quiet move (no capture, no castling)              |
//! | 1       | 0      | capture onto a square lifted earlier              |
//! | 2       | 1      | en passant                                        |
//! | 2       | 2      | castling                                          |
//!
//! Anything else is unrecognised and leaves the game untouched.

use log::{debug, trace};

use crate::board::lifted_pieces::LiftedPieces;
use crate::board::physical_position::{PhysicalPosition, SquareSet};
use crate::errors::MoveGenResult;
use crate::game_state::{chess_types::Square, game_state::GameState};
use crate::move_generation::chess_move::{ChessMove, MoveClass};
use crate::move_generation::move_oracle::MoveOracle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionDelta {
    pub disappeared: SquareSet,
    pub appeared: SquareSet,
    pub temporarily_lifted: SquareSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaPattern {
    NormalMove,
    LiftedCapture,
    EnPassant,
    Castling,
    Unrecognized,
}

impl DeltaPattern {
    /// Oracle class a candidate must have to explain this pattern.
    pub fn expected_class(self) -> Option<MoveClass> {
        match self {
            DeltaPattern::NormalMove => Some(MoveClass::Normal),
            DeltaPattern::LiftedCapture => Some(MoveClass::NormalCapture),
            DeltaPattern::EnPassant => Some(MoveClass::EnPassant),
            DeltaPattern::Castling => Some(MoveClass::Castling),
            DeltaPattern::Unrecognized => None,
        }
    }
}

impl PositionDelta {
    pub fn between(
        known: &PhysicalPosition,
        physical: &PhysicalPosition,
        lifted: &LiftedPieces,
    ) -> Self {
        let known_squares = known.occupied_squares();
        let physical_squares = physical.occupied_squares();
        Self {
            disappeared: known_squares.difference(physical_squares),
            appeared: physical_squares.difference(known_squares),
            temporarily_lifted: lifted.temporarily_lifted(physical),
        }
    }

    pub fn classify(&self) -> DeltaPattern {
        match (self.disappeared.len(), self.appeared.len()) {
            (1, 1) => DeltaPattern::NormalMove,
            (1, 0) if !self.temporarily_lifted.is_empty() => DeltaPattern::LiftedCapture,
            (2, 1) => DeltaPattern::EnPassant,
            (2, 2) => DeltaPattern::Castling,
            _ => DeltaPattern::Unrecognized,
        }
    }

    /// Candidate from/to pairs in ascending square order.
    fn candidates(&self, pattern: DeltaPattern) -> Vec<(Square, Square)> {
        let targets = match pattern {
            DeltaPattern::LiftedCapture => self.temporarily_lifted,
            DeltaPattern::Unrecognized => return Vec::new(),
            _ => self.appeared,
        };
        self.disappeared
            .iter()
            .flat_map(|from| targets.iter().map(move |to| (from, to)))
            .collect()
    }
}

/// A move that explains a delta, with the position it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub mv: ChessMove,
    pub class: MoveClass,
    pub pattern: DeltaPattern,
    pub next: GameState,
}

/// Finds the legal move explaining `delta` in `game_state`, if exactly that
/// kind of move exists. Never mutates anything; the caller commits the result.
pub fn reconcile<O: MoveOracle + ?Sized>(
    oracle: &O,
    game_state: &GameState,
    delta: &PositionDelta,
) -> MoveGenResult<Option<Reconciled>> {
    let pattern = delta.classify();
    debug!(
        "delta vacated={:?} filled={:?} relifted={:?} -> {:?}",
        delta.disappeared.iter().collect::<Vec<_>>(),
        delta.appeared.iter().collect::<Vec<_>>(),
        delta.temporarily_lifted.iter().collect::<Vec<_>>(),
        pattern
    );

    let Some(expected) = pattern.expected_class() else {
        return Ok(None);
    };

    for (from, to) in delta.candidates(pattern) {
        let Some(mv) = oracle.find_move(game_state, from, to)? else {
            trace!("no legal move {from}->{to}");
            continue;
        };

        let class = oracle.classify(game_state, &mv);
        if class != expected {
            debug!("candidate {mv} is {class:?}, wanted {expected:?}");
            continue;
        }

        let next = oracle.apply_move(game_state, &mv)?;
        return Ok(Some(Reconciled {
            mv,
            class,
            pattern,
            next,
        }));
    }

    Ok(None)
}

//! Ordered history of the moves applied to the logical position.
//!
//! Every entry keeps the state the move was played from, so a takeback is a
//! pop plus a state restore rather than an unmake.

use crate::game_state::{chess_rules::FIFTY_MOVE_HALFMOVES, chess_types::*, game_state::GameState};
use crate::move_generation::chess_move::ChessMove;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub mv: ChessMove,
    pub san: String,
    pub before: GameState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLedger {
    initial: GameState,
    entries: Vec<LedgerEntry>,
}

impl MoveLedger {
    pub fn new(initial: GameState) -> Self {
        Self {
            initial,
            entries: Vec::new(),
        }
    }

    pub fn initial_state(&self) -> &GameState {
        &self.initial
    }

    pub fn push(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Removes the last entry. The caller restores `entry.before`.
    pub fn pop(&mut self) -> Option<LedgerEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn moves(&self) -> impl Iterator<Item = &ChessMove> + '_ {
        self.entries.iter().map(|entry| &entry.mv)
    }

    pub fn san_moves(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.san.as_str())
    }
}

impl Default for MoveLedger {
    fn default() -> Self {
        Self::new(GameState::new_game())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameOutcome {
    /// Result of `game_state`: mate, stalemate, fifty-move rule or
    /// insufficient material. Repetition is not tracked.
    pub fn of(game_state: &GameState) -> Self {
        let no_moves = generate_legal_moves(game_state)
            .map(|moves| moves.is_empty())
            .unwrap_or(false);

        if no_moves {
            if is_king_in_check(game_state, game_state.side_to_move) {
                return match game_state.side_to_move {
                    Color::White => GameOutcome::BlackWins,
                    Color::Black => GameOutcome::WhiteWins,
                };
            }
            return GameOutcome::Draw;
        }

        if game_state.halfmove_clock >= FIFTY_MOVE_HALFMOVES || insufficient_material(game_state) {
            return GameOutcome::Draw;
        }

        GameOutcome::Ongoing
    }

    pub fn pgn_token(self) -> &'static str {
        match self {
            GameOutcome::Ongoing => "*",
            GameOutcome::WhiteWins => "1-0",
            GameOutcome::BlackWins => "0-1",
            GameOutcome::Draw => "1/2-1/2",
        }
    }
}

/// Bare kings, or kings plus a single knight or bishop.
fn insufficient_material(game_state: &GameState) -> bool {
    let heavy_or_pawns = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen]
        .into_iter()
        .any(|kind| {
            game_state.pieces_of(Color::White, kind) | game_state.pieces_of(Color::Black, kind) != 0
        });
    if heavy_or_pawns {
        return false;
    }

    let minors = [Color::White, Color::Black]
        .into_iter()
        .map(|color| {
            (game_state.pieces_of(color, PieceKind::Knight)
                | game_state.pieces_of(color, PieceKind::Bishop))
            .count_ones()
        })
        .sum::<u32>();

    minors <= 1
}

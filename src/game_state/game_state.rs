//! Logical position: the rules-validated state the physical board is
//! reconciled against.
//!
//! `GameState` stores one bitboard per colour/piece pair plus occupancy
//! caches, side to move, castling rights, the en-passant target and the move
//! clocks. Moves never mutate a state in place; application is copy-make, so
//! a ledger can keep the pre-move state of every ply for takebacks.

use crate::errors::NotationError;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub ply: u16,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,
            ply: 0,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position, white to move, all castling rights.
    pub fn new_game() -> Self {
        let mut game_state = Self::new_empty();
        let white = Color::White.index();
        let black = Color::Black.index();

        game_state.pieces[white][PieceKind::Pawn.index()] = 0x0000_0000_0000_FF00;
        game_state.pieces[white][PieceKind::Knight.index()] = (1 << 1) | (1 << 6);
        game_state.pieces[white][PieceKind::Bishop.index()] = (1 << 2) | (1 << 5);
        game_state.pieces[white][PieceKind::Rook.index()] = (1 << 0) | (1 << 7);
        game_state.pieces[white][PieceKind::Queen.index()] = 1 << 3;
        game_state.pieces[white][PieceKind::King.index()] = 1 << 4;

        for kind in ALL_PIECE_KINDS {
            // Black mirrors white across the middle of the board.
            game_state.pieces[black][kind.index()] =
                game_state.pieces[white][kind.index()].swap_bytes();
        }

        game_state.castling_rights = CASTLE_WHITE_KINGSIDE
            | CASTLE_WHITE_QUEENSIDE
            | CASTLE_BLACK_KINGSIDE
            | CASTLE_BLACK_QUEENSIDE;
        game_state.recalc_occupancy();
        game_state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, NotationError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    pub fn piece_on(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::White, Color::Black] {
            for kind in ALL_PIECE_KINDS {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some((color, kind));
                }
            }
        }
        None
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    pub fn recalc_occupancy(&mut self) {
        for color in [Color::White, Color::Black] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
    }
}

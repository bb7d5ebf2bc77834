//! Crate root module declarations for LiBoard.
//!
//! LiBoard turns the occupancy frames of a sensor chessboard into a
//! rules-validated game: the logical position and its legal-move oracle, the
//! reconciliation engine that matches board changes to moves, the session
//! driver and serial transport, and notation helpers for export.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod move_ledger;
}

pub mod move_generation {
    pub mod attacks;
    pub mod chess_move;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_oracle;
    pub mod perft;
}

pub mod board {
    pub mod config;
    pub mod events;
    pub mod liboard;
    pub mod lifted_pieces;
    pub mod physical_position;
    pub mod reconciliation;
    pub mod session;
}

pub mod connection {
    pub mod frame_assembler;
    pub mod serial_connection;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod hand_moves;
    pub mod pgn;
    pub mod render;
    pub mod san;
}

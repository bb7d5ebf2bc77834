//! Plain-text board views for the CLI and for diagnostics.
//!
//! Assumes square indexing where `0 == a1`, `7 == h1`, and `63 == h8`; both
//! views print rank 8 first.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Occupancy grid, `X` for occupied and `.` for empty.
pub fn render_occupancy(bits: u64) -> String {
    render_grid(|square| {
        if bits & (1u64 << square) != 0 {
            'X'
        } else {
            '.'
        }
    })
}

/// Board with FEN piece letters, uppercase for white.
pub fn render_game_state(game_state: &GameState) -> String {
    render_grid(|square| match game_state.piece_on(square) {
        Some((Color::White, kind)) => kind.letter(),
        Some((Color::Black, kind)) => kind.letter().to_ascii_lowercase(),
        None => '.',
    })
}

fn render_grid(cell: impl Fn(Square) -> char) -> String {
    let mut out = String::with_capacity(8 * 9);
    for rank in (0..8u8).rev() {
        for file in 0..8u8 {
            out.push(cell(rank * 8 + file));
        }
        if rank > 0 {
            out.push('\n');
        }
    }
    out
}

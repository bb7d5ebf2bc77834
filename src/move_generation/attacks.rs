//! Attack bitboards for every piece kind.
//!
//! Leaper tables (king, knight, pawn) are computed at compile time; slider
//! attacks walk rays against the current occupancy and stop at the first
//! blocker, which is included in the result.

use crate::game_state::chess_types::{Color, Square};

pub const KING_ATTACKS: [u64; 64] = leaper_table(&[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
]);

pub const KNIGHT_ATTACKS: [u64; 64] = leaper_table(&[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
]);

pub const WHITE_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, 1), (1, 1)]);
pub const BLACK_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, -1), (1, -1)]);

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

/// Squares a pawn of `color` standing on `square` attacks.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    ROOK_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    BISHOP_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

fn trace_ray(square: Square, file_step: i32, rank_step: i32, occupancy: u64) -> u64 {
    let mut file = (square % 8) as i32 + file_step;
    let mut rank = (square / 8) as i32 + rank_step;
    let mut attacks = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let bit = 1u64 << (rank * 8 + file);
        attacks |= bit;

        if occupancy & bit != 0 {
            break;
        }

        file += file_step;
        rank += rank_step;
    }

    attacks
}

const fn leaper_table(offsets: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < offsets.len() {
            let (df, dr) = offsets[i];
            let (f, r) = (file + df, rank + dr);
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                attacks |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_in_corner_has_three_targets() {
        assert_eq!(king_attacks(0).count_ones(), 3);
        assert_eq!(king_attacks(27).count_ones(), 8);
    }

    #[test]
    fn knight_on_d4_has_eight_targets() {
        assert_eq!(knight_attacks(27).count_ones(), 8);
        assert_eq!(knight_attacks(0).count_ones(), 2);
    }

    #[test]
    fn pawn_attacks_point_forward_for_each_side() {
        let e2 = 12;
        assert_eq!(pawn_attacks(Color::White, e2), (1u64 << 19) | (1u64 << 21));
        let e7 = 52;
        assert_eq!(pawn_attacks(Color::Black, e7), (1u64 << 43) | (1u64 << 45));
        // a-file pawns only attack towards b.
        assert_eq!(pawn_attacks(Color::White, 8), 1u64 << 17);
    }

    #[test]
    fn sliders_stop_at_first_blocker() {
        let a1 = 0;
        let blocker_on_a4 = 1u64 << 24;
        let attacks = rook_attacks(a1, blocker_on_a4);
        assert_ne!(attacks & (1u64 << 24), 0);
        assert_eq!(attacks & (1u64 << 32), 0);

        let c1 = 2;
        let blocker_on_e3 = 1u64 << 20;
        let attacks = bishop_attacks(c1, blocker_on_e3);
        assert_ne!(attacks & (1u64 << 20), 0);
        assert_eq!(attacks & (1u64 << 29), 0);
    }

    #[test]
    fn queen_on_empty_board_sees_twenty_seven_squares_from_d4() {
        assert_eq!(queen_attacks(27, 0).count_ones(), 27);
    }
}

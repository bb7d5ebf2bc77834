//! GameState-to-FEN serializer.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_name;

pub fn generate_fen(game_state: &GameState) -> String {
    let mut out = String::with_capacity(90);

    for rank in (0..8u8).rev() {
        let mut empty = 0;
        for file in 0..8u8 {
            match game_state.piece_on(rank * 8 + file) {
                Some((color, kind)) => {
                    if empty > 0 {
                        out.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    out.push(match color {
                        Color::White => kind.letter(),
                        Color::Black => kind.letter().to_ascii_lowercase(),
                    });
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push(char::from(b'0' + empty));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(match game_state.side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });

    out.push(' ');
    let rights = [
        (CASTLE_WHITE_KINGSIDE, 'K'),
        (CASTLE_WHITE_QUEENSIDE, 'Q'),
        (CASTLE_BLACK_KINGSIDE, 'k'),
        (CASTLE_BLACK_QUEENSIDE, 'q'),
    ];
    let before = out.len();
    for (flag, ch) in rights {
        if game_state.castling_rights & flag != 0 {
            out.push(ch);
        }
    }
    if out.len() == before {
        out.push('-');
    }

    out.push(' ');
    match game_state.en_passant_square {
        Some(square) => out.push_str(&square_name(square)),
        None => out.push('-'),
    }

    out.push_str(&format!(
        " {} {}",
        game_state.halfmove_clock, game_state.fullmove_number
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::game_state::GameState;

    #[test]
    fn regenerates_parsed_positions() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pp2pppp/2p5/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            let game = GameState::from_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&game), fen);
        }
    }
}

//! FEN-to-GameState parser.

use crate::errors::NotationError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;

pub fn parse_fen(fen: &str) -> Result<GameState, NotationError> {
    let mut parts = fen.split_whitespace();
    let mut field = |name: &str| {
        parts
            .next()
            .ok_or_else(|| NotationError::InvalidFen(format!("missing {name}")))
    };

    let board_part = field("board layout")?;
    let side_part = field("side to move")?;
    let castling_part = field("castling rights")?;
    let en_passant_part = field("en-passant square")?;
    // Clocks are optional; EPD-style strings stop after four fields.
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(NotationError::InvalidFen("extra trailing fields".to_owned()));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = match side_part {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(NotationError::InvalidFen(format!("side to move '{side_part}'"))),
    };
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = match en_passant_part {
        "-" => None,
        square => Some(algebraic_to_square(square)?),
    };
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| NotationError::InvalidFen(format!("halfmove clock '{halfmove_part}'")))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| NotationError::InvalidFen(format!("fullmove number '{fullmove_part}'")))?;
    game_state.ply = game_state.fullmove_number.saturating_sub(1) * 2
        + u16::from(game_state.side_to_move == Color::Black);

    game_state.recalc_occupancy();
    validate(&game_state)?;

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), NotationError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(NotationError::InvalidFen("board layout must contain 8 ranks".to_owned()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(NotationError::InvalidFen(format!("empty-square count '{ch}'")));
                }
                file += empty_count as usize;
                continue;
            }

            let (color, piece) = piece_from_fen_char(ch)
                .ok_or_else(|| NotationError::InvalidFen(format!("piece character '{ch}'")))?;

            if file >= 8 {
                return Err(NotationError::InvalidFen(format!("rank '{rank_str}' is too long")));
            }

            game_state.pieces[color.index()][piece.index()] |= 1u64 << (board_rank * 8 + file);
            file += 1;
        }

        if file != 8 {
            return Err(NotationError::InvalidFen(format!(
                "rank '{rank_str}' does not cover 8 files"
            )));
        }
    }

    Ok(())
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, NotationError> {
    if castling_part == "-" {
        return Ok(0);
    }

    castling_part.chars().try_fold(0, |rights, ch| match ch {
        'K' => Ok(rights | CASTLE_WHITE_KINGSIDE),
        'Q' => Ok(rights | CASTLE_WHITE_QUEENSIDE),
        'k' => Ok(rights | CASTLE_BLACK_KINGSIDE),
        'q' => Ok(rights | CASTLE_BLACK_QUEENSIDE),
        _ => Err(NotationError::InvalidFen(format!("castling character '{ch}'"))),
    })
}

fn validate(game_state: &GameState) -> Result<(), NotationError> {
    for color in [Color::White, Color::Black] {
        if game_state.pieces_of(color, PieceKind::King).count_ones() != 1 {
            return Err(NotationError::InvalidFen(format!(
                "{color:?} must have exactly one king"
            )));
        }
        if game_state.pieces_of(color, PieceKind::Pawn) & BACK_RANKS != 0 {
            return Err(NotationError::InvalidFen(format!(
                "{color:?} pawn on the first or last rank"
            )));
        }
    }
    validate_castling_rights(game_state)?;
    validate_en_passant(game_state)
}

fn validate_castling_rights(game_state: &GameState) -> Result<(), NotationError> {
    // (right, color, king home, rook corner)
    let homes = [
        (CASTLE_WHITE_KINGSIDE, Color::White, 4, 7),
        (CASTLE_WHITE_QUEENSIDE, Color::White, 4, 0),
        (CASTLE_BLACK_KINGSIDE, Color::Black, 60, 63),
        (CASTLE_BLACK_QUEENSIDE, Color::Black, 60, 56),
    ];

    for (right, color, king_square, rook_square) in homes {
        if game_state.castling_rights & right == 0 {
            continue;
        }
        let king_home = game_state.piece_on(king_square) == Some((color, PieceKind::King));
        let rook_home = game_state.piece_on(rook_square) == Some((color, PieceKind::Rook));
        if !king_home || !rook_home {
            return Err(NotationError::InvalidFen(format!(
                "{color:?} castling right without king and rook on their home squares"
            )));
        }
    }
    Ok(())
}

fn validate_en_passant(game_state: &GameState) -> Result<(), NotationError> {
    let Some(target) = game_state.en_passant_square else {
        return Ok(());
    };

    let mover = game_state.side_to_move;
    // The double-pushed pawn stands one rank past the target, seen from the mover.
    let (target_rank, pushed_pawn) = match mover {
        Color::White => (5, target.checked_sub(8)),
        Color::Black => (2, target.checked_add(8)),
    };
    let pawn_behind = pushed_pawn
        .is_some_and(|square| game_state.piece_on(square) == Some((mover.opposite(), PieceKind::Pawn)));

    if square_rank(target) != target_rank
        || game_state.occupancy_all & (1u64 << target) != 0
        || !pawn_behind
    {
        return Err(NotationError::InvalidFen(format!(
            "en-passant square {target} does not follow a double pawn push"
        )));
    }
    Ok(())
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };

    let piece = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, piece))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, CASTLE_BLACK_QUEENSIDE};

    #[test]
    fn parses_the_starting_position() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        assert_eq!(game_state.side_to_move, Color::White);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.occupancy_all.count_ones(), 32);
        assert_ne!(game_state.castling_rights & CASTLE_BLACK_QUEENSIDE, 0);
    }

    #[test]
    fn accepts_fen_without_clocks() {
        let game_state =
            parse_fen("4k3/8/8/8/8/8/8/4K3 b - -").expect("four-field FEN should parse");
        assert_eq!(game_state.side_to_move, Color::Black);
        assert_eq!(game_state.ply, 1);
    }

    #[test]
    fn rejects_broken_layouts() {
        assert!(parse_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K2 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
    }

    #[test]
    fn rejects_castling_rights_without_a_rook_in_the_corner() {
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/R3K3 w K - 0 1").is_err());
        assert!(parse_fen("r3k3/8/8/8/8/8/8/4K3 w q - 0 1").is_ok());
        assert!(parse_fen("r3k3/8/8/8/8/8/8/4K3 w k - 0 1").is_err());
    }

    #[test]
    fn rejects_castling_rights_for_a_displaced_king() {
        assert!(parse_fen("4k3/8/8/8/8/8/8/3K3R w K - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").is_ok());
    }

    #[test]
    fn rejects_en_passant_square_off_the_capture_rank() {
        assert!(parse_fen("4k3/8/8/8/8/8/3p4/K7 b - e1 0 1").is_err());
        assert!(parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d3 0 1").is_err());
    }

    #[test]
    fn rejects_occupied_en_passant_square() {
        assert!(parse_fen("4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1").is_err());
    }

    #[test]
    fn rejects_en_passant_square_without_a_pushed_pawn() {
        assert!(parse_fen("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1").is_err());
        assert!(parse_fen("4k3/8/8/3PP3/8/8/8/4K3 w - d6 0 1").is_err());
    }

    #[test]
    fn accepts_a_genuine_en_passant_square() {
        let game_state =
            parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("d6 follows ...d7-d5");
        assert_eq!(game_state.en_passant_square, Some(43));
        let black = parse_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").expect("d3 follows d2-d4");
        assert_eq!(black.en_passant_square, Some(19));
    }
}

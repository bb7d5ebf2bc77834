//! Square-name conversions (`e4` <-> 28).

use crate::errors::NotationError;
use crate::game_state::chess_types::Square;

pub fn algebraic_to_square(square: &str) -> Result<Square, NotationError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Name of a square index. Indices above 63 are masked into range.
pub fn square_name(square: Square) -> String {
    let square = square & 63;
    format!("{}{}", file_char(square), rank_char(square))
}

#[inline]
pub fn file_char(square: Square) -> char {
    char::from(b'a' + (square & 63) % 8)
}

#[inline]
pub fn rank_char(square: Square) -> char {
    char::from(b'1' + (square & 63) / 8)
}

//! PGN export of the move ledger.
//!
//! Writes the Seven Tag Roster, SetUp/FEN tags for games that did not begin
//! from the standard position, and SAN movetext taken from the ledger.

use chrono::{Local, NaiveDate};

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::game_state::move_ledger::{GameOutcome, MoveLedger};

/// PGN for `ledger`, dated today.
pub fn write_pgn(ledger: &MoveLedger, outcome: GameOutcome) -> String {
    write_pgn_dated(ledger, outcome, Local::now().date_naive())
}

pub fn write_pgn_dated(ledger: &MoveLedger, outcome: GameOutcome, date: NaiveDate) -> String {
    let result = outcome.pgn_token();
    let mut headers = vec![
        ("Event", "LiBoard Game".to_owned()),
        ("Site", "Local".to_owned()),
        ("Date", date.format("%Y.%m.%d").to_string()),
        ("Round", "-".to_owned()),
        ("White", "White".to_owned()),
        ("Black", "Black".to_owned()),
        ("Result", result.to_owned()),
    ];

    let initial = ledger.initial_state();
    let initial_fen = initial.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.push(("SetUp", "1".to_owned()));
        headers.push(("FEN", initial_fen));
    }

    let mut out = String::new();
    for (key, value) in &headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut movetext = Vec::with_capacity(ledger.len() + 1);
    let mut fullmove = initial.fullmove_number;
    let mut side = initial.side_to_move;
    for (idx, san) in ledger.san_moves().enumerate() {
        match side {
            Color::White => movetext.push(format!("{fullmove}. {san}")),
            Color::Black if idx == 0 => movetext.push(format!("{fullmove}... {san}")),
            Color::Black => movetext.push(san.to_owned()),
        }
        if side == Color::Black {
            fullmove += 1;
        }
        side = side.opposite();
    }
    movetext.push(result.to_owned());

    out.push_str(&movetext.join(" "));
    out.push('\n');
    out
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::write_pgn_dated;
    use crate::game_state::game_state::GameState;
    use crate::game_state::move_ledger::{GameOutcome, LedgerEntry, MoveLedger};
    use crate::move_generation::move_oracle::{LegalMoveOracle, MoveOracle};
    use crate::utils::san::move_to_san;

    fn ledger_from(initial: GameState, moves: &[(u8, u8)]) -> MoveLedger {
        let oracle = LegalMoveOracle;
        let mut ledger = MoveLedger::new(initial.clone());
        let mut state = initial;
        for &(from, to) in moves {
            let mv = oracle
                .find_move(&state, from, to)
                .expect("generation")
                .expect("move should be legal");
            let san = move_to_san(&state, &mv).expect("SAN");
            let next = oracle.apply_move(&state, &mv).expect("apply");
            ledger.push(LedgerEntry {
                mv,
                san,
                before: state,
            });
            state = next;
        }
        ledger
    }

    #[test]
    fn writes_roster_and_numbered_movetext() {
        let ledger = ledger_from(GameState::new_game(), &[(12, 28), (50, 42), (11, 27)]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        let pgn = write_pgn_dated(&ledger, GameOutcome::Ongoing, date);

        assert!(pgn.starts_with("[Event \"LiBoard Game\"]\n"));
        assert!(pgn.contains("[Date \"2024.03.09\"]\n"));
        assert!(pgn.contains("[Result \"*\"]\n"));
        assert!(!pgn.contains("[SetUp"));
        assert!(pgn.ends_with("\n1. e4 c6 2. d4 *\n"));
    }

    #[test]
    fn custom_start_adds_fen_and_black_ellipsis() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 b - - 0 12";
        let ledger = ledger_from(GameState::from_fen(fen).expect("FEN"), &[(60, 59)]);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let pgn = write_pgn_dated(&ledger, GameOutcome::Draw, date);

        assert!(pgn.contains("[SetUp \"1\"]\n"));
        assert!(pgn.contains(&format!("[FEN \"{fen}\"]\n")));
        assert!(pgn.ends_with("\n12... Kd8 1/2-1/2\n"));
    }
}

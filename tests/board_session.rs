//! Drives a full session from an in-memory byte stream, the way the CLI does
//! with a real device.

use std::io::Cursor;
use std::time::Duration;

use liboard::board::config::BoardConfig;
use liboard::board::events::BoardEvent;
use liboard::board::liboard::LiBoard;
use liboard::board::physical_position::{PhysicalPosition, STARTING_POSITION};
use liboard::board::session::BoardSession;
use liboard::connection::serial_connection::Connection;
use liboard::game_state::game_state::GameState;
use liboard::move_generation::move_oracle::{LegalMoveOracle, MoveOracle};
use liboard::utils::hand_moves::hand_steps;

const WAIT: Duration = Duration::from_secs(5);

fn frames_for(moves: &[(u8, u8)]) -> (Vec<u8>, GameState) {
    let oracle = LegalMoveOracle;
    let mut game = GameState::new_game();
    let mut board = STARTING_POSITION;
    let mut bytes = STARTING_POSITION.to_bytes().to_vec();

    for &(from, to) in moves {
        let mv = oracle
            .find_move(&game, from, to)
            .expect("generation")
            .expect("scripted move should be legal");
        for step in hand_steps(board, &mv, game.side_to_move) {
            bytes.extend(step.to_bytes());
            board = step;
        }
        game = oracle.apply_move(&game, &mv).expect("apply");
    }
    (bytes, game)
}

fn wait_for_disconnect(events: &crossbeam_channel::Receiver<BoardEvent>) -> Vec<BoardEvent> {
    let mut seen = Vec::new();
    loop {
        let event = events.recv_timeout(WAIT).expect("session keeps reporting");
        seen.push(event);
        if event == BoardEvent::Disconnected {
            return seen;
        }
    }
}

#[test]
fn scripted_game_is_reconstructed_from_frames() {
    // 1. e4 d5 2. exd5 Qxd5 3. Nc3 Qa5 4. Nf3 Nf6 5. Bc4 e6 6. O-O
    let moves = [
        (12, 28), (51, 35), (28, 35), (59, 35), (1, 18), (35, 32),
        (6, 21), (62, 45), (5, 26), (52, 44), (4, 6),
    ];
    let (bytes, expected) = frames_for(&moves);

    let (handle, join) = BoardSession::spawn(LiBoard::new(BoardConfig::default())).expect("session spawns");
    let events = handle.subscribe().expect("session running");
    handle
        .connect(Connection::from_reader("script", Cursor::new(bytes)).expect("reader spawns"))
        .expect("session running");

    let seen = wait_for_disconnect(&events);
    assert_eq!(seen.first(), Some(&BoardEvent::Connected));
    assert_eq!(seen.iter().filter(|e| **e == BoardEvent::GameStart).count(), 1);
    assert_eq!(seen.iter().filter(|e| **e == BoardEvent::MoveApplied).count(), moves.len());

    let snapshot = handle.snapshot().expect("session running");
    assert_eq!(snapshot.game_state, expected);
    assert_eq!(
        snapshot.san_moves,
        ["e4", "d5", "exd5", "Qxd5", "Nc3", "Qa5", "Nf3", "Nf6", "Bc4", "e6", "O-O"]
    );
    assert!(snapshot.in_sync());
    assert!(snapshot.pgn.contains("6. O-O *"));

    handle.shutdown().expect("session running");
    join.join().expect("session thread exits cleanly");
}

#[test]
fn takeback_then_replaying_the_board() {
    let (bytes, _) = frames_for(&[(12, 28), (52, 36)]);
    let (handle, join) = BoardSession::spawn(LiBoard::default()).expect("session spawns");
    let events = handle.subscribe().expect("session running");
    handle
        .connect(Connection::from_reader("script", Cursor::new(bytes)).expect("reader spawns"))
        .expect("session running");
    wait_for_disconnect(&events);

    handle.takeback().expect("session running");
    let snapshot = handle.snapshot().expect("session running");
    assert_eq!(snapshot.san_moves, ["e4"]);
    // The pieces still show 1...e5 until the player puts the pawn back.
    assert!(!snapshot.in_sync());
    assert_eq!(
        snapshot.known_position,
        PhysicalPosition::from_game_state(&snapshot.game_state)
    );

    handle.new_game().expect("session running");
    assert!(handle.snapshot().expect("session running").san_moves.is_empty());

    drop(handle);
    join.join().expect("session thread exits when handles are gone");
}

#[test]
fn truncated_stream_drops_the_partial_frame() {
    let (mut bytes, _) = frames_for(&[(12, 28)]);
    bytes.extend([0xC3, 0xC3, 0xC3]);

    let (handle, join) = BoardSession::spawn(LiBoard::default()).expect("session spawns");
    let events = handle.subscribe().expect("session running");
    handle
        .connect(Connection::from_reader("script", Cursor::new(bytes)).expect("reader spawns"))
        .expect("session running");
    wait_for_disconnect(&events);

    let snapshot = handle.snapshot().expect("session running");
    assert_eq!(snapshot.san_moves, ["e4"]);
    assert!(!snapshot.connected);

    handle.shutdown().expect("session running");
    join.join().expect("session thread exits cleanly");
}

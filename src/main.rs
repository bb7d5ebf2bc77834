//! `liboard` command-line front end.
//!
//! Run with:
//! `cargo run --release -- --device /dev/ttyACM0`
//! `cargo run --release --bin board_simulator | cargo run --release -- --device -`
//!
//! With a device path, commands are read from stdin: `takeback`, `clock`,
//! `new`, `pgn`, `board`, `quit`. With `--device -` the frames come from
//! stdin and the program runs until the stream ends.

use std::io::{self, BufRead};
use std::thread;

use liboard::board::config::BoardConfig;
use liboard::board::events::BoardEvent;
use liboard::board::liboard::LiBoard;
use liboard::board::session::{BoardSession, SessionHandle};
use liboard::connection::serial_connection::Connection;
use liboard::game_state::game_state::GameState;
use liboard::utils::render::render_game_state;

struct CliArgs {
    device: Option<String>,
    fen: Option<String>,
    config: BoardConfig,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut config = BoardConfig::from_env().map_err(|e| e.to_string())?;
    let mut device = None;
    let mut fen = None;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--device" if i + 1 < args.len() => {
                device = Some(args[i + 1].clone());
                i += 1;
            }
            "--move-delay" if i + 1 < args.len() => {
                config
                    .set_option("move-delay", &args[i + 1])
                    .map_err(|e| e.to_string())?;
                i += 1;
            }
            "--fen" if i + 1 < args.len() => {
                fen = Some(args[i + 1].clone());
                i += 1;
            }
            "--clock-move" => config.clock_move = true,
            other => return Err(format!("unexpected argument '{other}'")),
        }
        i += 1;
    }

    Ok(CliArgs {
        device,
        fen,
        config,
    })
}

fn print_board(handle: &SessionHandle) -> Result<(), String> {
    let snapshot = handle.snapshot().map_err(|e| e.to_string())?;
    println!("{}\n", render_game_state(&snapshot.game_state));
    println!("{}", snapshot.physical_position);
    println!("fen: {}", snapshot.game_state.get_fen());
    if !snapshot.in_sync() {
        println!("board does not match the game yet");
    }
    Ok(())
}

fn command_loop(handle: &SessionHandle) -> Result<(), String> {
    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        let result = match line.trim() {
            "" => Ok(()),
            "takeback" => handle.takeback(),
            "new" => handle.new_game(),
            "clock" => handle.clock_switch().map(|switched| {
                println!("{}", if switched { "clock switched" } else { "no move on the board" });
            }),
            "pgn" => handle.snapshot().map(|snapshot| print!("{}", snapshot.pgn)),
            "board" => {
                print_board(handle)?;
                Ok(())
            }
            "quit" => break,
            other => {
                println!("unknown command '{other}'");
                Ok(())
            }
        };
        result.map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let mut board = LiBoard::new(args.config);
    if let Some(fen) = &args.fen {
        board.start_from(GameState::from_fen(fen).map_err(|e| e.to_string())?);
    }

    let (handle, join) = BoardSession::spawn(board).map_err(|e| e.to_string())?;
    let events = handle.subscribe().map_err(|e| e.to_string())?;

    let printer = handle.clone();
    thread::spawn(move || {
        for event in events.iter() {
            println!("event: {event:?}");
            if event == BoardEvent::MoveApplied {
                if let Ok(snapshot) = printer.snapshot() {
                    if let Some(san) = snapshot.san_moves.last() {
                        println!("move {}: {san}", snapshot.san_moves.len());
                    }
                }
            }
        }
    });

    match args.device.as_deref() {
        Some("-") => {
            let connection = Connection::from_reader("stdin", io::stdin()).map_err(|e| e.to_string())?;
            handle.connect(connection).map_err(|e| e.to_string())?;
            wait_for_disconnect(&handle)?;
            // Let a pending confirmation of the last move run out.
            thread::sleep(args.config.move_delay * 2);
            print!("{}", handle.snapshot().map_err(|e| e.to_string())?.pgn);
        }
        Some(path) => {
            let connection = Connection::open(path).map_err(|e| e.to_string())?;
            handle.connect(connection).map_err(|e| e.to_string())?;
            command_loop(&handle)?;
        }
        None => return Err("usage: liboard --device <path|-> [--move-delay <ms>] [--clock-move] [--fen <fen>]".to_owned()),
    }

    handle.shutdown().map_err(|e| e.to_string())?;
    join.join().map_err(|_| "session thread panicked".to_owned())?;
    Ok(())
}

fn wait_for_disconnect(handle: &SessionHandle) -> Result<(), String> {
    let events = handle.subscribe().map_err(|e| e.to_string())?;
    if !handle.snapshot().map_err(|e| e.to_string())?.connected {
        return Ok(());
    }
    for event in events.iter() {
        if event == BoardEvent::Disconnected {
            break;
        }
    }
    Ok(())
}

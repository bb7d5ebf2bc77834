//! Plays a random legal game and writes the sensor frames a player's hands
//! would produce to stdout.
//!
//! Run with:
//! `cargo run --release --bin board_simulator -- --plies 80 --seed 7 | cargo run --release -- --device -`

use std::io::{self, Write};

use liboard::board::physical_position::{PhysicalPosition, STARTING_POSITION};
use liboard::game_state::chess_types::PieceKind;
use liboard::game_state::game_state::GameState;
use liboard::move_generation::move_oracle::{LegalMoveOracle, MoveOracle};
use liboard::utils::hand_moves::hand_steps;
use log::info;
use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut plies = 60u16;
    let mut seed = 1u64;
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--plies" if i + 1 < args.len() => {
                plies = args[i + 1].parse().map_err(|_| format!("bad ply count '{}'", args[i + 1]))?;
                i += 1;
            }
            "--seed" if i + 1 < args.len() => {
                seed = args[i + 1].parse().map_err(|_| format!("bad seed '{}'", args[i + 1]))?;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    let oracle = LegalMoveOracle;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = GameState::new_game();
    let mut board = STARTING_POSITION;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut emit = |position: PhysicalPosition| out.write_all(&position.to_bytes()).map_err(|e| e.to_string());

    emit(board)?;
    for _ in 0..plies {
        // The board cannot tell promotion pieces apart and always assumes a
        // queen, and showing the starting layout mid-game restarts it.
        let moves: Vec<_> = oracle
            .legal_moves(&game)
            .map_err(|e| e.to_string())?
            .into_iter()
            .filter(|mv| mv.promotion.is_none() || mv.promotion == Some(PieceKind::Queen))
            .filter(|mv| !hand_steps(board, mv, game.side_to_move).contains(&STARTING_POSITION))
            .collect();
        let Some(mv) = moves.choose(&mut rng).copied() else {
            info!("no legal moves left");
            break;
        };

        for step in hand_steps(board, &mv, game.side_to_move) {
            emit(step)?;
            board = step;
        }
        game = oracle.apply_move(&game, &mv).map_err(|e| e.to_string())?;
        info!("played {mv}");
    }

    out.flush().map_err(|e| e.to_string())?;
    info!("final position {}", game.get_fen());
    Ok(())
}

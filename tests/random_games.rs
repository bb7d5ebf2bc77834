//! Replays seeded random games through the engine, one hand step per frame,
//! and checks the engine recovers exactly the moves that were played.

use liboard::board::liboard::LiBoard;
use liboard::board::physical_position::{PhysicalPosition, STARTING_POSITION};
use liboard::game_state::chess_types::PieceKind;
use liboard::game_state::game_state::GameState;
use liboard::move_generation::move_oracle::{LegalMoveOracle, MoveOracle};
use liboard::utils::hand_moves::{hand_steps_in_order, CaptureOrder};
use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};

const GAMES: u64 = 12;
const MAX_PLIES: usize = 120;

#[test]
fn random_games_round_trip_through_the_sensors() {
    let oracle = LegalMoveOracle;

    for seed in 0..GAMES {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut liboard = LiBoard::default();
        let mut game = GameState::new_game();
        let mut board = STARTING_POSITION;
        liboard.on_new_physical_position(board);

        for ply in 0..MAX_PLIES {
            let candidates: Vec<_> = oracle
                .legal_moves(&game)
                .expect("generation")
                .into_iter()
                .filter(|mv| mv.promotion.is_none() || mv.promotion == Some(PieceKind::Queen))
                .filter(|mv| {
                    [CaptureOrder::VictimFirst, CaptureOrder::MoverFirst].into_iter().all(|order| {
                        !hand_steps_in_order(board, mv, game.side_to_move, order).contains(&STARTING_POSITION)
                    })
                })
                .collect();
            let Some(mv) = candidates.choose(&mut rng).copied() else {
                break;
            };

            let order = if ply % 2 == 0 {
                CaptureOrder::VictimFirst
            } else {
                CaptureOrder::MoverFirst
            };
            let steps = hand_steps_in_order(board, &mv, game.side_to_move, order);
            let (last, intermediate) = steps.split_last().expect("every move has a final step");
            for step in intermediate {
                liboard.on_new_physical_position(*step);
                assert!(
                    !liboard.generate_move(),
                    "seed {seed} ply {ply}: {mv} resolved before the hand finished"
                );
            }
            liboard.on_new_physical_position(*last);
            assert!(liboard.generate_move(), "seed {seed} ply {ply}: {mv} not recognised");

            game = oracle.apply_move(&game, &mv).expect("apply");
            board = *last;

            assert_eq!(liboard.ledger().last().map(|entry| entry.mv), Some(mv));
            assert_eq!(liboard.game_state(), &game, "seed {seed} ply {ply}");
            assert_eq!(liboard.known_position(), PhysicalPosition::from_game_state(&game));
            assert!(liboard.lifted_pieces().is_empty());
        }

        // Taking every move back returns to the start.
        while liboard.takeback() {}
        assert_eq!(liboard.game_state(), &GameState::new_game(), "seed {seed}");
        assert_eq!(liboard.known_position(), STARTING_POSITION);
    }
}

//! The board engine: one logical game kept in step with one physical board.
//!
//! `LiBoard` owns every piece of mutable state (logical position, ledger,
//! known and physical occupancy, lifted squares) and is driven from a single
//! thread. It never sleeps or schedules work itself: an observation reports
//! when reconciliation should run, and the driver (see
//! [`crate::board::session`]) calls [`LiBoard::generate_move`] at that time.

use std::time::Duration;

use crossbeam_channel::Receiver;
use log::{debug, error, info, warn};

use crate::board::config::BoardConfig;
use crate::board::events::{BoardEvent, EventBus};
use crate::board::lifted_pieces::LiftedPieces;
use crate::board::physical_position::{PhysicalPosition, STARTING_POSITION};
use crate::board::reconciliation::{reconcile, PositionDelta};
use crate::game_state::game_state::GameState;
use crate::game_state::move_ledger::{GameOutcome, LedgerEntry, MoveLedger};
use crate::move_generation::move_oracle::{LegalMoveOracle, MoveOracle};
use crate::utils::pgn::write_pgn;
use crate::utils::san::move_to_san;

/// What the driver should do after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The starting layout was seen and a new game began.
    GameStarted,
    /// Call [`LiBoard::generate_move`] once this long has passed without a
    /// newer observation.
    ReconcileAfter(Duration),
    /// Clock-move mode: nothing happens until [`LiBoard::try_clock_switch`].
    AwaitingConfirmation,
}

pub struct LiBoard<O: MoveOracle = LegalMoveOracle> {
    oracle: O,
    config: BoardConfig,
    game_state: GameState,
    ledger: MoveLedger,
    known_position: PhysicalPosition,
    physical_position: PhysicalPosition,
    lifted: LiftedPieces,
    connected: bool,
    events: EventBus,
}

impl LiBoard<LegalMoveOracle> {
    pub fn new(config: BoardConfig) -> Self {
        Self::with_oracle(LegalMoveOracle, config)
    }
}

impl Default for LiBoard<LegalMoveOracle> {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl<O: MoveOracle> LiBoard<O> {
    pub fn with_oracle(oracle: O, config: BoardConfig) -> Self {
        let game_state = GameState::new_game();
        Self {
            oracle,
            config,
            ledger: MoveLedger::new(game_state.clone()),
            game_state,
            known_position: STARTING_POSITION,
            physical_position: STARTING_POSITION,
            lifted: LiftedPieces::new(),
            connected: false,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Records a new sensor snapshot. The starting layout always restarts
    /// the game; anything else only widens the lifted set and asks for a
    /// reconciliation.
    pub fn on_new_physical_position(&mut self, position: PhysicalPosition) -> Observation {
        self.physical_position = position;
        self.events.broadcast(BoardEvent::PhysicalPositionChanged);

        if position.is_starting_position() {
            info!("starting position on the board, new game");
            self.reset(GameState::new_game(), position);
            return Observation::GameStarted;
        }

        self.lifted.observe(&self.known_position, &self.physical_position);

        if self.config.clock_move {
            Observation::AwaitingConfirmation
        } else {
            Observation::ReconcileAfter(self.config.move_delay)
        }
    }

    /// Decodes and observes one raw frame. Malformed frames are dropped.
    pub fn on_new_frame(&mut self, frame: &[u8]) -> Option<Observation> {
        match PhysicalPosition::decode(frame) {
            Ok(position) => Some(self.on_new_physical_position(position)),
            Err(err) => {
                warn!("dropping frame: {err}");
                None
            }
        }
    }

    /// Tries to explain the current physical position with one legal move
    /// and commits it. Returns whether a move was made.
    pub fn generate_move(&mut self) -> bool {
        let delta = PositionDelta::between(&self.known_position, &self.physical_position, &self.lifted);

        let reconciled = match reconcile(&self.oracle, &self.game_state, &delta) {
            Ok(Some(reconciled)) => reconciled,
            Ok(None) => return false,
            Err(err) => {
                error!("move oracle failed: {err}");
                return false;
            }
        };

        let san = move_to_san(&self.game_state, &reconciled.mv).unwrap_or_else(|err| {
            debug!("no SAN for {}: {err}", reconciled.mv);
            reconciled.mv.to_string()
        });
        info!("move {} ({san})", reconciled.mv);

        let before = std::mem::replace(&mut self.game_state, reconciled.next);
        self.ledger.push(LedgerEntry {
            mv: reconciled.mv,
            san,
            before,
        });
        self.known_position = self.physical_position;
        self.lifted.clear();
        self.events.broadcast(BoardEvent::MoveApplied);
        true
    }

    /// Undoes the last move. On an empty ledger this only logs a warning.
    pub fn takeback(&mut self) -> bool {
        let Some(entry) = self.ledger.pop() else {
            warn!("takeback requested with no moves played");
            return false;
        };

        info!("takeback of {}", entry.san);
        self.game_state = entry.before;
        self.known_position = PhysicalPosition::from_game_state(&self.game_state);
        self.lifted.clear();
        self.events.broadcast(BoardEvent::Takeback);
        true
    }

    /// Whether the player's clock may switch. In clock-move mode the press
    /// confirms the move on the board and succeeds only if one was found.
    pub fn try_clock_switch(&mut self) -> bool {
        if !self.config.clock_move {
            return true;
        }
        self.generate_move()
    }

    pub fn new_game(&mut self) {
        self.start_from(GameState::new_game());
    }

    /// Starts a game from an arbitrary position, assuming the board is set up
    /// to match it.
    pub fn start_from(&mut self, game_state: GameState) {
        let expected = PhysicalPosition::from_game_state(&game_state);
        info!("new game from {}", game_state.get_fen());
        self.reset(game_state, expected);
    }

    fn reset(&mut self, game_state: GameState, known: PhysicalPosition) {
        self.ledger = MoveLedger::new(game_state.clone());
        self.game_state = game_state;
        self.known_position = known;
        self.lifted.clear();
        self.events.broadcast(BoardEvent::GameStart);
    }

    pub fn on_connected(&mut self) {
        info!("board connected");
        self.connected = true;
        self.events.broadcast(BoardEvent::Connected);
    }

    pub fn on_disconnected(&mut self) {
        if !self.connected {
            return;
        }
        info!("board disconnected");
        self.connected = false;
        self.events.broadcast(BoardEvent::Disconnected);
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    pub fn known_position(&self) -> PhysicalPosition {
        self.known_position
    }

    pub fn physical_position(&self) -> PhysicalPosition {
        self.physical_position
    }

    pub fn lifted_pieces(&self) -> &LiftedPieces {
        &self.lifted
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BoardConfig) {
        self.config = config;
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn outcome(&self) -> GameOutcome {
        GameOutcome::of(&self.game_state)
    }

    pub fn to_pgn(&self) -> String {
        write_pgn(&self.ledger, self.outcome())
    }
}

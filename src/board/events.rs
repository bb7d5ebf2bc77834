//! Notifications for UI and clock collaborators.
//!
//! Events carry no state; subscribers query the board (or a session
//! snapshot) after receiving one.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardEvent {
    Connected,
    Disconnected,
    GameStart,
    MoveApplied,
    PhysicalPositionChanged,
    Takeback,
}

/// Fan-out of [`BoardEvent`]s to any number of channel subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<BoardEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Sends `event` to every live subscriber and forgets the ones whose
    /// receiver was dropped.
    pub fn broadcast(&mut self, event: BoardEvent) {
        trace!("broadcast {event:?} to {} subscribers", self.subscribers.len());
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

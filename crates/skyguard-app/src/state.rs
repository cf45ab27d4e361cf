//! State shared between the input reader, the game loop thread and the
//! output writer.

use std::sync::{Arc, Mutex};

use skyguard_core::commands::PlayerCommand;
use skyguard_core::events::GameEvent;
use skyguard_core::state::SessionSnapshot;

/// Messages sent to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Emit a snapshot after the next frame.
    EmitSnapshot,
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Messages produced by the game loop thread, in frame order.
#[derive(Debug, Clone)]
pub enum LoopOutput {
    Event(GameEvent),
    Snapshot(Box<SessionSnapshot>),
}

/// Latest frame snapshot, shared with the game loop thread.
///
/// Updated after every frame so a host can poll without waiting for the
/// next emitted snapshot.
#[derive(Debug, Clone, Default)]
pub struct LatestSnapshot(Arc<Mutex<Option<SessionSnapshot>>>);

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, snapshot: SessionSnapshot) {
        if let Ok(mut lock) = self.0.lock() {
            *lock = Some(snapshot);
        }
    }

    pub fn get(&self) -> Option<SessionSnapshot> {
        self.0.lock().ok().and_then(|lock| lock.clone())
    }
}

//! Game loop thread. Runs the simulation engine at 60Hz and emits events
//! and snapshots.
//!
//! The engine is moved into the thread and owned there. Commands arrive
//! via an `mpsc` channel; outputs leave through another one. The loop
//! measures real elapsed time per frame and lets the engine clamp and
//! scale it.

use std::io;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info};

use skyguard_core::constants::FRAME_RATE;
use skyguard_sim::SimulationEngine;

use crate::state::{LatestSnapshot, LoopCommand, LoopOutput};

/// Nominal duration of one frame.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64);

#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// Emit a snapshot every N frames. Zero emits only on request and at
    /// the end of the session.
    pub snapshot_every: u32,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self { snapshot_every: 30 }
    }
}

/// Handle to a running game loop thread.
pub struct LoopHandle {
    cmd_tx: mpsc::Sender<LoopCommand>,
    thread: JoinHandle<()>,
}

impl LoopHandle {
    /// Forward a command. Returns false once the loop has stopped.
    pub fn send(&self, command: LoopCommand) -> bool {
        self.cmd_tx.send(command).is_ok()
    }

    /// Extra sender for another producer thread.
    pub fn sender(&self) -> mpsc::Sender<LoopCommand> {
        self.cmd_tx.clone()
    }

    /// Ask the loop to stop and wait for it.
    pub fn shutdown(self) -> thread::Result<()> {
        let _ = self.cmd_tx.send(LoopCommand::Shutdown);
        self.thread.join()
    }

    /// Wait for the loop to end on its own.
    pub fn join(self) -> thread::Result<()> {
        let Self { cmd_tx, thread } = self;
        // Only other senders keep the loop alive from here.
        drop(cmd_tx);
        thread.join()
    }
}

/// Spawns the game loop in a new thread.
///
/// The thread ends on game over, on `ReturnToMenu`, on `Shutdown`, or when
/// every command sender is gone.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    output_tx: mpsc::Sender<LoopOutput>,
    latest_snapshot: LatestSnapshot,
    options: LoopOptions,
) -> io::Result<LoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let thread = thread::Builder::new()
        .name("skyguard-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, output_tx, &latest_snapshot, options);
        })?;

    Ok(LoopHandle { cmd_tx, thread })
}

/// The game loop.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    output_tx: mpsc::Sender<LoopOutput>,
    latest_snapshot: &LatestSnapshot,
    options: LoopOptions,
) {
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;
    let mut frame_count: u64 = 0;

    loop {
        // 1. Drain all pending commands
        let mut snapshot_requested = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::EmitSnapshot) => snapshot_requested = true,
                Ok(LoopCommand::Shutdown) => {
                    info!("game loop shut down after {frame_count} frames");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("command channel closed");
                    return;
                }
            }
        }

        // 2. Advance one frame by the real time since the last one
        let now = Instant::now();
        let real_delta_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;
        let snapshot = engine.frame(real_delta_ms);
        frame_count += 1;

        // 3. Forward events
        for event in engine.drain_events() {
            if output_tx.send(LoopOutput::Event(event)).is_err() {
                return;
            }
        }

        // 4. Snapshot: on request, periodically, and once at the end
        let finished = engine.is_game_over() || engine.is_closed();
        let periodic =
            options.snapshot_every > 0 && frame_count % u64::from(options.snapshot_every) == 0;
        if (snapshot_requested || periodic || finished)
            && output_tx
                .send(LoopOutput::Snapshot(Box::new(snapshot.clone())))
                .is_err()
        {
            return;
        }
        latest_snapshot.store(snapshot);

        if finished {
            info!("session finished after {frame_count} frames");
            return;
        }

        // 5. Sleep until the next frame
        next_frame_time += FRAME_DURATION;
        let now = Instant::now();
        if next_frame_time > now {
            thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > FRAME_DURATION * 2 {
            // Too far behind; the engine clamps long frames anyway.
            next_frame_time = now;
        }
    }
}

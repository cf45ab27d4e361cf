use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use log::{error, info};

use skyguard_app::game_loop::{self, LoopOptions};
use skyguard_app::state::LatestSnapshot;
use skyguard_app::{ipc, logging};
use skyguard_core::constants::{
    DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, TIME_SCALE_FAST, TIME_SCALE_NORMAL,
};
use skyguard_core::loader::{BalanceCache, DirectorySource, NoSource};
use skyguard_core::types::FieldSize;
use skyguard_sim::records::{JsonFileStore, NullStore, RecordStore};
use skyguard_sim::{SimConfig, SimulationEngine};

/// Headless tower-defense session driven by JSON lines on stdin
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding towers.json and waves.json
    #[arg(long)]
    balance_dir: Option<PathBuf>,

    /// Directory for the persistent best record; omit to keep nothing
    #[arg(long)]
    record_dir: Option<PathBuf>,

    /// RNG seed for spawn lanes and composition
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = DEFAULT_FIELD_WIDTH)]
    width: f64,

    #[arg(long, default_value_t = DEFAULT_FIELD_HEIGHT)]
    height: f64,

    /// Emit a snapshot every N frames (0 = only on request)
    #[arg(long, default_value_t = 30)]
    snapshot_every: u32,

    /// Start at double speed
    #[arg(long)]
    fast: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let cache = BalanceCache::new();
    let balance = match &args.balance_dir {
        Some(dir) => cache.get_or_load(&DirectorySource::new(dir)),
        None => cache.get_or_load(&NoSource),
    };
    let store: Box<dyn RecordStore> = match &args.record_dir {
        Some(dir) => Box::new(JsonFileStore::new(dir)),
        None => Box::new(NullStore),
    };

    let mut engine = SimulationEngine::new(
        SimConfig {
            seed: args.seed,
            field: FieldSize::default(),
            time_scale: if args.fast {
                TIME_SCALE_FAST
            } else {
                TIME_SCALE_NORMAL
            },
        },
        balance,
        store,
    );
    engine.resize_field(args.width, args.height);

    let (output_tx, output_rx) = mpsc::channel();
    let latest = LatestSnapshot::new();
    let options = LoopOptions {
        snapshot_every: args.snapshot_every,
    };
    let handle = match game_loop::spawn_game_loop(engine, output_tx, latest.clone(), options) {
        Ok(handle) => handle,
        Err(e) => {
            error!("failed to spawn game loop: {e}");
            return ExitCode::FAILURE;
        }
    };

    // The reader is never joined: it may be blocked on stdin when the
    // session ends. EOF drops its sender, which ends the session.
    let cmd_tx = handle.sender();
    let reader = std::thread::Builder::new()
        .name("skyguard-input".into())
        .spawn(move || ipc::read_commands(io::stdin().lock(), &cmd_tx));
    if let Err(e) = reader {
        error!("failed to spawn input reader: {e}");
        return ExitCode::FAILURE;
    }

    let writer = std::thread::Builder::new()
        .name("skyguard-output".into())
        .spawn(move || ipc::write_outputs(output_rx, io::stdout().lock()));
    // From here only the reader's sender keeps the loop alive.
    if handle.join().is_err() {
        error!("game loop panicked");
        return ExitCode::FAILURE;
    }
    match writer.map(|w| w.join()) {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => error!("writing output failed: {e}"),
        Ok(Err(_)) => error!("output writer panicked"),
        Err(e) => error!("failed to spawn output writer: {e}"),
    }

    if let Some(last) = latest.get() {
        info!(
            "final state: wave {}, health {}, {} kills, {} leaks",
            last.hud.wave, last.hud.health, last.hud.kills, last.hud.leaks
        );
    }
    ExitCode::SUCCESS
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use penguard_app::game_loop::{LoopConfig, DEFAULT_FPS};
use penguard_app::host;
use penguard_app::progress::ProgressTracker;
use penguard_app::session::{build_session, SessionOptions, TowerPlacement};
use penguard_app::state::AppState;
use penguard_core::commands::PlayerCommand;
use penguard_core::enums::Theme;
use penguard_progress::{load_pack, FileStorage, MemoryStorage, Storage};
use penguard_quality::QualitySetting;

/// Run a penguard tower-defense session headlessly.
#[derive(Parser, Debug)]
#[command(name = "penguard", version, about)]
struct Args {
    /// Map JSON file; defaults to the pack map or blank board for the slot
    #[arg(long)]
    map: Option<PathBuf>,

    /// Theme: hockey or soccer
    #[arg(long, default_value = "hockey")]
    theme: Theme,

    /// Built-in map slot (1-10)
    #[arg(long, default_value_t = 1)]
    slot: u8,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the preset wave count
    #[arg(long)]
    waves: Option<u32>,

    /// Frames per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Directory for save and pack files; progress is not kept without it
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Tower to place before the first wave, as <type>@<x>,<y> (repeatable)
    #[arg(long = "tower", value_name = "TYPE@X,Y")]
    towers: Vec<TowerPlacement>,

    /// Game speed multiplier (1, 2 or 3)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    speed: u8,

    /// Start every wave automatically
    #[arg(long)]
    auto_waves: bool,

    /// Run as fast as possible with a fixed 1/fps step
    #[arg(long)]
    fast: bool,

    /// Graphics quality: auto, low, medium or high
    #[arg(long, value_parser = parse_quality)]
    quality: Option<QualitySetting>,

    /// Scale enemy HP with the wave number
    #[arg(long)]
    hp_scaling: bool,
}

fn parse_quality(s: &str) -> Result<QualitySetting, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unknown quality '{s}'"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let storage: Box<dyn Storage + Send> = match &args.save_dir {
        Some(dir) => Box::new(FileStorage::new(dir)),
        None => Box::new(MemoryStorage::new()),
    };
    let pack = load_pack(&*storage);
    let mut progress = ProgressTracker::open(storage);
    let quality = match args.quality {
        Some(setting) => {
            progress.quality_changed(setting);
            setting
        }
        None => progress.save_state().settings.graphics,
    };

    let map_json = match &args.map {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read map {}", path.display()))?,
        ),
        None => None,
    };
    let options = SessionOptions {
        theme: args.theme,
        slot: args.slot,
        map_json,
        waves: args.waves,
        seed: args.seed,
        hp_scaling: args.hp_scaling,
    };
    let session = build_session(&options, &pack)?;
    let map_id = session.map_id().to_string();

    let config = LoopConfig {
        fps: args.fps,
        max_frames: args.max_frames,
        realtime: !args.fast,
        auto_waves: args.auto_waves,
        quality,
        opening_commands: args
            .towers
            .iter()
            .map(TowerPlacement::command)
            .chain((args.speed != 1).then_some(PlayerCommand::SetGameSpeed { speed: args.speed }))
            .collect(),
    };

    let state = AppState::new();
    host::start_simulation(&state, session, config, Some(progress))?;

    let outcome = host::wait(&state)?;
    info!(frames = outcome.frames, map = %map_id, "session ended");

    if let Some(snapshot) = &outcome.final_snapshot {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    }
    Ok(())
}

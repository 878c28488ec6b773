//! Game loop thread: runs the engine at a fixed frame rate and publishes snapshots.
//!
//! The engine is created inside this thread since its scene and observer
//! are not `Send`. Commands arrive via `mpsc`. The latest snapshot is kept
//! in shared state for polling. Progress is written only when the session
//! starts, when it ends and when the graphics setting changes.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use penguard_core::commands::PlayerCommand;
use penguard_core::enums::{GamePhase, Theme};
use penguard_core::state::GameStateSnapshot;
use penguard_progress::SaveState;
use penguard_quality::{QualityManager, QualitySetting, QualityTier};
use penguard_sim::{GameConfig, SimConfig, SimulationEngine};

use crate::progress::ProgressTracker;
use crate::state::GameLoopCommand;

pub const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub fps: u32,
    /// Stop after this many frames even if the session is not over.
    pub max_frames: Option<u64>,
    /// Pace frames against the wall clock. When off, every frame advances
    /// exactly `1 / fps` seconds and the loop never sleeps.
    pub realtime: bool,
    /// Start the next wave as soon as the board is back in placing.
    pub auto_waves: bool,
    pub quality: QualitySetting,
    /// Queued before the first frame, ahead of any auto-started wave.
    pub opening_commands: Vec<PlayerCommand>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            max_frames: None,
            realtime: true,
            auto_waves: false,
            quality: QualitySetting::Auto,
            opening_commands: Vec::new(),
        }
    }
}

/// What the loop hands back when its thread exits.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub frames: u64,
    pub final_snapshot: Option<GameStateSnapshot>,
    pub quality_tier: QualityTier,
    pub save: Option<SaveState>,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the host and the thread's handle.
pub fn spawn_game_loop(
    game: GameConfig,
    sim: SimConfig,
    config: LoopConfig,
    progress: Option<ProgressTracker>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<LoopOutcome>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("penguard-game-loop".into())
        .spawn(move || run_game_loop(game, sim, config, progress, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until shutdown, channel disconnect, game over or
/// the frame limit.
fn run_game_loop(
    game: GameConfig,
    sim: SimConfig,
    config: LoopConfig,
    mut progress: Option<ProgressTracker>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> LoopOutcome {
    let theme: Theme = game.theme;
    let map_id = game.map.id.clone();
    let mut engine = SimulationEngine::new(game, sim);
    engine.queue_commands(config.opening_commands.iter().cloned());

    let fps = config.fps.max(1);
    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(fps));
    let mut quality = QualityManager::new(0.0);
    quality.set_quality(config.quality);

    if let Some(p) = progress.as_mut() {
        p.session_started(theme, &map_id);
    }

    let started = Instant::now();
    let mut last_frame = started;
    let mut next_frame_time = started;
    let mut frames: u64 = 0;
    let mut phase = engine.phase();
    let mut wave_requested = false;
    let mut final_snapshot = None;

    info!(fps, realtime = config.realtime, map = %map_id, "game loop started");

    'frames: loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::SetQuality(setting)) => {
                    quality.set_quality(setting);
                    if let Some(p) = progress.as_mut() {
                        p.quality_changed(setting);
                    }
                }
                Ok(GameLoopCommand::Shutdown) => {
                    debug!("shutdown requested");
                    break 'frames;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'frames,
            }
        }

        if config.auto_waves && phase == GamePhase::Placing && !wave_requested {
            engine.queue_command(PlayerCommand::StartWave);
            wave_requested = true;
        }

        // 2. Advance one frame
        let now = Instant::now();
        let dt = if config.realtime {
            now.duration_since(last_frame).as_secs_f32()
        } else {
            frame_duration.as_secs_f32()
        };
        last_frame = now;
        let snapshot = engine.tick(dt);
        frames += 1;

        // 3. Feed the frame clock to the quality manager
        let clock_ms = if config.realtime {
            started.elapsed().as_secs_f64() * 1000.0
        } else {
            frames as f64 * frame_duration.as_secs_f64() * 1000.0
        };
        quality.record_frame(clock_ms);

        // 4. React to phase transitions
        if snapshot.phase != phase {
            debug!(from = ?phase, to = ?snapshot.phase, wave = snapshot.wave, "phase changed");
            if snapshot.phase == GamePhase::WaveActive {
                wave_requested = false;
            }
            if snapshot.phase.is_over() {
                if let Some(p) = progress.as_mut() {
                    p.session_finished(&map_id, snapshot.stars, snapshot.phase == GamePhase::Won);
                }
            }
            phase = snapshot.phase;
        }

        // 5. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        let over = snapshot.is_over();
        final_snapshot = Some(snapshot);

        if over || config.max_frames.is_some_and(|max| frames >= max) {
            break;
        }

        // 6. Sleep until the next frame
        if config.realtime {
            next_frame_time += frame_duration;
            let now = Instant::now();
            if next_frame_time > now {
                std::thread::sleep(next_frame_time - now);
            } else if now - next_frame_time > frame_duration * 2 {
                // Too far behind; skip ahead instead of bursting
                next_frame_time = now;
            }
        }
    }

    engine.destroy();
    info!(frames, phase = ?phase, tier = ?quality.tier(), "game loop stopped");

    LoopOutcome {
        frames,
        final_snapshot,
        quality_tier: quality.tier(),
        save: progress.map(ProgressTracker::into_save_state),
    }
}

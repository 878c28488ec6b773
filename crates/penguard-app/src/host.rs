//! Host-facing entry points: start a session, send commands, poll snapshots.
//!
//! These bridge a front end (the CLI here) to the game loop thread via
//! channels.

use penguard_core::commands::PlayerCommand;
use penguard_core::state::GameStateSnapshot;
use penguard_quality::QualitySetting;

use crate::game_loop::{self, LoopConfig, LoopOutcome};
use crate::progress::ProgressTracker;
use crate::session::Session;
use crate::state::{AppState, GameLoopCommand, HostError};

/// Start the simulation. Spawns the game loop thread unless one is running.
pub fn start_simulation(
    state: &AppState,
    session: Session,
    config: LoopConfig,
    progress: Option<ProgressTracker>,
) -> Result<(), HostError> {
    let mut handle = state.handle.lock().map_err(|_| HostError::Poisoned)?;
    if handle.as_ref().is_some_and(|h| !h.is_finished()) {
        return Err(HostError::AlreadyRunning);
    }

    let (cmd_tx, join) = game_loop::spawn_game_loop(
        session.game,
        session.sim,
        config,
        progress,
        state.latest_snapshot.clone(),
    )?;

    let mut tx_lock = state.command_tx.lock().map_err(|_| HostError::Poisoned)?;
    *tx_lock = Some(cmd_tx);
    *handle = Some(join);
    Ok(())
}

pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), HostError> {
    send(state, GameLoopCommand::Player(command))
}

pub fn set_quality(state: &AppState, setting: QualitySetting) -> Result<(), HostError> {
    send(state, GameLoopCommand::SetQuality(setting))
}

/// Latest snapshot, or `None` before the first frame.
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, HostError> {
    let lock = state.latest_snapshot.lock().map_err(|_| HostError::Poisoned)?;
    Ok(lock.clone())
}

/// Block until the loop exits on its own (game over or frame limit).
pub fn wait(state: &AppState) -> Result<LoopOutcome, HostError> {
    let join = state
        .handle
        .lock()
        .map_err(|_| HostError::Poisoned)?
        .take()
        .ok_or(HostError::NotStarted)?;
    let outcome = join.join().map_err(|_| HostError::LoopPanicked)?;
    if let Ok(mut tx) = state.command_tx.lock() {
        *tx = None;
    }
    Ok(outcome)
}

/// Ask the loop to stop and wait for it.
pub fn shutdown(state: &AppState) -> Result<LoopOutcome, HostError> {
    // A loop that already exited has dropped its receiver; that is fine.
    let _ = send(state, GameLoopCommand::Shutdown);
    wait(state)
}

fn send(state: &AppState, command: GameLoopCommand) -> Result<(), HostError> {
    let tx_lock = state.command_tx.lock().map_err(|_| HostError::Poisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(command).map_err(|_| HostError::Disconnected),
        None => Err(HostError::NotStarted),
    }
}

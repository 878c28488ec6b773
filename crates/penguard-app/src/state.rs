//! Host state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use penguard_core::commands::PlayerCommand;
use penguard_core::state::GameStateSnapshot;
use penguard_quality::QualitySetting;

use crate::game_loop::LoopOutcome;

/// Messages from the host to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum GameLoopCommand {
    /// Forwarded to the engine's command queue.
    Player(PlayerCommand),
    /// Change the graphics setting; persisted with the save.
    SetQuality(QualitySetting),
    /// Stop after the current frame.
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop has exited")]
    Disconnected,
    #[error("game loop thread panicked")]
    LoopPanicked,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("host state lock poisoned")]
    Poisoned,
}

/// Shared host state.
///
/// `command_tx` and `handle` are `None` until a session is started. The
/// latest snapshot is written by the loop after every frame and may be
/// polled from any thread.
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub handle: Mutex<Option<JoinHandle<LoopOutcome>>>,
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            handle: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .map(|h| h.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(!state.is_running());
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Player(PlayerCommand::StartWave)).unwrap();
        tx.send(GameLoopCommand::SetQuality(QualitySetting::Low)).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            commands,
            vec![
                GameLoopCommand::Player(PlayerCommand::StartWave),
                GameLoopCommand::SetQuality(QualitySetting::Low),
                GameLoopCommand::Shutdown,
            ]
        );
    }
}

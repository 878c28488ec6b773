//! Observer interface through which the controller reports to the UI.

use penguard_core::state::GameStateSnapshot;

/// Fixed set of notifications raised by the controller.
///
/// `on_state_update` follows every tick and every mutating command;
/// `on_wave_complete` fires once per return to placing; `on_game_over`
/// fires once when the session ends.
pub trait GameObserver {
    fn on_state_update(&mut self, _snapshot: &GameStateSnapshot) {}
    fn on_wave_complete(&mut self, _wave: u32) {}
    fn on_game_over(&mut self, _won: bool) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

//! Writes meta-progress on session phase transitions.

use tracing::{info, warn};

use penguard_core::enums::Theme;
use penguard_progress::{load_game_state, save_game_state, SaveState, Storage};
use penguard_quality::QualitySetting;

/// A loaded save plus the backend it is written back to.
pub struct ProgressTracker {
    storage: Box<dyn Storage + Send>,
    save: SaveState,
}

impl ProgressTracker {
    /// Load the current save, or defaults when it is missing or invalid.
    pub fn open(storage: Box<dyn Storage + Send>) -> Self {
        let save = load_game_state(&*storage);
        Self { storage, save }
    }

    pub fn save_state(&self) -> &SaveState {
        &self.save
    }

    pub fn into_save_state(self) -> SaveState {
        self.save
    }

    pub fn session_started(&mut self, theme: Theme, map_id: &str) {
        self.save.set_last_played(theme, map_id);
        self.flush();
    }

    pub fn session_finished(&mut self, map_id: &str, stars: u8, won: bool) {
        self.save.record_result(map_id, stars, won);
        info!(
            map_id,
            stars,
            won,
            best = self.save.best_stars(map_id),
            "recorded session result"
        );
        self.flush();
    }

    pub fn quality_changed(&mut self, setting: QualitySetting) {
        self.save.set_graphics(setting);
        self.flush();
    }

    /// Persistence failures never interrupt play.
    fn flush(&mut self) {
        if let Err(e) = save_game_state(&mut *self.storage, &self.save) {
            warn!(error = %e, "failed to save progress");
        }
    }
}

//! Meta-progress persistence for penguard.
//!
//! A small versioned save blob (best stars per map, last theme and map,
//! graphics setting, win counters) plus the editor's content pack, both
//! stored as JSON under fixed keys in a pluggable [`Storage`] backend.

pub mod error;
pub mod save;
pub mod storage;

pub use error::ProgressError;
pub use save::{load_game_state, load_pack, save_game_state, save_pack, SaveMeta, SaveSettings, SaveState, SAVE_VERSION};
pub use storage::{FileStorage, MemoryStorage, Storage};

//! Rendering collaborator interface.
//!
//! The simulation only holds opaque handles; it never looks at how a
//! visual is drawn.

use penguard_core::enums::VisualKind;
use penguard_core::types::{VisualHandle, WorldPos};

/// Place, move and remove visuals on the rendering side.
pub trait SceneSink {
    fn add_visual(&mut self, kind: VisualKind, position: WorldPos, color: &str) -> VisualHandle;
    fn move_visual(&mut self, handle: VisualHandle, position: WorldPos);
    fn remove_visual(&mut self, handle: VisualHandle);
}

/// Scene that draws nothing. Hands out unique handles and counts live visuals.
#[derive(Debug, Default)]
pub struct NullScene {
    next_handle: u64,
    live: usize,
}

impl NullScene {
    /// Visuals added and not yet removed.
    pub fn live_visuals(&self) -> usize {
        self.live
    }
}

impl SceneSink for NullScene {
    fn add_visual(&mut self, _kind: VisualKind, _position: WorldPos, _color: &str) -> VisualHandle {
        self.next_handle += 1;
        self.live += 1;
        VisualHandle(self.next_handle)
    }

    fn move_visual(&mut self, _handle: VisualHandle, _position: WorldPos) {}

    fn remove_visual(&mut self, _handle: VisualHandle) {
        self.live = self.live.saturating_sub(1);
    }
}

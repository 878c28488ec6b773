//! Adaptive render quality for penguard.
//!
//! Measures frames per second from caller-supplied timestamps and steps
//! the render tier up or down. It never touches simulation state, so it
//! cannot affect determinism.

pub mod manager;
pub mod tiers;

pub use manager::{QualityManager, QualityThresholds, TierChange};
pub use tiers::{QualitySetting, QualityTier, RenderSettings};

#[cfg(test)]
mod tests;

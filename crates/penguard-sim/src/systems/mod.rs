//! Systems that advance the simulation world each tick.
//!
//! Each system owns an id-keyed index into the hecs world so iteration
//! order is spawn order and lookups by id never dangle. Component data
//! lives in the world.

pub mod damage;
pub mod enemies;
pub mod projectiles;
pub mod snapshot;
pub mod towers;

//! Core types and definitions for the penguard simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! ids and geometry, map and catalog data, commands, state snapshots,
//! events, constants and validation. It has no dependency on any
//! runtime, renderer or storage backend.

pub mod catalog;
pub mod commands;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod map;
pub mod pack;
pub mod state;
pub mod types;
pub mod validate;

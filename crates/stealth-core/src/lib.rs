//! Core types and definitions for the stealth perception simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! handles, poses, spotter states, host commands, events, snapshots,
//! constants and configuration. It has no dependency on any runtime framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

//! Core types and definitions for the SKYGUARD defense simulation.
//!
//! This crate defines the vocabulary shared across the workspace:
//! geometry, components, balance tables, commands, events, snapshots,
//! error types and the score formula. It has no runtime of its own.

pub mod balance;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod loader;
pub mod score;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

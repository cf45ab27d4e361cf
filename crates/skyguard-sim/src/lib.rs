//! Headless simulation for SKYGUARD.
//!
//! Owns the hecs ECS world, advances the session on simulated time,
//! and produces `SessionSnapshot`s for the renderer.

pub mod clock;
pub mod economy;
pub mod engine;
pub mod projectile;
pub mod records;
pub mod systems;
pub mod wave;

pub use engine::{SimConfig, SimulationEngine};
pub use skyguard_core as core;

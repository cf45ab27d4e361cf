//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! They do not own state; the engine passes in whatever they need.

pub mod cleanup;
pub mod combat;
pub mod effects;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod spawner;
pub mod status;
pub mod targeting;

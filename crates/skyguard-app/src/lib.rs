//! SKYGUARD headless host.
//!
//! This crate drives a simulation session on its own thread and bridges
//! it to a line-oriented JSON protocol on stdin/stdout.

pub mod game_loop;
pub mod ipc;
pub mod logging;
pub mod state;

pub use skyguard_core as core;

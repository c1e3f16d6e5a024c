//! Side-effecting collaborators: files on disk and the simulated world.

pub mod config;
pub mod prefs;
pub mod scenario;
pub mod sim;
pub mod tick_log;

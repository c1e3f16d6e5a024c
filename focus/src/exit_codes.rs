//! Stable exit codes for `focus` CLI commands.

/// Command succeeded or a goal was selected.
pub const OK: i32 = 0;
/// Invalid scenario/config/preferences or any other error.
pub const INVALID: i32 = 1;
/// `focus select` found no eligible goal.
pub const NO_GOAL: i32 = 2;

//! Goal-pursuit scheduler for a game automation agent.
//!
//! Every tick the scheduler either waits for a busy activity, picks the next
//! goal from an external catalog, or advances the current goal by one step.
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (eligibility, priority selection,
//!   execution steps, scheduler state). The world is reached only through
//!   traits; effects are issued as [`core::command::Command`] values.
//! - **[`io`]**: Side-effecting collaborators (configuration, preferences,
//!   scenario files, tick logs) and the simulated world used by the CLI.
//!
//! [`feature`] exposes the toggle-framework surface, [`driver`] runs it at a
//! fixed cadence, and [`select`] backs `focus select`.

pub mod core;
pub mod driver;
pub mod exit_codes;
pub mod feature;
pub mod io;
pub mod logging;
pub mod select;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

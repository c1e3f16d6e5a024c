//! Deterministic, pure logic for goal selection and pursuit.
//!
//! Core modules must be free of I/O side effects. The world is only reached
//! through the read traits in [`world`], and effects leave as [`command`]
//! values, so every function here is testable against an in-memory world.

pub mod command;
pub mod eligibility;
pub mod executor;
pub mod invariants;
pub mod region;
pub mod scheduler;
pub mod selector;
pub mod types;
pub mod world;

//! Stderr diagnostics for the `focus` binary.
//!
//! Scheduler decisions (selection, blocked ticks, executor steps) are traced
//! with `tracing` and filtered through `RUST_LOG`. What a run actually did is
//! recorded separately: `focus run --tick-log` appends one JSON record per
//! tick through `io::tick_log`, whatever the filter says.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber: compact lines on stderr, so stdout stays
/// reserved for command output.
///
/// `RUST_LOG=focus::core=debug focus run scenarios/starter.json --ticks 20`
/// shows every selection and executor step.
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact().with_target(true))
        .init();
}

//! Drives a [`FocusFeature`] at a fixed cadence.
//!
//! [`run_ticks`] ticks back to back (simulation speed); [`run_timer`] waits
//! one tick period between ticks on a tokio interval and honors Ctrl-C. Both
//! call `after_tick` once per tick, including the immediate tick performed by
//! `start()`, and always finish with `stop()`.

use anyhow::{Result, bail, ensure};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::core::scheduler::{SchedulerState, TickOutcome};
use crate::core::types::GoalId;
use crate::core::world::Host;
use crate::feature::FocusFeature;
use crate::io::prefs::Preferences;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveOptions {
    /// Upper bound on ticks, counting the start tick. `None` runs until the
    /// feature stops (or Ctrl-C for the timer driver).
    pub max_ticks: Option<u64>,
}

/// Reason why a drive ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStop {
    /// The feature turned itself off (no eligible goal left).
    FeatureStopped,
    TickLimit,
    Interrupted,
}

/// Scheduler view handed to `after_tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based tick number; the start tick is 1.
    pub tick: u64,
    pub state: SchedulerState,
    pub goal: Option<GoalId>,
    pub outcome: TickOutcome,
}

impl TickReport {
    fn new<P: Preferences>(feature: &FocusFeature<P>, tick: u64, outcome: TickOutcome) -> Self {
        Self {
            tick,
            state: feature.state(),
            goal: feature.scheduler().current().map(|goal| goal.id.clone()),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveSummary {
    pub ticks: u64,
    pub stop: DriveStop,
}

fn limit_reached(options: &DriveOptions, ticks: u64) -> bool {
    options.max_ticks.is_some_and(|max| ticks >= max)
}

fn start<P, H, F>(feature: &mut FocusFeature<P>, host: &mut H, after_tick: &mut F) -> Result<()>
where
    P: Preferences,
    H: Host,
    F: FnMut(&mut H, &TickReport) -> Result<()>,
{
    let Some(outcome) = feature.start(host) else {
        bail!("feature is already running");
    };
    let report = TickReport::new(feature, 1, outcome);
    after_tick(host, &report)
}

/// Tick without waiting between ticks.
pub fn run_ticks<P, H, F>(
    feature: &mut FocusFeature<P>,
    host: &mut H,
    options: &DriveOptions,
    mut after_tick: F,
) -> Result<DriveSummary>
where
    P: Preferences,
    H: Host,
    F: FnMut(&mut H, &TickReport) -> Result<()>,
{
    ensure!(!feature.is_running(), "feature is already running");
    if let Err(err) = start(feature, host, &mut after_tick) {
        return finish(feature, host, 1, Err(err));
    }
    let mut ticks = 1;
    let result = loop {
        if !feature.is_running() {
            break Ok(DriveStop::FeatureStopped);
        }
        if limit_reached(options, ticks) {
            break Ok(DriveStop::TickLimit);
        }
        let outcome = feature.tick(host);
        ticks += 1;
        let report = TickReport::new(feature, ticks, outcome);
        if let Err(err) = after_tick(&mut *host, &report) {
            break Err(err);
        }
    };
    finish(feature, host, ticks, result)
}

/// Tick once per feature period on a tokio interval.
///
/// The first interval tick fires one period after start so the immediate
/// start tick is not doubled; missed ticks are skipped, not bursted.
pub async fn run_timer<P, H, F>(
    feature: &mut FocusFeature<P>,
    host: &mut H,
    options: &DriveOptions,
    mut after_tick: F,
) -> Result<DriveSummary>
where
    P: Preferences,
    H: Host,
    F: FnMut(&mut H, &TickReport) -> Result<()>,
{
    let period = feature.period();
    ensure!(!feature.is_running(), "feature is already running");
    if let Err(err) = start(feature, host, &mut after_tick) {
        return finish(feature, host, 1, Err(err));
    }
    let mut ticks = 1;

    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        if !feature.is_running() {
            break Ok(DriveStop::FeatureStopped);
        }
        if limit_reached(options, ticks) {
            break Ok(DriveStop::TickLimit);
        }
        tokio::select! {
            _ = interval.tick() => {
                let outcome = feature.tick(host);
                ticks += 1;
                let report = TickReport::new(feature, ticks, outcome);
                if let Err(err) = after_tick(&mut *host, &report) {
                    break Err(err);
                }
            }
            signal = &mut ctrl_c => {
                if let Err(err) = signal {
                    warn!(error = %err, "ctrl-c listener failed");
                }
                break Ok(DriveStop::Interrupted);
            }
        }
    };
    finish(feature, host, ticks, result)
}

fn finish<P: Preferences, H: Host>(
    feature: &mut FocusFeature<P>,
    host: &mut H,
    ticks: u64,
    result: Result<DriveStop>,
) -> Result<DriveSummary> {
    feature.stop(host);
    let stop = result?;
    info!(ticks, ?stop, "drive finished");
    Ok(DriveSummary { ticks, stop })
}

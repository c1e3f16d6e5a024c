//! Scheduler loop: owns the current goal and decides, once per tick, whether
//! to wait, re-select, or advance.
//!
//! The scheduler never drives time itself. A driver calls [`Scheduler::tick`]
//! at a fixed period; each call runs to completion before the next one.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::core::command::Command;
use crate::core::executor::{Advance, advance};
use crate::core::region::RegionOrdering;
use crate::core::selector::next_goal;
use crate::core::types::{GoalId, GoalRecord, GoalVariant, SubFeature};
use crate::core::world::Host;

pub const NO_GOAL_MESSAGE: &str = "No more achievement to automate.\nTurning the feature off";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Stopped,
    /// Running without a current goal.
    Idle,
    Pursuing,
    /// The world reported a busy activity on the last tick.
    Blocked,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The scheduler is stopped; nothing was evaluated.
    NotRunning,
    /// The world is busy. `requested_stop` is true when the busy activity was
    /// asked to end after its current unit of work.
    Blocked { requested_stop: bool },
    /// The executor advanced the current goal by one step.
    Advanced { goal: GoalId, step: Advance },
    /// Nothing is eligible: the owning feature was disabled and a warning issued.
    NoGoalAvailable,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    ordering: RegionOrdering,
    source_tag: String,
    state: SchedulerState,
    current: Option<GoalRecord>,
    ticks: u64,
}

impl Scheduler {
    pub fn new(ordering: RegionOrdering, source_tag: impl Into<String>) -> Self {
        Self {
            ordering,
            source_tag: source_tag.into(),
            state: SchedulerState::Stopped,
            current: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != SchedulerState::Stopped
    }

    pub fn current(&self) -> Option<&GoalRecord> {
        self.current.as_ref()
    }

    /// Ticks evaluated since the last start.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_defer_last(&mut self, defer_last: bool) {
        self.ordering.set_defer_last(defer_last);
    }

    /// Enter `Idle` and perform one immediate tick.
    ///
    /// Returns `None` when already running; the extra start is ignored.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<TickOutcome> {
        if self.is_running() {
            debug!(state = ?self.state, "start ignored, already running");
            return None;
        }
        info!(defer_last = self.ordering.defer_last(), "scheduler started");
        self.state = SchedulerState::Idle;
        self.current = None;
        self.ticks = 0;
        Some(self.tick(host))
    }

    #[instrument(skip_all, fields(tick = self.ticks + 1, state = ?self.state))]
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::NotRunning;
        }
        self.ticks += 1;

        if host.is_busy() {
            self.state = SchedulerState::Blocked;
            let requested_stop = match &self.current {
                None => true,
                Some(goal) => {
                    matches!(goal.variant, GoalVariant::ClearDungeon { .. })
                        && host.is_completed(goal)
                }
            };
            if requested_stop {
                host.issue(Command::StopAfterCurrentRun);
            }
            debug!(requested_stop, "world busy");
            return TickOutcome::Blocked { requested_stop };
        }

        let needs_goal = self
            .current
            .as_ref()
            .is_none_or(|goal| host.is_completed(goal));
        if needs_goal {
            if let Some(done) = self.current.take() {
                info!(goal = %done.id, "goal completed");
            }
            self.state = SchedulerState::Idle;
            match next_goal(&*host, &self.ordering) {
                Some(goal) => self.pursue(host, goal),
                None => {
                    self.halt(host);
                    return TickOutcome::NoGoalAvailable;
                }
            }
        }

        let Some(goal) = self.current.as_ref() else {
            return TickOutcome::NotRunning;
        };
        let step = advance(goal, host);
        self.state = SchedulerState::Pursuing;
        TickOutcome::Advanced {
            goal: goal.id.clone(),
            step,
        }
    }

    /// Re-run selection for the current goal with the present ordering.
    ///
    /// Only acts while a goal is pinned; the result may be none, in which case
    /// the next tick handles the empty selection. While the world is busy the
    /// goal is reassigned without touching the tracker.
    pub fn reselect<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<&GoalRecord> {
        if self.current.is_none() {
            return None;
        }
        match next_goal(&*host, &self.ordering) {
            Some(goal) if host.is_busy() => {
                debug!(goal = %goal.id, "reselected while busy");
                self.current = Some(goal);
            }
            Some(goal) => self.pursue(host, goal),
            None => {
                debug!("reselection found no goal");
                self.current = None;
                if self.state == SchedulerState::Pursuing {
                    self.state = SchedulerState::Idle;
                }
            }
        }
        self.current.as_ref()
    }

    /// Clear the current goal and restore the world's safe defaults.
    ///
    /// Idempotent: every call issues the same restore commands.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.is_running() {
            info!(ticks = self.ticks, "scheduler stopped");
        }
        self.state = SchedulerState::Stopped;
        self.current = None;
        host.issue(Command::StopAfterCurrentRun);
        host.issue(Command::SetEnabled {
            feature: SubFeature::Gym,
            enabled: false,
        });
        host.issue(Command::SetCatchFilter { enabled: true });
    }

    fn pursue<H: Host + ?Sized>(&mut self, host: &mut H, goal: GoalRecord) {
        info!(goal = %goal.id, category = %goal.category, "pursuing goal");
        if host.can_track() {
            host.issue(Command::TrackGoal {
                goal: goal.id.clone(),
            });
        }
        self.current = Some(goal);
    }

    fn halt<H: Host + ?Sized>(&mut self, host: &mut H) {
        warn!("no eligible goal left, disabling feature");
        self.state = SchedulerState::Stopped;
        self.current = None;
        host.issue(Command::SetEnabled {
            feature: SubFeature::Focus,
            enabled: false,
        });
        host.issue(Command::Warn {
            source: self.source_tag.clone(),
            message: NO_GOAL_MESSAGE.to_string(),
        });
    }
}

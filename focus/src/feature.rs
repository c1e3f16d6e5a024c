//! The surface exposed to the feature-toggle framework: descriptor,
//! settings contribution, and the start/stop/tick entry points.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::region::{DeferrableCategory, RegionOrdering};
use crate::core::scheduler::{Scheduler, SchedulerState, TickOutcome};
use crate::core::types::GoalId;
use crate::core::world::Host;
use crate::io::config::FocusConfig;
use crate::io::prefs::Preferences;

pub const FEATURE_ID: &str = "Achievements";

const FEATURE_TOOLTIP: &str = "Completes the pending achievements\n\
    This feature handles the following achievements:\n\
    Route Kill, Clear Gym and Clear Dungeon\n\
    The achievements will be completed in region order.\n\
    The current achievement will be pinned to the tracker, if unlocked";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub tooltip: &'static str,
    /// Framework-driven refresh period; `None` when the feature runs its
    /// own timer.
    pub refresh_rate: Option<Duration>,
}

/// A labelled toggle bound to a boolean preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsToggle {
    pub label: String,
    pub tooltip: String,
    pub preference_key: String,
}

pub struct FocusFeature<P: Preferences> {
    scheduler: Scheduler,
    prefs: P,
    deferrable: Option<DeferrableCategory>,
    period: Duration,
}

impl<P: Preferences> FocusFeature<P> {
    pub fn new(config: &FocusConfig, prefs: P) -> Self {
        Self {
            scheduler: Scheduler::new(RegionOrdering::new(&config.regions), &config.source_tag),
            prefs,
            deferrable: config.regions.deferrable.clone(),
            period: config.tick_period(),
        }
    }

    pub fn descriptor() -> FeatureDescriptor {
        FeatureDescriptor {
            id: FEATURE_ID,
            name: FEATURE_ID,
            tooltip: FEATURE_TOOLTIP,
            refresh_rate: None,
        }
    }

    /// Apply the deferral preference default and describe its toggle.
    ///
    /// Returns `None` when no category is deferrable.
    pub fn build_settings(&mut self) -> Result<Option<SettingsToggle>> {
        let Some(deferrable) = &self.deferrable else {
            return Ok(None);
        };
        self.prefs
            .set_default_bool(&deferrable.preference_key, deferrable.default_deferred)
            .with_context(|| format!("apply default for {}", deferrable.preference_key))?;
        Ok(Some(SettingsToggle {
            label: format!("Complete {} achievements last", deferrable.category),
            tooltip: format!("Will perform the {} achievements last.", deferrable.category),
            preference_key: deferrable.preference_key.clone(),
        }))
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Start the loop and run the first tick. `None` if already running.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<TickOutcome> {
        let defer_last = self.stored_defer_last();
        self.scheduler.set_defer_last(defer_last);
        let outcome = self.scheduler.start(host)?;
        self.after_tick(host, &outcome);
        Some(outcome)
    }

    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H) -> TickOutcome {
        let outcome = self.scheduler.tick(host);
        self.after_tick(host, &outcome);
        outcome
    }

    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.scheduler.stop(host);
    }

    /// Handle a change of the deferral toggle.
    ///
    /// Persists the value and, if a goal is pinned, replaces it with a fresh
    /// selection under the new ordering. Returns the goal now pursued.
    pub fn set_defer_last<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        defer_last: bool,
    ) -> Result<Option<GoalId>> {
        if let Some(deferrable) = &self.deferrable {
            self.prefs
                .set_bool(&deferrable.preference_key, defer_last)
                .with_context(|| format!("store {}", deferrable.preference_key))?;
        }
        self.scheduler.set_defer_last(defer_last);
        let current = self.scheduler.reselect(host).map(|goal| goal.id.clone());
        info!(defer_last, goal = ?current.as_ref().map(GoalId::as_str), "deferral changed");
        Ok(current)
    }

    fn stored_defer_last(&self) -> bool {
        match &self.deferrable {
            Some(deferrable) => self
                .prefs
                .get_bool(&deferrable.preference_key)
                .unwrap_or(deferrable.default_deferred),
            None => false,
        }
    }

    /// Disabling the feature on an empty selection also runs its stop path.
    fn after_tick<H: Host + ?Sized>(&mut self, host: &mut H, outcome: &TickOutcome) {
        if *outcome == TickOutcome::NoGoalAvailable {
            debug!("feature disabled itself");
            self.scheduler.stop(host);
        }
    }
}

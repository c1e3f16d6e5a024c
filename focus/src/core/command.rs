//! Outbound effects, expressed as data.
//!
//! Commands are requests: the world decides how and when to apply them.
//! Keeping them as values lets hosts log, replay, and assert on them.

use serde::{Deserialize, Serialize};

use crate::core::region::RegionRank;
use crate::core::types::{DungeonMode, GoalId, Loadout, SubFeature};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    EquipLoadout { loadout: Loadout },
    MoveToRoute { route: u32, region: RegionRank },
    MoveToTown { town: String },
    SetEnabled { feature: SubFeature, enabled: bool },
    SetActiveTarget { feature: SubFeature, value: String },
    /// Delegate to the host's "best dungeon token route" resolver.
    FarmBestTokenRoute,
    /// Ask the busy activity to stop once its current unit of work ends.
    StopAfterCurrentRun,
    SetForceCompletion { feature: SubFeature, mode: DungeonMode },
    /// Capture filter restricting which encounters may be caught.
    SetCatchFilter { enabled: bool },
    /// Pin a goal in the progress tracker.
    TrackGoal { goal: GoalId },
    /// User-facing warning notification.
    Warn { source: String, message: String },
}

impl Command {
    /// True for the stop-after-run request, the only command the scheduler
    /// issues while the world is busy.
    pub fn is_stop_request(&self) -> bool {
        matches!(self, Command::StopAfterCurrentRun)
    }
}

/// Destination for issued commands.
pub trait CommandSink {
    fn issue(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn issue(&mut self, command: Command) {
        self.push(command);
    }
}

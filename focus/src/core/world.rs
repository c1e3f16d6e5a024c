//! Read-only views over the externally-owned world.
//!
//! Every query is soft-fail: lookups return `Option`, predicates return
//! `false` for anything the world does not know about. Implementations must
//! answer consistently within one tick.

use crate::core::command::CommandSink;
use crate::core::region::RegionRank;
use crate::core::types::{Currency, DungeonMode, GoalRecord, Loadout, SubFeature};

/// The goal catalog.
pub trait Catalog {
    /// Enumerate every goal record, in catalog order.
    fn goals(&self) -> Vec<GoalRecord>;
    /// Live completion predicate.
    fn is_completed(&self, goal: &GoalRecord) -> bool;
    /// Live achievability predicate.
    fn is_achievable(&self, goal: &GoalRecord) -> bool;
}

/// Town metadata needed for reachability and dungeon entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownInfo {
    pub region: RegionRank,
    /// Entry cost in dungeon tokens, when the town hosts a dungeon.
    pub dungeon_cost: Option<u64>,
}

/// Gym metadata. `parent_town` is set for league-champion-style gyms that
/// have no town entry of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymInfo {
    pub parent_town: Option<String>,
    pub unlocked: bool,
}

/// Player, map and automation state.
pub trait WorldContext {
    fn highest_region(&self) -> RegionRank;
    fn can_move_to_region(&self, region: RegionRank) -> bool;
    fn can_move_to_route(&self, route: u32, region: RegionRank) -> bool;
    /// Map-access rule for towns.
    fn has_town_access(&self, town: &str) -> bool;

    fn town(&self, name: &str) -> Option<TownInfo>;
    fn gym(&self, name: &str) -> Option<GymInfo>;
    /// Gym key at `index` of the flattened per-region gym list.
    fn gym_name(&self, index: usize) -> Option<String>;
    /// Dungeon key at `index` of the flattened per-region dungeon list.
    fn dungeon_name(&self, index: usize) -> Option<String>;

    fn balance(&self, currency: Currency) -> u64;
    fn is_player_in_town(&self, town: &str) -> bool;
    fn is_player_on_route(&self, route: u32, region: RegionRank) -> bool;
    fn active_loadout(&self) -> Option<Loadout>;

    /// True while a mutually-exclusive activity owns the action channel.
    fn is_busy(&self) -> bool;
    fn is_enabled(&self, feature: SubFeature) -> bool;
    fn active_target(&self, feature: SubFeature) -> Option<String>;
    fn dungeon_mode(&self) -> Option<DungeonMode>;
    fn is_catch_filter_enabled(&self) -> bool;
    /// Whether the goal tracker capability is unlocked.
    fn can_track(&self) -> bool;
}

/// Everything the scheduler needs from its host.
pub trait Host: Catalog + WorldContext + CommandSink {}

impl<T: Catalog + WorldContext + CommandSink> Host for T {}

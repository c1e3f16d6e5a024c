//! Eligibility filter: completed=false, achievable=true, and reachable.
//!
//! Location lookups are soft-fail. A record whose gym or dungeon cannot be
//! resolved to a town is treated as ineligible and skipped.

use tracing::debug;

use crate::core::region::RegionRank;
use crate::core::types::{GoalRecord, GoalVariant};
use crate::core::world::{Catalog, WorldContext};

/// A gym resolved to the town that governs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymTarget {
    /// Gym key, also the value written to the gym sub-feature's target selector.
    pub gym: String,
    pub town: String,
    pub town_region: RegionRank,
}

/// A dungeon resolved to its town and entry cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonTarget {
    pub town: String,
    pub town_region: RegionRank,
    pub token_cost: u64,
}

/// Resolve the town governing the gym at `gym_index`.
///
/// Fallback order: a town named after the gym, then the gym's parent town
/// (league champions). Returns `None` when neither exists.
pub fn resolve_gym<W: WorldContext + ?Sized>(world: &W, gym_index: usize) -> Option<GymTarget> {
    let gym = world.gym_name(gym_index)?;
    if let Some(town) = world.town(&gym) {
        return Some(GymTarget {
            town: gym.clone(),
            gym,
            town_region: town.region,
        });
    }
    let parent = world.gym(&gym)?.parent_town?;
    let town = world.town(&parent)?;
    Some(GymTarget {
        gym,
        town: parent,
        town_region: town.region,
    })
}

/// Resolve the dungeon at `dungeon_index` to its town.
///
/// Returns `None` when the dungeon key has no town entry or the town hosts no dungeon.
pub fn resolve_dungeon<W: WorldContext + ?Sized>(
    world: &W,
    dungeon_index: usize,
) -> Option<DungeonTarget> {
    let name = world.dungeon_name(dungeon_index)?;
    let town = world.town(&name)?;
    Some(DungeonTarget {
        token_cost: town.dungeon_cost?,
        town_region: town.region,
        town: name,
    })
}

/// Variant-specific reachability predicate.
pub fn is_reachable<W: WorldContext + ?Sized>(world: &W, goal: &GoalRecord) -> bool {
    match &goal.variant {
        GoalVariant::RouteKill { route, region } => world.can_move_to_route(*route, *region),
        GoalVariant::ClearGym { gym_index } => {
            let Some(target) = resolve_gym(world, *gym_index) else {
                debug!(goal = %goal.id, gym_index, "gym location unresolved, skipping");
                return false;
            };
            world.can_move_to_region(target.town_region)
                && world.has_town_access(&target.town)
                && world.gym(&target.gym).is_some_and(|gym| gym.unlocked)
        }
        GoalVariant::ClearDungeon { dungeon_index } => {
            let Some(target) = resolve_dungeon(world, *dungeon_index) else {
                debug!(goal = %goal.id, dungeon_index, "dungeon location unresolved, skipping");
                return false;
            };
            world.can_move_to_region(target.town_region) && world.has_town_access(&target.town)
        }
    }
}

/// Full eligibility predicate for one record.
pub fn is_eligible<W: Catalog + WorldContext + ?Sized>(world: &W, goal: &GoalRecord) -> bool {
    if world.is_completed(goal) || !world.is_achievable(goal) {
        return false;
    }
    if goal.region > world.highest_region() {
        return false;
    }
    is_reachable(world, goal)
}

/// Eligible subset of the catalog, preserving catalog order.
pub fn filter_eligible<W: Catalog + WorldContext + ?Sized>(world: &W) -> Vec<GoalRecord> {
    world
        .goals()
        .into_iter()
        .filter(|goal| is_eligible(world, goal))
        .collect()
}

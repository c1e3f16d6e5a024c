//! Shared deterministic types for goal selection and pursuit.
//!
//! A [`GoalRecord`] is an immutable snapshot taken from the external catalog.
//! Its completion and achievability are never stored here: they are live
//! predicates answered by the world (see [`crate::core::world::Catalog`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::region::RegionRank;

/// Opaque catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub String);

impl GoalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One goal as exposed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub id: GoalId,
    /// Category key used to resolve the logical region rank.
    pub category: String,
    /// Nominal region of the goal, used by the unlocked-region gate.
    pub region: RegionRank,
    /// Secondary sort key (lower values are pursued first).
    pub required_value: u64,
    pub variant: GoalVariant,
}

impl GoalRecord {
    pub fn class(&self) -> VariantClass {
        self.variant.class()
    }
}

/// Variant-specific payload of a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalVariant {
    /// Defeat encounters on a route.
    RouteKill { route: u32, region: RegionRank },
    /// Clear a gym, addressed by its index in the flattened gym list.
    ClearGym { gym_index: usize },
    /// Clear a dungeon, addressed by its index in the flattened dungeon list.
    ClearDungeon { dungeon_index: usize },
}

impl GoalVariant {
    pub fn class(&self) -> VariantClass {
        match self {
            GoalVariant::RouteKill { .. } => VariantClass::RouteKill,
            GoalVariant::ClearGym { .. } => VariantClass::ClearGym,
            GoalVariant::ClearDungeon { .. } => VariantClass::ClearDungeon,
        }
    }
}

/// Variant tiebreak priority. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantClass {
    RouteKill,
    ClearGym,
    ClearDungeon,
}

impl fmt::Display for VariantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariantClass::RouteKill => "route_kill",
            VariantClass::ClearGym => "clear_gym",
            VariantClass::ClearDungeon => "clear_dungeon",
        };
        f.write_str(name)
    }
}

/// Toggleable automation features owned by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubFeature {
    /// The goal-pursuit feature itself.
    Focus,
    /// Automatic gym fights.
    Gym,
    /// Automatic dungeon runs.
    Dungeon,
}

/// Equipment loadouts the executor can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loadout {
    /// Favors experience gain while defeating route encounters.
    Experience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    DungeonToken,
}

/// Internal run modes of the dungeon sub-feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DungeonMode {
    /// Finish the whole run, ignoring user stop conditions.
    ForceCompletion,
}

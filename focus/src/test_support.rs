//! Test-only helpers for constructing goals and scenarios.

use std::collections::BTreeMap;

use crate::core::region::RegionRank;
use crate::core::types::{GoalId, GoalRecord, GoalVariant};
use crate::io::scenario::{
    GymSpec, PlayerSpec, ProgressSpec, RouteRef, RouteSpec, Scenario, SimRates, TownSpec,
};

fn goal(
    id: &str,
    category: &str,
    region: RegionRank,
    required: u64,
    variant: GoalVariant,
) -> GoalRecord {
    GoalRecord {
        id: GoalId::new(id),
        category: category.to_string(),
        region,
        required_value: required,
        variant,
    }
}

/// Route kill goal on `route` of `region`.
pub fn route_kill(
    id: &str,
    category: &str,
    region: RegionRank,
    route: u32,
    required: u64,
) -> GoalRecord {
    goal(
        id,
        category,
        region,
        required,
        GoalVariant::RouteKill { route, region },
    )
}

/// Gym clear goal addressing `gym_order[gym_index]`.
pub fn clear_gym(
    id: &str,
    category: &str,
    region: RegionRank,
    gym_index: usize,
    required: u64,
) -> GoalRecord {
    goal(
        id,
        category,
        region,
        required,
        GoalVariant::ClearGym { gym_index },
    )
}

/// Dungeon clear goal addressing `dungeon_order[dungeon_index]`.
pub fn clear_dungeon(
    id: &str,
    category: &str,
    region: RegionRank,
    dungeon_index: usize,
    required: u64,
) -> GoalRecord {
    goal(
        id,
        category,
        region,
        required,
        GoalVariant::ClearDungeon { dungeon_index },
    )
}

fn route(region: RegionRank, route: u32, accessible: bool) -> RouteSpec {
    RouteSpec {
        region,
        route,
        accessible,
    }
}

fn town(name: &str, accessible: bool, dungeon_cost: Option<u64>) -> TownSpec {
    TownSpec {
        name: name.to_string(),
        region: 0,
        accessible,
        dungeon_cost,
    }
}

fn gym(name: &str, parent_town: Option<&str>, unlocked: bool) -> GymSpec {
    GymSpec {
        name: name.to_string(),
        parent_town: parent_town.map(str::to_string),
        unlocked,
    }
}

/// A small first-region world with an empty catalog.
///
/// Gym indices: 0 "Pewter City", 1 "Cerulean City" (locked), 2 "Champion Blue"
/// (governed by "Indigo Plateau"), 3 "Ghost Gym" (no town).
/// Dungeon indices: 0 "Viridian Forest" (cost 50), 1 "Mt. Moon" (cost 75, no access).
/// Route 3 is not yet reachable; route 29 belongs to region 1.
pub fn starter_scenario() -> Scenario {
    Scenario {
        highest_region: 0,
        routes: vec![
            route(0, 1, true),
            route(0, 2, true),
            route(0, 3, false),
            route(1, 29, true),
        ],
        towns: vec![
            town("Pallet Town", true, None),
            town("Pewter City", true, None),
            town("Cerulean City", true, None),
            town("Indigo Plateau", true, None),
            town("Viridian Forest", true, Some(50)),
            town("Mt. Moon", false, Some(75)),
        ],
        gyms: vec![
            gym("Pewter City", None, true),
            gym("Cerulean City", None, false),
            gym("Champion Blue", Some("Indigo Plateau"), true),
            gym("Ghost Gym", None, true),
        ],
        gym_order: vec![
            "Pewter City".to_string(),
            "Cerulean City".to_string(),
            "Champion Blue".to_string(),
            "Ghost Gym".to_string(),
        ],
        dungeon_order: vec!["Viridian Forest".to_string(), "Mt. Moon".to_string()],
        player: PlayerSpec {
            town: Some("Pallet Town".to_string()),
            route: None,
            dungeon_tokens: 0,
            tracker_unlocked: true,
            catch_filter: true,
        },
        goals: Vec::new(),
        progress: ProgressSpec {
            route_kills: Vec::new(),
            gym_clears: BTreeMap::new(),
            dungeon_clears: BTreeMap::new(),
        },
        rates: SimRates::default(),
        token_route: Some(RouteRef {
            region: 0,
            route: 2,
        }),
    }
}

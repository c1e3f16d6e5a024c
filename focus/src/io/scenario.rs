//! Scenario files: a JSON world snapshot used to drive [`SimWorld`].
//!
//! Scenarios are validated in two passes: JSON Schema conformance
//! (`schemas/scenario/v1.schema.json`), then semantic checks that the schema
//! cannot express (unique names, catalog invariants).
//!
//! [`SimWorld`]: crate::io::sim::SimWorld

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::invariants::validate_catalog;
use crate::core::region::RegionRank;
use crate::core::types::GoalRecord;

pub const SCENARIO_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/scenario/v1.schema.json"
));

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Highest region the player has unlocked.
    pub highest_region: RegionRank,
    pub routes: Vec<RouteSpec>,
    pub towns: Vec<TownSpec>,
    pub gyms: Vec<GymSpec>,
    /// Flattened per-region gym keys; goal `gym_index` values point here.
    pub gym_order: Vec<String>,
    /// Flattened per-region dungeon keys; goal `dungeon_index` values point here.
    pub dungeon_order: Vec<String>,
    #[serde(default)]
    pub player: PlayerSpec,
    pub goals: Vec<GoalSpec>,
    #[serde(default)]
    pub progress: ProgressSpec,
    #[serde(default)]
    pub rates: SimRates,
    /// Route the token-farming resolver sends the player to.
    #[serde(default)]
    pub token_route: Option<RouteRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteRef {
    pub region: RegionRank,
    pub route: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub region: RegionRank,
    pub route: u32,
    #[serde(default = "yes")]
    pub accessible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownSpec {
    pub name: String,
    pub region: RegionRank,
    #[serde(default = "yes")]
    pub accessible: bool,
    #[serde(default)]
    pub dungeon_cost: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymSpec {
    pub name: String,
    #[serde(default)]
    pub parent_town: Option<String>,
    #[serde(default = "yes")]
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSpec {
    pub town: Option<String>,
    pub route: Option<RouteRef>,
    pub dungeon_tokens: u64,
    pub tracker_unlocked: bool,
    pub catch_filter: bool,
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            town: None,
            route: None,
            dungeon_tokens: 0,
            tracker_unlocked: false,
            catch_filter: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSpec {
    #[serde(flatten)]
    pub record: GoalRecord,
    #[serde(default = "yes")]
    pub achievable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSpec {
    pub route_kills: Vec<RouteKills>,
    pub gym_clears: BTreeMap<String, u64>,
    pub dungeon_clears: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteKills {
    pub region: RegionRank,
    pub route: u32,
    pub count: u64,
}

/// Deterministic progression rates of the simulated world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimRates {
    pub kills_per_tick: u64,
    pub tokens_per_route_tick: u64,
    /// Length of one gym fight, in ticks.
    pub gym_ticks: u32,
    /// Length of one dungeon run, in ticks.
    pub dungeon_ticks: u32,
}

impl Default for SimRates {
    fn default() -> Self {
        Self {
            kills_per_tick: 1,
            tokens_per_route_tick: 5,
            gym_ticks: 2,
            dungeon_ticks: 3,
        }
    }
}

impl Scenario {
    pub fn records(&self) -> Vec<GoalRecord> {
        self.goals.iter().map(|goal| goal.record.clone()).collect()
    }

    /// Replace the catalog with achievable goals.
    pub fn set_goals(&mut self, goals: Vec<GoalRecord>) {
        self.goals = goals
            .into_iter()
            .map(|record| GoalSpec {
                record,
                achievable: true,
            })
            .collect();
    }

    pub fn mark_unachievable(&mut self, id: &str) {
        for goal in &mut self.goals {
            if goal.record.id.as_str() == id {
                goal.achievable = false;
            }
        }
    }

    pub fn set_route_kills(&mut self, region: RegionRank, route: u32, count: u64) {
        self.progress
            .route_kills
            .retain(|kills| (kills.region, kills.route) != (region, route));
        self.progress.route_kills.push(RouteKills {
            region,
            route,
            count,
        });
    }

    /// Semantic checks not expressible in JSON Schema.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = validate_catalog(&self.records());

        let mut towns = HashSet::new();
        for town in &self.towns {
            if !towns.insert(town.name.as_str()) {
                errors.push(format!("duplicate town '{}'", town.name));
            }
        }
        let mut gyms = HashSet::new();
        for gym in &self.gyms {
            if !gyms.insert(gym.name.as_str()) {
                errors.push(format!("duplicate gym '{}'", gym.name));
            }
        }
        let mut routes = HashSet::new();
        for route in &self.routes {
            if !routes.insert((route.region, route.route)) {
                errors.push(format!(
                    "duplicate route {} in region {}",
                    route.route, route.region
                ));
            }
        }
        if let Some(town) = &self.player.town {
            if !towns.contains(town.as_str()) {
                errors.push(format!("player town '{town}' is not a known town"));
            }
        }
        if self.player.town.is_some() && self.player.route.is_some() {
            errors.push("player cannot be in a town and on a route at once".to_string());
        }
        for (label, route) in [
            ("player route", self.player.route),
            ("token_route", self.token_route),
        ] {
            if let Some(route) = route {
                if !routes.contains(&(route.region, route.route)) {
                    errors.push(format!(
                        "{label} {} in region {} is not a known route",
                        route.route, route.region
                    ));
                }
            }
        }
        errors
    }
}

/// Parse and validate scenario JSON: schema conformance + semantic checks.
pub fn parse_scenario(contents: &str) -> Result<Scenario> {
    let value: Value = serde_json::from_str(contents).context("parse scenario json")?;
    validate_schema(&value)?;
    let scenario: Scenario =
        serde_json::from_value(value).context("deserialize scenario as v1 struct")?;
    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(anyhow!(
            "scenario invariants failed:\n- {}",
            errors.join("\n- ")
        ));
    }
    Ok(scenario)
}

/// Load and validate a scenario from disk.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read scenario {}", path.display()))?;
    parse_scenario(&contents).with_context(|| format!("load scenario {}", path.display()))
}

fn validate_schema(instance: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(SCENARIO_SCHEMA).context("parse scenario schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        return Err(anyhow!(
            "scenario schema validation failed:\n- {}",
            messages.join("\n- ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GoalVariant;
    use crate::test_support::starter_scenario;

    #[test]
    fn starter_scenario_passes_schema_and_invariants() {
        let json = serde_json::to_string_pretty(&starter_scenario()).expect("serialize");
        let parsed = parse_scenario(&json).expect("parse");
        assert_eq!(parsed, starter_scenario());
    }

    #[test]
    fn goal_fields_are_flattened() {
        let json = r#"{
            "highest_region": 0,
            "routes": [{"region": 0, "route": 1}],
            "towns": [],
            "gyms": [],
            "gym_order": [],
            "dungeon_order": [],
            "goals": [{
                "id": "route-1-kills",
                "category": "kanto",
                "region": 0,
                "required_value": 10,
                "variant": {"kind": "route_kill", "route": 1, "region": 0}
            }]
        }"#;
        let scenario = parse_scenario(json).expect("parse");
        let goal = &scenario.goals[0];
        assert!(goal.achievable);
        assert_eq!(
            goal.record.variant,
            GoalVariant::RouteKill {
                route: 1,
                region: 0
            }
        );
        assert_eq!(scenario.rates, SimRates::default());
    }

    #[test]
    fn schema_rejects_unknown_variant_kind() {
        let json = r#"{
            "highest_region": 0,
            "routes": [],
            "towns": [],
            "gyms": [],
            "gym_order": [],
            "dungeon_order": [],
            "goals": [{
                "id": "x",
                "category": "kanto",
                "region": 0,
                "required_value": 1,
                "variant": {"kind": "catch_shiny"}
            }]
        }"#;
        let err = parse_scenario(json).unwrap_err();
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn invariants_reject_duplicate_towns_and_unknown_player_town() {
        let mut scenario = starter_scenario();
        let duplicate = scenario.towns[0].clone();
        scenario.towns.push(duplicate);
        scenario.player.town = Some("Atlantis".to_string());
        let errors = scenario.validate();
        assert!(errors.iter().any(|err| err.contains("duplicate town")));
        assert!(errors.iter().any(|err| err.contains("Atlantis")));
    }

    #[test]
    fn load_reports_path_on_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("broken.json");
        fs::write(&path, "{").expect("write");
        let err = load_scenario(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}

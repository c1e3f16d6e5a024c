//! In-memory world driven by a [`Scenario`].
//!
//! `SimWorld` answers every read trait, applies issued commands, and keeps a
//! journal of them. [`SimWorld::advance`] moves the world forward by one tick
//! after the scheduler has acted: route encounters are defeated, gym fights
//! and dungeon runs occupy the action channel for several ticks, and dungeon
//! tokens are earned on routes. Everything is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::core::command::{Command, CommandSink};
use crate::core::region::RegionRank;
use crate::core::types::{
    Currency, DungeonMode, GoalId, GoalRecord, GoalVariant, Loadout, SubFeature,
};
use crate::core::world::{Catalog, GymInfo, TownInfo, WorldContext};
use crate::io::scenario::{GymSpec, RouteRef, Scenario, TownSpec};

/// Where the player currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Nowhere,
    Town(String),
    Route(RouteRef),
}

/// A multi-tick activity owning the action channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    GymFight { gym: String },
    DungeonRun { dungeon: String },
}

impl Activity {
    fn owner(&self) -> SubFeature {
        match self {
            Activity::GymFight { .. } => SubFeature::Gym,
            Activity::DungeonRun { .. } => SubFeature::Dungeon,
        }
    }
}

#[derive(Debug, Clone)]
struct Running {
    activity: Activity,
    remaining: u32,
}

#[derive(Debug, Clone)]
pub struct SimWorld {
    scenario: Scenario,
    towns: BTreeMap<String, TownSpec>,
    gyms: BTreeMap<String, GymSpec>,
    routes: BTreeMap<RouteRef, bool>,
    achievable: BTreeMap<GoalId, bool>,

    location: Location,
    tokens: u64,
    loadout: Option<Loadout>,
    enabled: BTreeSet<SubFeature>,
    gym_target: Option<String>,
    dungeon_mode: Option<DungeonMode>,
    stop_requested: bool,
    catch_filter: bool,
    running: Option<Running>,
    tracked: Option<GoalId>,

    kills: BTreeMap<RouteRef, u64>,
    gym_clears: BTreeMap<String, u64>,
    dungeon_clears: BTreeMap<String, u64>,

    warnings: Vec<String>,
    journal: Vec<Command>,
}

impl SimWorld {
    pub fn new(scenario: Scenario) -> Self {
        let towns = scenario
            .towns
            .iter()
            .map(|town| (town.name.clone(), town.clone()))
            .collect();
        let gyms = scenario
            .gyms
            .iter()
            .map(|gym| (gym.name.clone(), gym.clone()))
            .collect();
        let routes = scenario
            .routes
            .iter()
            .map(|route| {
                let key = RouteRef {
                    region: route.region,
                    route: route.route,
                };
                (key, route.accessible)
            })
            .collect();
        let achievable = scenario
            .goals
            .iter()
            .map(|goal| (goal.record.id.clone(), goal.achievable))
            .collect();
        let kills = scenario
            .progress
            .route_kills
            .iter()
            .map(|kills| {
                let key = RouteRef {
                    region: kills.region,
                    route: kills.route,
                };
                (key, kills.count)
            })
            .collect();
        let location = match (&scenario.player.town, scenario.player.route) {
            (Some(town), _) => Location::Town(town.clone()),
            (None, Some(route)) => Location::Route(route),
            (None, None) => Location::Nowhere,
        };

        Self {
            towns,
            gyms,
            routes,
            achievable,
            location,
            tokens: scenario.player.dungeon_tokens,
            loadout: None,
            enabled: BTreeSet::new(),
            gym_target: None,
            dungeon_mode: None,
            stop_requested: false,
            catch_filter: scenario.player.catch_filter,
            running: None,
            tracked: None,
            kills,
            gym_clears: scenario.progress.gym_clears.clone(),
            dungeon_clears: scenario.progress.dungeon_clears.clone(),
            warnings: Vec::new(),
            journal: Vec::new(),
            scenario,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    pub fn set_tokens(&mut self, tokens: u64) {
        self.tokens = tokens;
    }

    pub fn tracked(&self) -> Option<&GoalId> {
        self.tracked.as_ref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn activity(&self) -> Option<&Activity> {
        self.running.as_ref().map(|running| &running.activity)
    }

    /// Every command issued so far, in order.
    pub fn issued(&self) -> &[Command] {
        &self.journal
    }

    /// Take the commands issued since the last drain.
    pub fn drain_issued(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.journal)
    }

    /// Occupy the action channel with `activity` for `ticks` ticks.
    pub fn begin_activity(&mut self, activity: Activity, ticks: u32) {
        self.running = Some(Running {
            activity,
            remaining: ticks.max(1),
        });
    }

    pub fn completed_goals(&self) -> usize {
        self.scenario
            .goals
            .iter()
            .filter(|goal| self.is_completed(&goal.record))
            .count()
    }

    /// Move the world forward by one tick.
    pub fn advance(&mut self) {
        if let Some(running) = &mut self.running {
            running.remaining = running.remaining.saturating_sub(1);
            if running.remaining == 0 {
                self.finish_activity();
            }
            return;
        }

        match self.location.clone() {
            Location::Route(route) => {
                *self.kills.entry(route).or_default() += self.scenario.rates.kills_per_tick;
                self.tokens += self.scenario.rates.tokens_per_route_tick;
            }
            Location::Town(town) => self.start_town_activity(&town),
            Location::Nowhere => {}
        }
    }

    fn start_town_activity(&mut self, town: &str) {
        // The gym sub-feature only fights in the town governing its target.
        if self.enabled.contains(&SubFeature::Gym) {
            if let Some(gym) = self.gym_target.clone() {
                let unlocked = self.gyms.get(&gym).is_some_and(|spec| spec.unlocked);
                if unlocked && self.gym_town(&gym).as_deref() == Some(town) {
                    debug!(gym = %gym, "gym fight started");
                    let ticks = self.scenario.rates.gym_ticks;
                    self.begin_activity(Activity::GymFight { gym }, ticks);
                    return;
                }
            }
        }
        if self.enabled.contains(&SubFeature::Dungeon) {
            let Some(cost) = self.towns.get(town).and_then(|spec| spec.dungeon_cost) else {
                return;
            };
            if self.tokens >= cost {
                self.tokens -= cost;
                debug!(dungeon = %town, cost, "dungeon run started");
                let ticks = self.scenario.rates.dungeon_ticks;
                self.begin_activity(
                    Activity::DungeonRun {
                        dungeon: town.to_string(),
                    },
                    ticks,
                );
            }
        }
    }

    fn finish_activity(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        match &running.activity {
            Activity::GymFight { gym } => *self.gym_clears.entry(gym.clone()).or_default() += 1,
            Activity::DungeonRun { dungeon } => {
                *self.dungeon_clears.entry(dungeon.clone()).or_default() += 1;
            }
        }
        debug!(activity = ?running.activity, "activity finished");
        if self.stop_requested {
            self.stop_requested = false;
            self.disable(running.activity.owner());
        }
    }

    fn disable(&mut self, feature: SubFeature) {
        self.enabled.remove(&feature);
        if feature == SubFeature::Dungeon {
            self.dungeon_mode = None;
        }
    }

    fn gym_town(&self, gym: &str) -> Option<String> {
        if self.towns.contains_key(gym) {
            return Some(gym.to_string());
        }
        self.gyms.get(gym)?.parent_town.clone()
    }

    fn best_token_route(&self) -> Option<RouteRef> {
        if let Some(route) = self.scenario.token_route {
            return Some(route);
        }
        self.routes
            .iter()
            .filter(|(route, accessible)| {
                **accessible && route.region <= self.scenario.highest_region
            })
            .map(|(route, _)| *route)
            .max()
    }

    fn move_to(&mut self, location: Location) {
        if self.running.is_some() {
            trace!(?location, "ignoring move while busy");
            return;
        }
        self.location = location;
    }
}

impl Catalog for SimWorld {
    fn goals(&self) -> Vec<GoalRecord> {
        self.scenario.records()
    }

    fn is_completed(&self, goal: &GoalRecord) -> bool {
        let progress = match &goal.variant {
            GoalVariant::RouteKill { route, region } => self
                .kills
                .get(&RouteRef {
                    region: *region,
                    route: *route,
                })
                .copied(),
            GoalVariant::ClearGym { gym_index } => self
                .scenario
                .gym_order
                .get(*gym_index)
                .and_then(|gym| self.gym_clears.get(gym))
                .copied(),
            GoalVariant::ClearDungeon { dungeon_index } => self
                .scenario
                .dungeon_order
                .get(*dungeon_index)
                .and_then(|dungeon| self.dungeon_clears.get(dungeon))
                .copied(),
        };
        progress.unwrap_or(0) >= goal.required_value
    }

    fn is_achievable(&self, goal: &GoalRecord) -> bool {
        self.achievable.get(&goal.id).copied().unwrap_or(false)
    }
}

impl WorldContext for SimWorld {
    fn highest_region(&self) -> RegionRank {
        self.scenario.highest_region
    }

    fn can_move_to_region(&self, region: RegionRank) -> bool {
        region <= self.scenario.highest_region
    }

    fn can_move_to_route(&self, route: u32, region: RegionRank) -> bool {
        self.can_move_to_region(region)
            && self.routes.get(&RouteRef { region, route }) == Some(&true)
    }

    fn has_town_access(&self, town: &str) -> bool {
        self.towns
            .get(town)
            .is_some_and(|spec| spec.accessible && self.can_move_to_region(spec.region))
    }

    fn town(&self, name: &str) -> Option<TownInfo> {
        self.towns.get(name).map(|spec| TownInfo {
            region: spec.region,
            dungeon_cost: spec.dungeon_cost,
        })
    }

    fn gym(&self, name: &str) -> Option<GymInfo> {
        self.gyms.get(name).map(|spec| GymInfo {
            parent_town: spec.parent_town.clone(),
            unlocked: spec.unlocked,
        })
    }

    fn gym_name(&self, index: usize) -> Option<String> {
        self.scenario.gym_order.get(index).cloned()
    }

    fn dungeon_name(&self, index: usize) -> Option<String> {
        self.scenario.dungeon_order.get(index).cloned()
    }

    fn balance(&self, currency: Currency) -> u64 {
        match currency {
            Currency::DungeonToken => self.tokens,
        }
    }

    fn is_player_in_town(&self, town: &str) -> bool {
        matches!(&self.location, Location::Town(current) if current == town)
    }

    fn is_player_on_route(&self, route: u32, region: RegionRank) -> bool {
        self.location == Location::Route(RouteRef { region, route })
    }

    fn active_loadout(&self) -> Option<Loadout> {
        self.loadout
    }

    fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    fn is_enabled(&self, feature: SubFeature) -> bool {
        self.enabled.contains(&feature)
    }

    fn active_target(&self, feature: SubFeature) -> Option<String> {
        match feature {
            SubFeature::Gym => self.gym_target.clone(),
            SubFeature::Focus | SubFeature::Dungeon => None,
        }
    }

    fn dungeon_mode(&self) -> Option<DungeonMode> {
        self.dungeon_mode
    }

    fn is_catch_filter_enabled(&self) -> bool {
        self.catch_filter
    }

    fn can_track(&self) -> bool {
        self.scenario.player.tracker_unlocked
    }
}

impl CommandSink for SimWorld {
    fn issue(&mut self, command: Command) {
        trace!(?command, "command issued");
        match &command {
            Command::EquipLoadout { loadout } => self.loadout = Some(*loadout),
            Command::MoveToRoute { route, region } => {
                if self.can_move_to_route(*route, *region) {
                    self.move_to(Location::Route(RouteRef {
                        region: *region,
                        route: *route,
                    }));
                }
            }
            Command::MoveToTown { town } => {
                if self.has_town_access(town) {
                    self.move_to(Location::Town(town.clone()));
                }
            }
            Command::SetEnabled { feature, enabled } => {
                if *enabled {
                    self.enabled.insert(*feature);
                } else {
                    self.disable(*feature);
                }
            }
            Command::SetActiveTarget { feature, value } => {
                if *feature == SubFeature::Gym {
                    self.gym_target = Some(value.clone());
                }
            }
            Command::FarmBestTokenRoute => {
                if let Some(route) = self.best_token_route() {
                    self.move_to(Location::Route(route));
                }
            }
            Command::StopAfterCurrentRun => {
                if self.running.is_some() {
                    self.stop_requested = true;
                } else {
                    self.disable(SubFeature::Dungeon);
                }
            }
            Command::SetForceCompletion { mode, .. } => self.dungeon_mode = Some(*mode),
            Command::SetCatchFilter { enabled } => self.catch_filter = *enabled,
            Command::TrackGoal { goal } => self.tracked = Some(goal.clone()),
            Command::Warn { source, message } => {
                self.warnings.push(format!("[{source}] {message}"));
            }
        }
        self.journal.push(command);
    }
}

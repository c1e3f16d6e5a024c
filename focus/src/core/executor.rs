//! One step of work toward the current goal.
//!
//! [`advance`] reads the world and issues the commands needed to move one
//! step closer to the goal, returning a [`Advance`] describing what it did.
//! It is called only while the world is idle, and issues nothing for goals
//! whose location can no longer be resolved.

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::command::Command;
use crate::core::eligibility::{resolve_dungeon, resolve_gym};
use crate::core::region::RegionRank;
use crate::core::types::{Currency, DungeonMode, GoalRecord, GoalVariant, Loadout, SubFeature};
use crate::core::world::Host;

/// Diagnostic summary of one executor step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Advance {
    /// On (or heading to) the goal's route with the experience loadout.
    HeadingToRoute { route: u32, region: RegionRank },
    /// Travelling to the town that hosts the gym or dungeon.
    MovingToTown { town: String },
    /// Turned the gym sub-feature on; the target follows next tick.
    EnablingGym,
    /// Gym sub-feature is on and aimed at the goal's gym.
    TargetingGym { gym: String },
    /// Not enough tokens for the dungeon entry: farming instead.
    FarmingTokens { cost: u64, balance: u64 },
    /// In the dungeon town with the dungeon sub-feature configured.
    EnteringDungeon { town: String },
    /// Gym or dungeon location vanished since selection.
    Unresolved,
}

/// Issue the commands for one step toward `goal`.
pub fn advance<H: Host + ?Sized>(goal: &GoalRecord, host: &mut H) -> Advance {
    if host.is_catch_filter_enabled() {
        host.issue(Command::SetCatchFilter { enabled: false });
    }

    let step = match &goal.variant {
        GoalVariant::RouteKill { route, region } => {
            release_dungeon(host);
            work_route(host, *route, *region)
        }
        GoalVariant::ClearGym { gym_index } => {
            release_dungeon(host);
            work_gym(host, goal, *gym_index)
        }
        GoalVariant::ClearDungeon { dungeon_index } => work_dungeon(host, goal, *dungeon_index),
    };
    debug!(goal = %goal.id, ?step, "executor step");
    step
}

/// The dungeon sub-feature must not keep running while another goal is pursued.
fn release_dungeon<H: Host + ?Sized>(host: &mut H) {
    if host.is_enabled(SubFeature::Dungeon) {
        host.issue(Command::StopAfterCurrentRun);
    }
}

fn work_route<H: Host + ?Sized>(host: &mut H, route: u32, region: RegionRank) -> Advance {
    if host.active_loadout() != Some(Loadout::Experience) {
        host.issue(Command::EquipLoadout {
            loadout: Loadout::Experience,
        });
    }
    if !host.is_player_on_route(route, region) {
        host.issue(Command::MoveToRoute { route, region });
    }
    Advance::HeadingToRoute { route, region }
}

fn work_gym<H: Host + ?Sized>(host: &mut H, goal: &GoalRecord, gym_index: usize) -> Advance {
    let Some(target) = resolve_gym(&*host, gym_index) else {
        warn!(goal = %goal.id, gym_index, "gym location unresolved");
        return Advance::Unresolved;
    };

    if !host.is_player_in_town(&target.town) {
        host.issue(Command::MoveToTown {
            town: target.town.clone(),
        });
        return Advance::MovingToTown { town: target.town };
    }
    if !host.is_enabled(SubFeature::Gym) {
        host.issue(Command::SetEnabled {
            feature: SubFeature::Gym,
            enabled: true,
        });
        return Advance::EnablingGym;
    }
    if host.active_target(SubFeature::Gym).as_deref() != Some(target.gym.as_str()) {
        host.issue(Command::SetActiveTarget {
            feature: SubFeature::Gym,
            value: target.gym.clone(),
        });
    }
    Advance::TargetingGym { gym: target.gym }
}

fn work_dungeon<H: Host + ?Sized>(
    host: &mut H,
    goal: &GoalRecord,
    dungeon_index: usize,
) -> Advance {
    let Some(target) = resolve_dungeon(&*host, dungeon_index) else {
        warn!(goal = %goal.id, dungeon_index, "dungeon location unresolved");
        return Advance::Unresolved;
    };

    let balance = host.balance(Currency::DungeonToken);
    if target.token_cost > balance {
        host.issue(Command::FarmBestTokenRoute);
        return Advance::FarmingTokens {
            cost: target.token_cost,
            balance,
        };
    }
    if !host.is_player_in_town(&target.town) {
        host.issue(Command::MoveToTown {
            town: target.town.clone(),
        });
        return Advance::MovingToTown { town: target.town };
    }
    if !host.is_enabled(SubFeature::Dungeon) {
        host.issue(Command::SetEnabled {
            feature: SubFeature::Dungeon,
            enabled: true,
        });
    }
    if host.dungeon_mode() != Some(DungeonMode::ForceCompletion) {
        host.issue(Command::SetForceCompletion {
            feature: SubFeature::Dungeon,
            mode: DungeonMode::ForceCompletion,
        });
    }
    Advance::EnteringDungeon { town: target.town }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::CommandSink;
    use crate::io::sim::SimWorld;
    use crate::test_support::{clear_dungeon, clear_gym, route_kill, starter_scenario};

    fn idle_world() -> SimWorld {
        let mut world = SimWorld::new(starter_scenario());
        world.issue(Command::SetCatchFilter { enabled: false });
        world.drain_issued();
        world
    }

    #[test]
    fn route_kill_equips_loadout_then_moves() {
        let mut world = idle_world();
        let goal = route_kill("kill", "kanto", 0, 1, 10);

        let step = advance(&goal, &mut world);
        assert_eq!(
            step,
            Advance::HeadingToRoute {
                route: 1,
                region: 0
            }
        );
        assert_eq!(
            world.drain_issued(),
            vec![
                Command::EquipLoadout {
                    loadout: Loadout::Experience
                },
                Command::MoveToRoute {
                    route: 1,
                    region: 0
                },
            ]
        );

        // Already equipped and in place: nothing more to do.
        advance(&goal, &mut world);
        assert!(world.drain_issued().is_empty());
    }

    #[test]
    fn catch_filter_is_lifted_first() {
        let mut world = SimWorld::new(starter_scenario());
        advance(&route_kill("kill", "kanto", 0, 1, 10), &mut world);
        let issued = world.drain_issued();
        assert_eq!(issued[0], Command::SetCatchFilter { enabled: false });
    }

    #[test]
    fn route_kill_releases_running_dungeon_feature() {
        let mut world = idle_world();
        world.issue(Command::SetEnabled {
            feature: SubFeature::Dungeon,
            enabled: true,
        });
        world.drain_issued();

        advance(&route_kill("kill", "kanto", 0, 1, 10), &mut world);
        assert_eq!(world.drain_issued()[0], Command::StopAfterCurrentRun);
    }

    #[test]
    fn gym_goal_moves_then_enables_then_targets() {
        let mut world = idle_world();
        let goal = clear_gym("gym", "kanto", 0, 0, 1);

        assert_eq!(
            advance(&goal, &mut world),
            Advance::MovingToTown {
                town: "Pewter City".to_string()
            }
        );
        assert_eq!(advance(&goal, &mut world), Advance::EnablingGym);
        assert_eq!(
            advance(&goal, &mut world),
            Advance::TargetingGym {
                gym: "Pewter City".to_string()
            }
        );
        assert_eq!(
            world.drain_issued(),
            vec![
                Command::MoveToTown {
                    town: "Pewter City".to_string()
                },
                Command::SetEnabled {
                    feature: SubFeature::Gym,
                    enabled: true
                },
                Command::SetActiveTarget {
                    feature: SubFeature::Gym,
                    value: "Pewter City".to_string()
                },
            ]
        );
    }

    #[test]
    fn gym_target_is_not_rewritten_when_already_set() {
        let mut world = idle_world();
        let goal = clear_gym("gym", "kanto", 0, 0, 1);
        for _ in 0..3 {
            advance(&goal, &mut world);
        }
        world.drain_issued();

        assert_eq!(
            advance(&goal, &mut world),
            Advance::TargetingGym {
                gym: "Pewter City".to_string()
            }
        );
        assert!(world.drain_issued().is_empty());
    }

    #[test]
    fn champion_gym_is_fought_from_parent_town() {
        let mut world = idle_world();
        let goal = clear_gym("champion", "kanto", 0, 2, 1);
        assert_eq!(
            advance(&goal, &mut world),
            Advance::MovingToTown {
                town: "Indigo Plateau".to_string()
            }
        );
    }

    #[test]
    fn dungeon_without_tokens_farms_instead_of_moving() {
        let mut world = idle_world();
        let goal = clear_dungeon("dungeon", "kanto", 0, 0, 1);

        let step = advance(&goal, &mut world);
        assert_eq!(
            step,
            Advance::FarmingTokens {
                cost: 50,
                balance: 0
            }
        );
        let issued = world.drain_issued();
        assert_eq!(issued, vec![Command::FarmBestTokenRoute]);
        assert!(
            !issued
                .iter()
                .any(|command| matches!(command, Command::MoveToTown { .. }))
        );
    }

    #[test]
    fn dungeon_with_tokens_enters_with_force_completion() {
        let mut world = idle_world();
        world.set_tokens(50);
        let goal = clear_dungeon("dungeon", "kanto", 0, 0, 1);

        advance(&goal, &mut world);
        let step = advance(&goal, &mut world);
        assert_eq!(
            step,
            Advance::EnteringDungeon {
                town: "Viridian Forest".to_string()
            }
        );
        assert_eq!(
            world.drain_issued(),
            vec![
                Command::MoveToTown {
                    town: "Viridian Forest".to_string()
                },
                Command::SetEnabled {
                    feature: SubFeature::Dungeon,
                    enabled: true
                },
                Command::SetForceCompletion {
                    feature: SubFeature::Dungeon,
                    mode: DungeonMode::ForceCompletion
                },
            ]
        );
    }

    #[test]
    fn configured_dungeon_is_entered_without_rewrites() {
        let mut world = idle_world();
        world.set_tokens(50);
        let goal = clear_dungeon("dungeon", "kanto", 0, 0, 1);
        advance(&goal, &mut world);
        advance(&goal, &mut world);
        world.drain_issued();

        assert_eq!(
            advance(&goal, &mut world),
            Advance::EnteringDungeon {
                town: "Viridian Forest".to_string()
            }
        );
        // Sub-feature already on and in force-completion mode.
        assert!(world.drain_issued().is_empty());
    }

    #[test]
    fn unresolved_location_issues_nothing() {
        let mut world = idle_world();
        let step = advance(&clear_gym("ghost", "kanto", 0, 3, 1), &mut world);
        assert_eq!(step, Advance::Unresolved);
        assert!(world.drain_issued().is_empty());
    }
}

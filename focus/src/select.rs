//! Selection helpers for `focus select`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::region::RegionOrdering;
use crate::core::selector::next_goal;
use crate::core::types::{GoalId, VariantClass};
use crate::io::scenario::{Scenario, load_scenario};
use crate::io::sim::SimWorld;

/// Structured selection outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// No record in the catalog is eligible.
    NoGoal,
    Selected(SelectedGoal),
}

/// Minimal selected goal metadata for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedGoal {
    pub id: GoalId,
    pub category: String,
    pub class: VariantClass,
    pub required_value: u64,
}

/// Select the next goal from an in-memory scenario.
pub fn select_goal(scenario: Scenario, ordering: &RegionOrdering) -> SelectOutcome {
    let world = SimWorld::new(scenario);
    match next_goal(&world, ordering) {
        Some(goal) => SelectOutcome::Selected(SelectedGoal {
            class: goal.class(),
            id: goal.id,
            category: goal.category,
            required_value: goal.required_value,
        }),
        None => SelectOutcome::NoGoal,
    }
}

/// Load a scenario from disk and select its next goal.
pub fn select_from_path(path: &Path, ordering: &RegionOrdering) -> Result<SelectOutcome> {
    let scenario = load_scenario(path).with_context(|| "load scenario for selection")?;
    Ok(select_goal(scenario, ordering))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{clear_gym, route_kill, starter_scenario};

    #[test]
    fn selects_lowest_requirement_in_first_region() {
        let mut scenario = starter_scenario();
        scenario.set_goals(vec![
            route_kill("kill-100", "kanto", 0, 1, 100),
            clear_gym("gym-5", "kanto", 0, 0, 5),
        ]);

        let outcome = select_goal(scenario, &RegionOrdering::default());
        assert_eq!(
            outcome,
            SelectOutcome::Selected(SelectedGoal {
                id: GoalId::new("gym-5"),
                category: "kanto".to_string(),
                class: VariantClass::ClearGym,
                required_value: 5,
            })
        );
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        let outcome = select_goal(starter_scenario(), &RegionOrdering::default());
        assert_eq!(outcome, SelectOutcome::NoGoal);
    }

    #[test]
    fn selection_is_stable_across_runs() {
        let mut scenario = starter_scenario();
        scenario.set_goals(vec![
            route_kill("a", "kanto", 0, 1, 10),
            route_kill("b", "kanto", 0, 2, 10),
        ]);
        let first = select_goal(scenario.clone(), &RegionOrdering::default());
        let second = select_goal(scenario, &RegionOrdering::default());
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_reports_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("missing.json");
        let err = select_from_path(&path, &RegionOrdering::default()).expect_err("missing");
        assert!(format!("{err:#}").contains("missing.json"));
    }
}

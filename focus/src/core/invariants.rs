//! Catalog invariants checked before a snapshot is used.
//!
//! Unresolvable gym or dungeon references are deliberately not errors: the
//! filter skips them at selection time.

use std::collections::HashSet;

use crate::core::types::{GoalRecord, GoalVariant};

/// Check catalog invariants:
/// - No duplicate ids
/// - Non-empty id and category
/// - `required_value > 0`
/// - Route-kill payload region matches the record's nominal region
pub fn validate_catalog(goals: &[GoalRecord]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for (index, goal) in goals.iter().enumerate() {
        let label = format!("goals[{index}]");
        if goal.id.as_str().trim().is_empty() {
            errors.push(format!("{label}: id must not be empty"));
        } else if !seen.insert(goal.id.clone()) {
            errors.push(format!("duplicate id '{}' at {label}", goal.id));
        }
        if goal.category.trim().is_empty() {
            errors.push(format!("{label}: category must not be empty"));
        }
        if goal.required_value == 0 {
            errors.push(format!("{label}: required_value must be > 0"));
        }
        if let GoalVariant::RouteKill { region, .. } = goal.variant {
            if region != goal.region {
                errors.push(format!(
                    "{label}: route region {region} differs from goal region {}",
                    goal.region
                ));
            }
        }
    }
    errors
}

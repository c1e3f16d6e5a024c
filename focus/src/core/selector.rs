//! Deterministic priority selection over eligible goals.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::core::eligibility::filter_eligible;
use crate::core::region::RegionOrdering;
use crate::core::types::GoalRecord;
use crate::core::world::{Catalog, WorldContext};

/// Multi-key comparator, ascending:
/// 1. region rank of the category (with aliases and deferral applied)
/// 2. `required_value`
/// 3. variant class (route kill, then gym, then dungeon)
///
/// Each key is a total order on integers, so the lexicographic combination is
/// a total preorder.
pub fn compare_goals(ordering: &RegionOrdering, a: &GoalRecord, b: &GoalRecord) -> Ordering {
    ordering
        .rank(&a.category)
        .cmp(&ordering.rank(&b.category))
        .then_with(|| a.required_value.cmp(&b.required_value))
        .then_with(|| a.class().cmp(&b.class()))
}

/// Pick the head of the ordered eligible set.
///
/// Full ties keep the earliest record in input (catalog) order. Returns `None`
/// iff `eligible` is empty.
pub fn select_goal(ordering: &RegionOrdering, eligible: &[GoalRecord]) -> Option<GoalRecord> {
    eligible
        .iter()
        .min_by(|a, b| compare_goals(ordering, a, b))
        .cloned()
}

/// Filter the catalog, then select.
#[instrument(skip_all, fields(defer_last = ordering.defer_last()))]
pub fn next_goal<W: Catalog + WorldContext + ?Sized>(
    world: &W,
    ordering: &RegionOrdering,
) -> Option<GoalRecord> {
    let eligible = filter_eligible(world);
    let selected = select_goal(ordering, &eligible);
    debug!(
        eligible = eligible.len(),
        selected = ?selected.as_ref().map(|goal| goal.id.as_str()),
        "goal selection"
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{clear_dungeon, clear_gym, route_kill};

    fn selected_id(ordering: &RegionOrdering, goals: &[GoalRecord]) -> Option<String> {
        select_goal(ordering, goals).map(|goal| goal.id.0)
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert_eq!(select_goal(&RegionOrdering::default(), &[]), None);
    }

    #[test]
    fn lower_region_wins_first() {
        let goals = vec![
            route_kill("johto", "johto", 1, 29, 1),
            clear_dungeon("kanto", "kanto", 0, 0, 500),
        ];
        assert_eq!(
            selected_id(&RegionOrdering::default(), &goals).as_deref(),
            Some("kanto")
        );
    }

    #[test]
    fn lower_required_value_wins_before_variant_tiebreak() {
        let goals = vec![
            route_kill("kill", "kanto", 0, 1, 10),
            clear_gym("gym", "kanto", 0, 0, 5),
        ];
        assert_eq!(
            selected_id(&RegionOrdering::default(), &goals).as_deref(),
            Some("gym")
        );
    }

    #[test]
    fn route_kill_beats_gym_beats_dungeon_when_otherwise_tied() {
        let ordering = RegionOrdering::default();
        let kill = route_kill("kill", "kanto", 0, 1, 10);
        let gym = clear_gym("gym", "kanto", 0, 0, 10);
        let dungeon = clear_dungeon("dungeon", "kanto", 0, 0, 10);

        let goals = vec![dungeon.clone(), gym.clone(), kill];
        assert_eq!(selected_id(&ordering, &goals).as_deref(), Some("kill"));
        let goals = vec![dungeon, gym];
        assert_eq!(selected_id(&ordering, &goals).as_deref(), Some("gym"));
    }

    #[test]
    fn aliased_category_sorts_as_its_target_region() {
        let ordering = RegionOrdering::default();
        // Nominal region 0 does not matter: "sevii" ranks as hoenn.
        let sevii = route_kill("sevii", "sevii", 0, 1, 1);
        let hoenn = route_kill("hoenn", "hoenn", 2, 101, 1);
        let johto = route_kill("johto", "johto", 1, 29, 1);

        assert_eq!(compare_goals(&ordering, &sevii, &hoenn), Ordering::Equal);
        assert_eq!(compare_goals(&ordering, &johto, &sevii), Ordering::Less);
    }

    #[test]
    fn deferred_category_moves_behind_every_region() {
        let mut ordering = RegionOrdering::default();
        let karp = route_kill("karp", "magikarpJump", 7, 1, 1);
        let paldea = route_kill("paldea", "paldea", 9, 1, 1);
        let goals = vec![karp, paldea];

        assert_eq!(selected_id(&ordering, &goals).as_deref(), Some("karp"));
        ordering.set_defer_last(true);
        assert_eq!(selected_id(&ordering, &goals).as_deref(), Some("paldea"));
    }

    #[test]
    fn full_ties_keep_catalog_order() {
        let ordering = RegionOrdering::default();
        let goals = vec![
            route_kill("first", "kanto", 0, 1, 10),
            route_kill("second", "kanto", 0, 2, 10),
        ];
        assert_eq!(selected_id(&ordering, &goals).as_deref(), Some("first"));
    }

    #[test]
    fn comparator_is_antisymmetric_and_transitive() {
        let ordering = RegionOrdering::default();
        let goals = vec![
            route_kill("a", "kanto", 0, 1, 10),
            clear_gym("b", "kanto", 0, 0, 10),
            clear_dungeon("c", "kanto", 0, 0, 3),
            route_kill("d", "sevii", 0, 1, 1),
            clear_gym("e", "unknownIsland", 0, 0, 1),
            route_kill("f", "johto", 1, 29, 10),
        ];
        for a in &goals {
            for b in &goals {
                let ab = compare_goals(&ordering, a, b);
                let ba = compare_goals(&ordering, b, a);
                assert_eq!(ab, ba.reverse(), "{} vs {}", a.id, b.id);
                for c in &goals {
                    let bc = compare_goals(&ordering, b, c);
                    if ab != Ordering::Greater && bc != Ordering::Greater {
                        assert_ne!(
                            compare_goals(&ordering, a, c),
                            Ordering::Greater,
                            "{} <= {} <= {}",
                            a.id,
                            b.id,
                            c.id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let ordering = RegionOrdering::default();
        let goals = vec![
            clear_gym("gym", "kanto", 0, 0, 4),
            route_kill("kill", "kanto", 0, 1, 4),
            clear_dungeon("dungeon", "kanto", 0, 0, 4),
        ];
        let first = select_goal(&ordering, &goals);
        for _ in 0..10 {
            assert_eq!(select_goal(&ordering, &goals), first);
        }
    }
}

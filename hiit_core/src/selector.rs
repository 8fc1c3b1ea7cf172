//! Exercise selection for a session.
//!
//! Exercises are picked by round-robin over a pool that interleaves the
//! enabled categories, so consecutive units rotate through categories. The
//! selection is deterministic: no shuffling, same inputs give same output.
//!
//! One-sided exercises are emitted as two consecutive identical entries. The
//! session builder relies on that adjacency to assign body sides.

use crate::catalog::Catalog;
use crate::types::{ExerciseCategory, ExerciseDefinition, SelectionConfig};
use std::collections::BTreeSet;

/// Order in which exercises are handed out
///
/// Takes the first exercise of every enabled category (in category order),
/// then the second of each, and so on until every group is exhausted.
pub fn selection_pool(
    catalog: &Catalog,
    categories: &BTreeSet<ExerciseCategory>,
) -> Vec<ExerciseDefinition> {
    let groups: Vec<Vec<ExerciseDefinition>> = categories
        .iter()
        .map(|&category| catalog.by_category(category).copied().collect())
        .filter(|group: &Vec<_>| !group.is_empty())
        .collect();

    let longest = groups.iter().map(Vec::len).max().unwrap_or(0);
    (0..longest)
        .flat_map(|rank| groups.iter().filter_map(move |group| group.get(rank).copied()))
        .collect()
}

/// Select exactly `target_units` entries from the enabled categories
///
/// Returns an empty list when no catalog entry matches the enabled
/// categories; callers treat that as "cannot build a session". Exercises
/// repeat once the pool is exhausted.
pub fn select_exercises(
    catalog: &Catalog,
    target_units: usize,
    categories: &BTreeSet<ExerciseCategory>,
) -> Vec<ExerciseDefinition> {
    let pool = selection_pool(catalog, categories);
    if pool.is_empty() {
        tracing::debug!("No exercises match enabled categories {:?}", categories);
        return Vec::new();
    }

    let mut selected = Vec::with_capacity(target_units);
    let mut cursor = 0;

    while selected.len() < target_units {
        let remaining = target_units - selected.len();
        let mut exercise = pool[cursor % pool.len()];
        cursor += 1;

        // A one-sided exercise needs two units: with a single unit left,
        // hand it to the next two-sided exercise if the pool has one.
        if exercise.one_sided && remaining == 1 {
            if let Some(offset) =
                (0..pool.len()).find(|offset| !pool[(cursor + offset) % pool.len()].one_sided)
            {
                exercise = pool[(cursor + offset) % pool.len()];
            }
        }

        selected.push(exercise);
        if exercise.one_sided && remaining >= 2 {
            selected.push(exercise);
        }
    }

    tracing::debug!(
        "Selected {} units from a pool of {} exercises",
        selected.len(),
        pool.len()
    );

    selected
}

impl SelectionConfig {
    /// Run the selector against a catalog
    pub fn select(&self, catalog: &Catalog) -> Vec<ExerciseDefinition> {
        select_exercises(catalog, self.unit_count, &self.categories)
    }
}

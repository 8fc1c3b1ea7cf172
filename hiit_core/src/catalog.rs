//! Default catalog of exercises.
//!
//! The catalog is compiled in and not user configurable. Entry order within
//! a category is the order the selector hands exercises out.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// The complete list of available exercises
#[derive(Clone, Debug)]
pub struct Catalog {
    exercises: Vec<ExerciseDefinition>,
    by_id: HashMap<&'static str, usize>,
}

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with the built-in exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference.
pub fn build_default_catalog() -> Catalog {
    Catalog::new(EXERCISES.to_vec())
}

const fn two_sided(
    id: &'static str,
    name: &'static str,
    category: ExerciseCategory,
) -> ExerciseDefinition {
    ExerciseDefinition {
        id,
        name,
        category,
        one_sided: false,
    }
}

const fn one_sided(
    id: &'static str,
    name: &'static str,
    category: ExerciseCategory,
) -> ExerciseDefinition {
    ExerciseDefinition {
        id,
        name,
        category,
        one_sided: true,
    }
}

const EXERCISES: &[ExerciseDefinition] = &[
    // Burpee
    two_sided("burpee", "Burpee", ExerciseCategory::Burpee),
    two_sided("burpee_push_up", "Burpee with push-up", ExerciseCategory::Burpee),
    two_sided("burpee_tuck_jump", "Burpee tuck jump", ExerciseCategory::Burpee),
    // Crunch
    two_sided("crunch", "Crunch", ExerciseCategory::Crunch),
    two_sided("bicycle_crunch", "Bicycle crunch", ExerciseCategory::Crunch),
    two_sided("reverse_crunch", "Reverse crunch", ExerciseCategory::Crunch),
    // Dips
    two_sided("bench_dips", "Bench dips", ExerciseCategory::Dips),
    one_sided("single_leg_dips", "Single-leg bench dips", ExerciseCategory::Dips),
    // Jumping jacks
    two_sided("jumping_jacks", "Jumping jacks", ExerciseCategory::JumpingJacks),
    two_sided("seal_jacks", "Seal jacks", ExerciseCategory::JumpingJacks),
    two_sided("squat_jacks", "Squat jacks", ExerciseCategory::JumpingJacks),
    // Leg raise
    two_sided("lying_leg_raise", "Lying leg raise", ExerciseCategory::LegRaise),
    one_sided("side_leg_raise", "Side-lying leg raise", ExerciseCategory::LegRaise),
    two_sided("flutter_kicks", "Flutter kicks", ExerciseCategory::LegRaise),
    // Lunge
    two_sided("alternating_lunge", "Alternating lunge", ExerciseCategory::Lunge),
    one_sided("side_lunge", "Side lunge", ExerciseCategory::Lunge),
    one_sided("curtsy_lunge", "Curtsy lunge", ExerciseCategory::Lunge),
    two_sided("jumping_lunge", "Jumping lunge", ExerciseCategory::Lunge),
    // Mountain climber
    two_sided("mountain_climber", "Mountain climber", ExerciseCategory::MountainClimber),
    two_sided(
        "cross_body_mountain_climber",
        "Cross-body mountain climber",
        ExerciseCategory::MountainClimber,
    ),
    // Plank
    two_sided("plank", "Plank", ExerciseCategory::Plank),
    one_sided("side_plank", "Side plank", ExerciseCategory::Plank),
    two_sided("plank_shoulder_tap", "Plank shoulder tap", ExerciseCategory::Plank),
    two_sided("plank_jacks", "Plank jacks", ExerciseCategory::Plank),
    // Push-up
    two_sided("push_up", "Push-up", ExerciseCategory::PushUp),
    two_sided("wide_push_up", "Wide push-up", ExerciseCategory::PushUp),
    two_sided("diamond_push_up", "Diamond push-up", ExerciseCategory::PushUp),
    // Squat
    two_sided("air_squat", "Air squat", ExerciseCategory::Squat),
    two_sided("jump_squat", "Jump squat", ExerciseCategory::Squat),
    two_sided("sumo_squat", "Sumo squat", ExerciseCategory::Squat),
    one_sided("split_squat", "Bulgarian split squat", ExerciseCategory::Squat),
];

impl Catalog {
    /// Create a catalog from an explicit list of exercises
    pub fn new(exercises: Vec<ExerciseDefinition>) -> Self {
        let by_id = exercises
            .iter()
            .enumerate()
            .map(|(idx, exercise)| (exercise.id, idx))
            .collect();
        Self { exercises, by_id }
    }

    /// All exercises in catalog order
    pub fn exercises(&self) -> &[ExerciseDefinition] {
        &self.exercises
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseDefinition> {
        self.by_id.get(id).map(|&idx| &self.exercises[idx])
    }

    /// Exercises of one category, in catalog order
    pub fn by_category(
        &self,
        category: ExerciseCategory,
    ) -> impl Iterator<Item = &ExerciseDefinition> + '_ {
        self.exercises
            .iter()
            .filter(move |e| e.category == category)
    }

    /// Number of work units the enabled exercises can fill without repeating
    ///
    /// One-sided exercises count twice, once per side.
    pub fn capacity(&self, categories: &BTreeSet<ExerciseCategory>) -> usize {
        self.exercises
            .iter()
            .filter(|e| categories.contains(&e.category))
            .map(|e| if e.one_sided { 2 } else { 1 })
            .sum()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if !seen.insert(exercise.id) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
        }

        for category in ExerciseCategory::ALL {
            if self.by_category(category).next().is_none() {
                errors.push(format!("Catalog has no {} exercises", category));
            }
        }

        errors
    }
}

//! Session builder.
//!
//! Turns timing preferences and a selected exercise list into the ordered,
//! time-annotated steps of a session:
//!
//! 1. An optional prepare countdown, when `session_countdown_ms > 0`
//! 2. For every selected exercise, a rest step followed by a work step
//!
//! Every step records the time left in the whole session once it ends. The
//! final work step always ends at zero. Durations saturate at `u64::MAX`;
//! `Config::validate` rejects settings that would get there.

use crate::types::{
    ExerciseDefinition, ExerciseStep, Session, SessionStep, Side, StepTiming, User,
    WorkoutTimingConfig,
};

/// Build a session from timing settings and the selector output
///
/// An empty exercise list yields a session holding at most the prepare
/// step; callers are expected to have refused to launch before that.
pub fn build_session(
    config: &WorkoutTimingConfig,
    exercises: &[ExerciseDefinition],
    users: &[User],
) -> Session {
    let total_duration_ms = config.total_duration_ms();
    let total_units = exercises.len();
    let mut steps = Vec::with_capacity(2 * total_units + 1);

    if config.session_countdown_ms > 0 {
        steps.push(SessionStep::Prepare(StepTiming {
            duration_ms: config.session_countdown_ms,
            countdown_ms: config.period_countdown_ms,
            remaining_after_ms: total_duration_ms.saturating_sub(config.session_countdown_ms),
        }));
    }

    for (idx, exercise) in exercises.iter().enumerate() {
        let side = infer_side(exercises, idx);
        let units_after = (total_units - idx - 1) as u64;

        steps.push(SessionStep::Rest(ExerciseStep {
            timing: StepTiming {
                duration_ms: config.rest_period_ms,
                countdown_ms: config.period_countdown_ms,
                remaining_after_ms: (units_after + 1)
                    .saturating_mul(config.work_period_ms)
                    .saturating_add(units_after.saturating_mul(config.rest_period_ms)),
            },
            exercise: *exercise,
            side,
        }));

        steps.push(SessionStep::Work(ExerciseStep {
            timing: StepTiming {
                duration_ms: config.work_period_ms,
                countdown_ms: config.period_countdown_ms,
                remaining_after_ms: units_after
                    .saturating_mul(config.work_period_ms.saturating_add(config.rest_period_ms)),
            },
            exercise: *exercise,
            side,
        }));
    }

    tracing::debug!(
        "Built session: {} steps over {} units, {}ms total",
        steps.len(),
        total_units,
        total_duration_ms
    );

    Session {
        steps,
        duration_ms: total_duration_ms,
        beep_enabled: config.beep_enabled,
        users: users.to_vec(),
    }
}

/// Body side of the exercise at `idx`, read from its neighbours
///
/// The selector places both sides of a one-sided exercise next to each
/// other. A one-sided exercise that repeats after the pool wraps around
/// looks the same as a fresh pair and is read the same way.
pub fn infer_side(exercises: &[ExerciseDefinition], idx: usize) -> Side {
    let exercise = &exercises[idx];
    if !exercise.one_sided {
        return Side::None;
    }

    let same_as_previous = idx > 0 && exercises[idx - 1] == *exercise;
    let same_as_next = exercises.get(idx + 1) == Some(exercise);

    if same_as_previous {
        Side::Second
    } else if same_as_next {
        Side::First
    } else {
        Side::None
    }
}

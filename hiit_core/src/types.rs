//! Core domain types for the HIIT workout companion.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise categories and catalog entries
//! - Selection and timing configuration for a session build
//! - Session steps and the built session
//! - Users, persisted session records and derived statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Family an exercise belongs to, used to filter eligible exercises
///
/// Declaration order is the order in which categories are interleaved
/// when the selector builds its pool.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Burpee,
    Crunch,
    Dips,
    JumpingJacks,
    LegRaise,
    Lunge,
    MountainClimber,
    Plank,
    PushUp,
    Squat,
}

impl ExerciseCategory {
    pub const ALL: [ExerciseCategory; 10] = [
        ExerciseCategory::Burpee,
        ExerciseCategory::Crunch,
        ExerciseCategory::Dips,
        ExerciseCategory::JumpingJacks,
        ExerciseCategory::LegRaise,
        ExerciseCategory::Lunge,
        ExerciseCategory::MountainClimber,
        ExerciseCategory::Plank,
        ExerciseCategory::PushUp,
        ExerciseCategory::Squat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Burpee => "burpee",
            ExerciseCategory::Crunch => "crunch",
            ExerciseCategory::Dips => "dips",
            ExerciseCategory::JumpingJacks => "jumping_jacks",
            ExerciseCategory::LegRaise => "leg_raise",
            ExerciseCategory::Lunge => "lunge",
            ExerciseCategory::MountainClimber => "mountain_climber",
            ExerciseCategory::Plank => "plank",
            ExerciseCategory::PushUp => "push_up",
            ExerciseCategory::Squat => "squat",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable catalog entry
///
/// One-sided exercises are performed once per body side and occupy two
/// work units in a session.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
pub struct ExerciseDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ExerciseCategory,
    pub one_sided: bool,
}

/// Body side of one occurrence of a one-sided exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    None,
    First,
    Second,
}

// ============================================================================
// Build Configuration
// ============================================================================

/// What the selector is asked to fill
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionConfig {
    /// `work_periods_per_cycle * cycles`
    pub unit_count: usize,
    pub categories: BTreeSet<ExerciseCategory>,
}

/// Timing parameters for one session build, all durations in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkoutTimingConfig {
    pub work_period_ms: u64,
    pub rest_period_ms: u64,
    pub work_periods_per_cycle: u32,
    pub cycles: u32,
    pub session_countdown_ms: u64,
    pub period_countdown_ms: u64,
    pub beep_enabled: bool,
}

impl WorkoutTimingConfig {
    /// Number of work periods in the whole session
    pub fn total_units(&self) -> u64 {
        u64::from(self.work_periods_per_cycle) * u64::from(self.cycles)
    }

    /// Full session length including the initial countdown, or `None`
    /// when it does not fit in a `u64`
    pub fn checked_total_duration_ms(&self) -> Option<u64> {
        self.work_period_ms
            .checked_add(self.rest_period_ms)?
            .checked_mul(self.total_units())?
            .checked_add(self.session_countdown_ms)
    }

    /// Full session length including the initial countdown, saturating at
    /// `u64::MAX`
    pub fn total_duration_ms(&self) -> u64 {
        self.checked_total_duration_ms().unwrap_or(u64::MAX)
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Timing fields shared by every step
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct StepTiming {
    pub duration_ms: u64,
    /// Countdown shown near the end of the step
    pub countdown_ms: u64,
    /// Time left in the whole session once this step completes
    pub remaining_after_ms: u64,
}

/// A rest or work period tied to an exercise
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ExerciseStep {
    pub timing: StepTiming,
    pub exercise: ExerciseDefinition,
    pub side: Side,
}

/// One step of a running session
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionStep {
    /// Initial countdown before the first exercise
    Prepare(StepTiming),
    /// Rest period announcing the upcoming exercise
    Rest(ExerciseStep),
    /// Work period performing the exercise
    Work(ExerciseStep),
}

impl SessionStep {
    pub fn timing(&self) -> &StepTiming {
        match self {
            SessionStep::Prepare(timing) => timing,
            SessionStep::Rest(step) | SessionStep::Work(step) => &step.timing,
        }
    }

    pub fn exercise(&self) -> Option<&ExerciseDefinition> {
        match self {
            SessionStep::Prepare(_) => None,
            SessionStep::Rest(step) | SessionStep::Work(step) => Some(&step.exercise),
        }
    }

    pub fn side(&self) -> Side {
        match self {
            SessionStep::Prepare(_) => Side::None,
            SessionStep::Rest(step) | SessionStep::Work(step) => step.side,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SessionStep::Prepare(_) => "prepare",
            SessionStep::Rest(_) => "rest",
            SessionStep::Work(_) => "work",
        }
    }
}

/// A fully built session, immutable once built
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub steps: Vec<SessionStep>,
    pub duration_ms: u64,
    pub beep_enabled: bool,
    pub users: Vec<User>,
}

// ============================================================================
// Users, Records and Statistics
// ============================================================================

/// A household member who may take part in sessions
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

/// A completed session as persisted
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    /// Epoch milliseconds
    pub timestamp_ms: i64,
    pub duration_ms: u64,
    pub user_ids: Vec<Uuid>,
}

/// Derived per-user statistics, recomputed on demand
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UserStatistics {
    pub total_sessions: usize,
    pub cumulated_time_ms: u64,
    pub average_session_length_ms: u64,
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    pub average_sessions_per_week: String,
}

impl UserStatistics {
    /// Statistics for a user with no recorded sessions
    pub fn empty() -> Self {
        Self {
            total_sessions: 0,
            cumulated_time_ms: 0,
            average_session_length_ms: 0,
            current_streak_days: 0,
            longest_streak_days: 0,
            average_sessions_per_week: "0".into(),
        }
    }
}

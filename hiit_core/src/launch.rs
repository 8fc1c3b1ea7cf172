//! Pre-launch checks and session preparation.
//!
//! Problems found before a session starts are reported as warnings, never
//! as errors. Some of them block the launch, the others only inform.

use crate::builder::build_session;
use crate::catalog::Catalog;
use crate::config::WorkoutSettings;
use crate::types::{Session, SessionRecord, User};
use std::fmt;
use uuid::Uuid;

/// Condition detected while preparing a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LaunchWarning {
    /// Nobody is selected to take part
    NoUserSelected,
    /// The enabled categories match no exercise
    NoExercisesAvailable,
    /// Some enabled categories will not get a single unit
    FewerUnitsThanCategories { units: usize, categories: usize },
    /// The enabled exercises cannot fill the session without repeating
    ExercisesWillRepeat { units: usize, capacity: usize },
}

impl LaunchWarning {
    /// Whether the session cannot be started
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            LaunchWarning::NoUserSelected | LaunchWarning::NoExercisesAvailable
        )
    }
}

impl fmt::Display for LaunchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchWarning::NoUserSelected => write!(f, "No user selected"),
            LaunchWarning::NoExercisesAvailable => {
                write!(f, "No exercises available for the enabled categories")
            }
            LaunchWarning::FewerUnitsThanCategories { units, categories } => write!(
                f,
                "Only {} work periods for {} enabled categories: some categories will be skipped",
                units, categories
            ),
            LaunchWarning::ExercisesWillRepeat { units, capacity } => write!(
                f,
                "{} work periods but only {} available without repetition: exercises will repeat",
                units, capacity
            ),
        }
    }
}

/// Outcome of preparing a session
#[derive(Clone, Debug)]
pub struct LaunchPlan {
    /// `None` exactly when a blocking warning is present
    pub session: Option<Session>,
    pub warnings: Vec<LaunchWarning>,
}

impl LaunchPlan {
    pub fn is_blocked(&self) -> bool {
        self.warnings.iter().any(LaunchWarning::is_blocking)
    }
}

/// Select exercises and build a session for the selected users
pub fn prepare_session(catalog: &Catalog, settings: &WorkoutSettings, users: &[User]) -> LaunchPlan {
    let timing = settings.timing();
    let selection = settings.selection();
    let participants: Vec<User> = users.iter().filter(|u| u.selected).cloned().collect();

    let mut warnings = Vec::new();
    if participants.is_empty() {
        warnings.push(LaunchWarning::NoUserSelected);
    }

    let exercises = selection.select(catalog);
    let capacity = catalog.capacity(&selection.categories);

    if selection.unit_count > 0 && exercises.is_empty() {
        warnings.push(LaunchWarning::NoExercisesAvailable);
    } else {
        if selection.unit_count < selection.categories.len() {
            warnings.push(LaunchWarning::FewerUnitsThanCategories {
                units: selection.unit_count,
                categories: selection.categories.len(),
            });
        }
        if selection.unit_count > capacity {
            warnings.push(LaunchWarning::ExercisesWillRepeat {
                units: selection.unit_count,
                capacity,
            });
        }
    }

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let session = if warnings.iter().any(LaunchWarning::is_blocking) {
        None
    } else {
        let session = build_session(&timing, &exercises, &participants);
        tracing::info!(
            "Prepared session of {} steps ({}ms) for {} user(s)",
            session.steps.len(),
            session.duration_ms,
            session.users.len()
        );
        Some(session)
    };

    LaunchPlan { session, warnings }
}

/// The record to persist once `session` has been completed
pub fn completed_record(session: &Session, now_ms: i64) -> SessionRecord {
    SessionRecord {
        id: Uuid::new_v4(),
        timestamp_ms: now_ms,
        duration_ms: session.duration_ms,
        user_ids: session.users.iter().map(|u| u.id).collect(),
    }
}

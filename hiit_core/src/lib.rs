#![forbid(unsafe_code)]

//! Core domain model and business logic for the HIIT workout companion.
//!
//! This crate provides:
//! - Domain types (exercises, timing configuration, session steps, records)
//! - The compiled-in exercise catalog and the exercise selector
//! - The session builder and the per-tick progress values derived from it
//! - Streak and statistics computation over recorded sessions
//! - Persistence (users registry, session record log) and configuration

pub mod types;
pub mod error;
pub mod catalog;
pub mod selector;
pub mod builder;
pub mod progress;
pub mod statistics;
pub mod launch;
pub mod config;
pub mod logging;
pub mod users;
pub mod records;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use selector::select_exercises;
pub use builder::build_session;
pub use progress::StepProgress;
pub use statistics::{average_sessions_per_week, DayRelation, StreakCalculator};
pub use launch::{completed_record, prepare_session, LaunchPlan, LaunchWarning};
pub use config::Config;
pub use users::UserRegistry;
pub use records::{JsonlRecordSink, RecordSink};

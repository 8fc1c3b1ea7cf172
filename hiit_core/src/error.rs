//! Error types for the hiit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for hiit_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// No user registered under that name
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// A user with that name is already registered
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// A step's countdown is longer than the step itself
    #[error("Malformed countdown: countdown of {countdown_ms}ms exceeds step duration of {step_duration_ms}ms")]
    MalformedCountdown {
        countdown_ms: u64,
        step_duration_ms: u64,
    },

    /// Time left in a step is longer than the step itself
    #[error("Invalid remaining time: {remaining_ms}ms left in a step of {step_duration_ms}ms")]
    InvalidRemaining {
        remaining_ms: u64,
        step_duration_ms: u64,
    },

    /// Step index outside the session
    #[error("Step {index} out of range for session with {len} steps")]
    StepOutOfRange { index: usize, len: usize },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

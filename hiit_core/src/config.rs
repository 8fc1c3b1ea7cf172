//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/hiit/config.toml`. The
//! `[workout]` section is the preference store read once per session build.

use crate::types::{ExerciseCategory, SelectionConfig, WorkoutTimingConfig};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub workout: WorkoutSettings,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Workout preferences, durations in milliseconds
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutSettings {
    #[serde(default = "default_work_period_ms")]
    pub work_period_ms: u64,

    #[serde(default = "default_rest_period_ms")]
    pub rest_period_ms: u64,

    #[serde(default = "default_work_periods_per_cycle")]
    pub work_periods_per_cycle: u32,

    #[serde(default = "default_cycles")]
    pub cycles: u32,

    #[serde(default = "default_session_countdown_ms")]
    pub session_countdown_ms: u64,

    #[serde(default = "default_period_countdown_ms")]
    pub period_countdown_ms: u64,

    #[serde(default = "default_beep_enabled")]
    pub beep_enabled: bool,

    #[serde(default = "default_categories")]
    pub categories: Vec<ExerciseCategory>,
}

impl Default for WorkoutSettings {
    fn default() -> Self {
        Self {
            work_period_ms: default_work_period_ms(),
            rest_period_ms: default_rest_period_ms(),
            work_periods_per_cycle: default_work_periods_per_cycle(),
            cycles: default_cycles(),
            session_countdown_ms: default_session_countdown_ms(),
            period_countdown_ms: default_period_countdown_ms(),
            beep_enabled: default_beep_enabled(),
            categories: default_categories(),
        }
    }
}

impl WorkoutSettings {
    /// Timing values for one session build
    pub fn timing(&self) -> WorkoutTimingConfig {
        WorkoutTimingConfig {
            work_period_ms: self.work_period_ms,
            rest_period_ms: self.rest_period_ms,
            work_periods_per_cycle: self.work_periods_per_cycle,
            cycles: self.cycles,
            session_countdown_ms: self.session_countdown_ms,
            period_countdown_ms: self.period_countdown_ms,
            beep_enabled: self.beep_enabled,
        }
    }

    /// Selector input for one session build
    pub fn selection(&self) -> SelectionConfig {
        SelectionConfig {
            unit_count: self.work_periods_per_cycle as usize * self.cycles as usize,
            categories: self.categories.iter().copied().collect(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("hiit")
}

fn default_work_period_ms() -> u64 {
    20_000
}

fn default_rest_period_ms() -> u64 {
    10_000
}

fn default_work_periods_per_cycle() -> u32 {
    8
}

fn default_cycles() -> u32 {
    4
}

fn default_session_countdown_ms() -> u64 {
    20_000
}

fn default_period_countdown_ms() -> u64 {
    5_000
}

fn default_beep_enabled() -> bool {
    true
}

fn default_categories() -> Vec<ExerciseCategory> {
    ExerciseCategory::ALL.to_vec()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("hiit").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject settings that would produce a malformed session
    ///
    /// The period countdown must fit in every step it is shown in, and the
    /// whole session length must fit in milliseconds as a `u64`.
    pub fn validate(&self) -> Result<()> {
        let workout = &self.workout;
        let countdown = workout.period_countdown_ms;

        if countdown > workout.work_period_ms || countdown > workout.rest_period_ms {
            return Err(Error::Config(format!(
                "period countdown of {}ms is longer than the work ({}ms) or rest ({}ms) period",
                countdown, workout.work_period_ms, workout.rest_period_ms
            )));
        }
        if workout.session_countdown_ms > 0 && countdown > workout.session_countdown_ms {
            return Err(Error::Config(format!(
                "period countdown of {}ms is longer than the session countdown of {}ms",
                countdown, workout.session_countdown_ms
            )));
        }
        if workout.timing().checked_total_duration_ms().is_none() {
            return Err(Error::Config(format!(
                "{} cycles of {} periods of {}ms work and {}ms rest is too long a session",
                workout.cycles,
                workout.work_periods_per_cycle,
                workout.work_period_ms,
                workout.rest_period_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.workout.work_period_ms, 20_000);
        assert_eq!(config.workout.rest_period_ms, 10_000);
        assert_eq!(config.workout.categories.len(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.workout, parsed.workout);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[workout]
cycles = 2
categories = ["plank", "squat"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.workout.cycles, 2);
        assert_eq!(config.workout.work_periods_per_cycle, 8); // default
        assert_eq!(
            config.workout.categories,
            vec![ExerciseCategory::Plank, ExerciseCategory::Squat]
        );
    }

    #[test]
    fn test_selection_and_timing() {
        let settings = WorkoutSettings {
            work_periods_per_cycle: 6,
            cycles: 3,
            categories: vec![ExerciseCategory::Lunge, ExerciseCategory::Lunge],
            ..WorkoutSettings::default()
        };
        let selection = settings.selection();
        assert_eq!(selection.unit_count, 18);
        assert_eq!(selection.categories.len(), 1);

        let timing = settings.timing();
        assert_eq!(timing.total_units(), 18);
        assert_eq!(timing.total_duration_ms(), 18 * 30_000 + 20_000);
    }

    #[test]
    fn test_countdown_longer_than_rest_is_rejected() {
        let mut config = Config::default();
        config.workout.rest_period_ms = 4_000;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_overflowing_session_length_is_rejected() {
        let config = Config {
            workout: WorkoutSettings {
                work_period_ms: u64::MAX / 4,
                ..WorkoutSettings::default()
            },
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.workout.beep_enabled = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.workout.beep_enabled);
    }
}

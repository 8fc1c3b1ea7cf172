//! Display values for a running session.
//!
//! The countdown timer only knows how much time is left in the current
//! step; everything the running-session screen shows is derived from that
//! and the built session on every tick.

use crate::types::Session;
use crate::{Error, Result};

/// Progress of the current step and of the whole session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepProgress {
    pub step_remaining_ms: u64,
    /// Fraction of the current step still to go, in `[0, 1]`
    pub step_remaining_fraction: f64,
    pub session_remaining_ms: u64,
    /// Fraction of the whole session still to go, in `[0, 1]`
    pub session_remaining_fraction: f64,
    /// Whether the end-of-step countdown is showing
    pub countdown_active: bool,
}

impl StepProgress {
    /// Compute progress with `step_remaining_ms` left in step `step_index`
    ///
    /// A step whose countdown is longer than the step itself is rejected
    /// with [`Error::MalformedCountdown`] rather than producing negative
    /// progress.
    pub fn at(session: &Session, step_index: usize, step_remaining_ms: u64) -> Result<Self> {
        let step = session.steps.get(step_index).ok_or(Error::StepOutOfRange {
            index: step_index,
            len: session.steps.len(),
        })?;
        let timing = step.timing();

        if timing.countdown_ms > timing.duration_ms {
            return Err(Error::MalformedCountdown {
                countdown_ms: timing.countdown_ms,
                step_duration_ms: timing.duration_ms,
            });
        }
        if step_remaining_ms > timing.duration_ms {
            return Err(Error::InvalidRemaining {
                remaining_ms: step_remaining_ms,
                step_duration_ms: timing.duration_ms,
            });
        }

        let session_remaining_ms = timing.remaining_after_ms.saturating_add(step_remaining_ms);

        Ok(Self {
            step_remaining_ms,
            step_remaining_fraction: fraction(step_remaining_ms, timing.duration_ms),
            session_remaining_ms,
            session_remaining_fraction: fraction(session_remaining_ms, session.duration_ms),
            countdown_active: timing.countdown_ms > 0 && step_remaining_ms <= timing.countdown_ms,
        })
    }

    /// Whole seconds left in the step, rounded up as a countdown shows them
    pub fn step_remaining_secs(&self) -> u64 {
        self.step_remaining_ms.div_ceil(1000)
    }
}

fn fraction(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_session;
    use crate::catalog::get_default_catalog;
    use crate::types::WorkoutTimingConfig;

    fn session(period_countdown_ms: u64) -> Session {
        let config = WorkoutTimingConfig {
            work_period_ms: 20_000,
            rest_period_ms: 10_000,
            work_periods_per_cycle: 2,
            cycles: 1,
            session_countdown_ms: 10_000,
            period_countdown_ms,
            beep_enabled: false,
        };
        let catalog = get_default_catalog();
        let exercises = vec![
            *catalog.get("burpee").unwrap(),
            *catalog.get("crunch").unwrap(),
        ];
        build_session(&config, &exercises, &[])
    }

    #[test]
    fn test_progress_at_session_start() {
        let session = session(3_000);
        let progress = StepProgress::at(&session, 0, 10_000).unwrap();
        assert_eq!(progress.step_remaining_fraction, 1.0);
        assert_eq!(progress.session_remaining_ms, 70_000);
        assert_eq!(progress.session_remaining_fraction, 1.0);
        assert!(!progress.countdown_active);
    }

    #[test]
    fn test_progress_mid_work_step() {
        let session = session(3_000);
        // Step 2 is the first work step, 30s left after it
        let progress = StepProgress::at(&session, 2, 5_000).unwrap();
        assert_eq!(progress.step_remaining_fraction, 0.25);
        assert_eq!(progress.session_remaining_ms, 35_000);
        assert_eq!(progress.session_remaining_fraction, 0.5);
        assert!(!progress.countdown_active);
        assert_eq!(progress.step_remaining_secs(), 5);
    }

    #[test]
    fn test_countdown_shows_near_end_of_step() {
        let session = session(3_000);
        let progress = StepProgress::at(&session, 1, 2_500).unwrap();
        assert!(progress.countdown_active);
        assert_eq!(progress.step_remaining_secs(), 3);
    }

    #[test]
    fn test_last_step_finishes_at_zero() {
        let session = session(3_000);
        let last = session.steps.len() - 1;
        let progress = StepProgress::at(&session, last, 0).unwrap();
        assert_eq!(progress.session_remaining_ms, 0);
        assert_eq!(progress.session_remaining_fraction, 0.0);
    }

    #[test]
    fn test_countdown_longer_than_step_is_an_error() {
        // 15s countdown does not fit the 10s rest step
        let session = session(15_000);
        let err = StepProgress::at(&session, 1, 5_000).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedCountdown {
                countdown_ms: 15_000,
                step_duration_ms: 10_000,
            }
        ));
    }

    #[test]
    fn test_out_of_range_step() {
        let session = session(3_000);
        let err = StepProgress::at(&session, 99, 0).unwrap_err();
        assert!(matches!(err, Error::StepOutOfRange { index: 99, len: 5 }));
    }

    #[test]
    fn test_remaining_longer_than_step_is_an_error() {
        let session = session(3_000);
        let err = StepProgress::at(&session, 1, 10_001).unwrap_err();
        assert!(matches!(err, Error::InvalidRemaining { .. }));
    }
}

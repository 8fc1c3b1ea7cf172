//! Streak and statistics computation.
//!
//! Streaks use calendar-day adjacency in a given time zone (the user's
//! local zone in production), not rolling 24-hour windows. Every function
//! takes the reference instant `now` explicitly so results are
//! reproducible.

use crate::types::{SessionRecord, UserStatistics};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// How two instants relate on the calendar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayRelation {
    SameDay,
    ConsecutiveDays,
    NonConsecutiveDays,
}

/// Streak calculations anchored in a time zone
#[derive(Clone, Debug)]
pub struct StreakCalculator<Tz: TimeZone> {
    tz: Tz,
}

impl StreakCalculator<Local> {
    /// Calculator using the machine's local time zone
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl<Tz: TimeZone> StreakCalculator<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Calendar day of an epoch-milliseconds instant, `None` outside the
    /// range chrono can represent
    fn day_of(&self, timestamp_ms: i64) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
            .map(|utc| utc.with_timezone(&self.tz).date_naive())
    }

    /// Classify two instants by the number of midnights between them
    ///
    /// An instant with no calendar day is never adjacent to anything.
    pub fn classify(&self, first_ms: i64, second_ms: i64) -> DayRelation {
        match (self.day_of(first_ms), self.day_of(second_ms)) {
            (Some(first), Some(second)) => relation(first, second),
            _ => DayRelation::NonConsecutiveDays,
        }
    }

    /// Days of all sessions plus `now`, most recent first
    ///
    /// Unrepresentable instants are skipped.
    fn days_with_now(&self, timestamps: &[i64], now_ms: i64) -> Vec<NaiveDate> {
        let mut all: Vec<i64> = timestamps.to_vec();
        all.push(now_ms);
        all.sort_unstable_by(|a, b| b.cmp(a));
        all.into_iter()
            .filter_map(|t| {
                let day = self.day_of(t);
                if day.is_none() {
                    tracing::warn!("Skipping out-of-range session timestamp {}", t);
                }
                day
            })
            .collect()
    }

    /// Consecutive days up to today (or yesterday) with at least one session
    ///
    /// `now` anchors the walk but is not a session itself: a session earlier
    /// today counts, while several sessions on one day count once.
    pub fn current_streak(&self, timestamps: &[i64], now_ms: i64) -> u32 {
        if timestamps.is_empty() {
            return 0;
        }

        let days = self.days_with_now(timestamps, now_ms);
        let mut streak = 0;
        for (idx, pair) in days.windows(2).enumerate() {
            match relation(pair[0], pair[1]) {
                DayRelation::SameDay => {
                    if idx == 0 {
                        streak += 1;
                    }
                }
                DayRelation::ConsecutiveDays => streak += 1,
                DayRelation::NonConsecutiveDays => break,
            }
        }
        streak
    }

    /// Longest run found by the same walk as [`Self::current_streak`]
    ///
    /// The counter restarts from zero after each gap, so a run following a
    /// gap counts the day pairs inside it.
    pub fn longest_streak(&self, timestamps: &[i64], now_ms: i64) -> u32 {
        if timestamps.is_empty() {
            return 0;
        }

        let days = self.days_with_now(timestamps, now_ms);
        let mut longest = 0;
        let mut streak = 0;
        for (idx, pair) in days.windows(2).enumerate() {
            match relation(pair[0], pair[1]) {
                DayRelation::SameDay => {
                    if idx == 0 {
                        streak += 1;
                    }
                }
                DayRelation::ConsecutiveDays => streak += 1,
                DayRelation::NonConsecutiveDays => {
                    longest = longest.max(streak);
                    streak = 0;
                }
            }
        }
        longest.max(streak)
    }

    /// Full statistics snapshot for one user's records
    pub fn compute_statistics(&self, records: &[SessionRecord], now_ms: i64) -> UserStatistics {
        if records.is_empty() {
            return UserStatistics::empty();
        }

        let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp_ms).collect();
        let cumulated_time_ms = records
            .iter()
            .fold(0u64, |total, r| total.saturating_add(r.duration_ms));

        UserStatistics {
            total_sessions: records.len(),
            cumulated_time_ms,
            average_session_length_ms: cumulated_time_ms / records.len() as u64,
            current_streak_days: self.current_streak(&timestamps, now_ms),
            longest_streak_days: self.longest_streak(&timestamps, now_ms),
            average_sessions_per_week: average_sessions_per_week(&timestamps, now_ms),
        }
    }
}

fn relation(a: NaiveDate, b: NaiveDate) -> DayRelation {
    match (a - b).num_days().abs() {
        0 => DayRelation::SameDay,
        1 => DayRelation::ConsecutiveDays,
        _ => DayRelation::NonConsecutiveDays,
    }
}

/// Sessions per week since the first recorded session
///
/// With less than a week of history the raw session count is returned.
/// Otherwise the average is rounded to two decimals and whole numbers are
/// rendered without a fractional part.
pub fn average_sessions_per_week(timestamps: &[i64], now_ms: i64) -> String {
    let Some(&first) = timestamps.iter().min() else {
        return "0".into();
    };

    let elapsed_weeks = now_ms.saturating_sub(first) as f64 / WEEK_MS as f64;
    if elapsed_weeks < 1.0 {
        return timestamps.len().to_string();
    }

    let average = (timestamps.len() as f64 / elapsed_weeks * 100.0).round() / 100.0;
    if average.fract() == 0.0 {
        format!("{}", average as i64)
    } else {
        format!("{}", average)
    }
}

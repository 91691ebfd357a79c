//! Streak and completion statistics derived from a habit's completion set.
//!
//! Everything here is a pure function of the completion set and a reference
//! day. Entry points without an explicit day use the current local date.
//! Malformed day-keys never match a computed key, so they are ignored rather
//! than reported.

use crate::date::{days_between, format_date, parse_day_key, previous_day, today, trailing_days};
use crate::types::Habit;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeSet;

/// Default bound on the backward walk in [`current_streak`].
pub const DEFAULT_MAX_WALK_DAYS: u32 = 1000;

/// Tunables for streak computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakConfig {
    /// Upper bound on days visited when walking back from the anchor day.
    pub max_walk_days: u32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            max_walk_days: DEFAULT_MAX_WALK_DAYS,
        }
    }
}

impl StreakConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the walk bound.
    pub fn max_walk_days(mut self, days: u32) -> Self {
        self.max_walk_days = days;
        self
    }
}

/// Completion within a trailing window of days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowedCompletion {
    /// Days in the window present in the completion set.
    pub completed_count: u32,
    /// `completed_count / window_days`, 0 for an empty window.
    pub rate: f64,
}

/// Per-habit statistics, as listed in [`OverallStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStats {
    /// Position of the habit in the input sequence
    pub index: usize,
    pub name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub window: WindowedCompletion,
}

/// Statistics across all habits for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub window_days: u32,
    /// `habits × window_days`
    pub possible: u64,
    /// Sum of per-habit completed counts
    pub actual: u64,
    pub rate: f64,
    /// Highest window rate first; ties keep input order
    pub habits: Vec<HabitStats>,
}

/// One cell of the recent-days strip on a habit card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridDay {
    pub day_key: String,
    /// Single-letter weekday label
    pub label: &'static str,
    pub completed: bool,
}

/// Current streak as of today.
pub fn current_streak(dates: &BTreeSet<String>) -> u32 {
    current_streak_on(dates, today(), &StreakConfig::default())
}

/// Consecutive completed days counting back from `today`.
///
/// The walk starts at `today` when it is completed and at the day before
/// otherwise, so an unmarked today does not break a streak still alive from
/// yesterday. At most `config.max_walk_days` days are visited.
pub fn current_streak_on(dates: &BTreeSet<String>, today: NaiveDate, config: &StreakConfig) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let anchor = if dates.contains(&format_date(today)) {
        Some(today)
    } else {
        previous_day(today)
    };

    let mut streak = 0;
    let mut cursor = anchor;
    for _ in 0..config.max_walk_days {
        let Some(day) = cursor else {
            break;
        };
        if !dates.contains(&format_date(day)) {
            break;
        }
        streak += 1;
        cursor = previous_day(day);
    }

    streak
}

/// Longest run of consecutive completed days over all time.
pub fn longest_streak(dates: &BTreeSet<String>) -> u32 {
    // BTreeSet is already sorted and distinct; keys sort chronologically.
    let mut days = dates.iter().filter_map(|key| parse_day_key(key));

    let Some(mut prev) = days.next() else {
        return 0;
    };

    let mut longest = 1;
    let mut run = 1;
    for day in days {
        if days_between(prev, day) == 1 {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
        prev = day;
    }

    longest.max(run)
}

/// Completion over the `window_days` days ending at `reference` inclusive.
pub fn windowed_completion(dates: &BTreeSet<String>, window_days: u32, reference: NaiveDate) -> WindowedCompletion {
    if window_days == 0 {
        return WindowedCompletion {
            completed_count: 0,
            rate: 0.0,
        };
    }

    // Count stored days inside the window rather than walking every window day
    let completed_count = dates
        .iter()
        .filter_map(|key| parse_day_key(key))
        .filter(|day| (0..i64::from(window_days)).contains(&days_between(*day, reference)))
        .count() as u32;

    WindowedCompletion {
        completed_count,
        rate: completed_count as f64 / window_days as f64,
    }
}

/// Statistics over all habits for the window ending at `reference`.
pub fn aggregate_stats(habits: &[Habit], window_days: u32, reference: NaiveDate) -> OverallStats {
    aggregate_stats_with(habits, window_days, reference, &StreakConfig::default())
}

/// [`aggregate_stats`] with an explicit streak config.
pub fn aggregate_stats_with(
    habits: &[Habit],
    window_days: u32,
    reference: NaiveDate,
    config: &StreakConfig,
) -> OverallStats {
    let mut per_habit: Vec<HabitStats> = habits
        .iter()
        .enumerate()
        .map(|(index, habit)| HabitStats {
            index,
            name: habit.name.clone(),
            current_streak: current_streak_on(&habit.completed_dates, reference, config),
            longest_streak: longest_streak(&habit.completed_dates),
            window: windowed_completion(&habit.completed_dates, window_days, reference),
        })
        .collect();

    // sort_by is stable, equal rates keep input order
    per_habit.sort_by(|a, b| b.window.rate.total_cmp(&a.window.rate));

    let possible = habits.len() as u64 * window_days as u64;
    let actual: u64 = per_habit.iter().map(|s| s.window.completed_count as u64).sum();
    let rate = if possible == 0 {
        0.0
    } else {
        actual as f64 / possible as f64
    };

    log::debug!(
        "aggregate_stats: habits={} window_days={} actual={} possible={}",
        habits.len(),
        window_days,
        actual,
        possible
    );

    OverallStats {
        window_days,
        possible,
        actual,
        rate,
        habits: per_habit,
    }
}

/// The last `days` days ending at `reference`, oldest first, with completion flags.
pub fn week_grid(dates: &BTreeSet<String>, reference: NaiveDate, days: u32) -> Vec<GridDay> {
    trailing_days(reference, days)
        .into_iter()
        .map(|day| {
            let day_key = format_date(day);
            GridDay {
                completed: dates.contains(&day_key),
                label: weekday_letter(day.weekday()),
                day_key,
            }
        })
        .collect()
}

fn weekday_letter(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun | Weekday::Sat => "S",
        Weekday::Mon => "M",
        Weekday::Tue | Weekday::Thu => "T",
        Weekday::Wed => "W",
        Weekday::Fri => "F",
    }
}

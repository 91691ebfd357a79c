//! Habitual: habit tracking with streak statistics.
//!
//! Habits live in a [`HabitStore`] persisted through a key-value [`Backend`].
//! The [`streak`] functions derive current/longest streaks and windowed
//! completion rates from a habit's set of completed day-keys, and [`App`]
//! ties both together behind a single intent dispatcher for a view layer.
//!
//! # Example
//!
//! ```
//! use habitual::{HabitStore, MemoryBackend, longest_streak};
//!
//! let mut store = HabitStore::open(MemoryBackend::new());
//! store.create("Read", "20 pages", "#4caf50").unwrap();
//!
//! for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-10"] {
//!     store.toggle_date(0, day).unwrap();
//! }
//!
//! assert_eq!(longest_streak(&store.habits()[0].completed_dates), 3);
//! ```

mod app;
mod config;
mod intent;
mod storage;
mod store;
mod types;

pub mod date;
pub mod streak;

// Re-export public API
pub use app::{App, Editor, HabitCard, NO_DESCRIPTION, Update, ViewModel, is_user_error};
pub use config::{Config, default_config_path};
pub use date::{format_date, parse_day_key, today_key};
pub use intent::{Change, Intent};
pub use storage::{Backend, BackendKind, JsonFileBackend, MemoryBackend, SqliteBackend, open_backend};
pub use store::{HABITS_KEY, HabitStore, StoreError, load, save};
pub use streak::{
    GridDay, HabitStats, OverallStats, StreakConfig, WindowedCompletion, aggregate_stats, current_streak,
    longest_streak, windowed_completion,
};
pub use types::{DEFAULT_COLOR, Habit, HabitUpdate, ValidationError};

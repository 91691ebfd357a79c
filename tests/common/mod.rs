//! Shared test infrastructure for Habitual integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use habitual::{Habit, HabitStore, JsonFileBackend, format_date};
use std::collections::BTreeSet;
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: HabitStore<JsonFileBackend>,
}

impl TestEnv {
    /// Create a new test environment with an empty JSON-file store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backend = JsonFileBackend::open(temp_dir.path()).expect("Failed to open backend");
        let store = HabitStore::open(backend);
        Self { temp_dir, store }
    }

    /// Reopen the store from disk, as a fresh process would.
    pub fn reopen(&mut self) {
        let backend = JsonFileBackend::open(self.temp_dir.path()).expect("Failed to reopen backend");
        self.store = HabitStore::open(backend);
    }

    /// Create a habit with default description and color.
    pub fn create_habit(&mut self, name: &str) -> Habit {
        self.store
            .create(name, "", habitual::DEFAULT_COLOR)
            .expect("Failed to create habit")
    }

    /// Mark each day as completed on the habit at `index`.
    pub fn complete_days(&mut self, index: usize, days: &[NaiveDate]) {
        for day in days {
            let completed = self
                .store
                .toggle_date(index, &format_date(*day))
                .expect("Failed to toggle day");
            assert!(completed, "day {} was already completed", day);
        }
    }

    /// Assert the stored document matches the in-memory collection.
    pub fn assert_persisted(&self) {
        let backend = JsonFileBackend::open(self.temp_dir.path()).expect("Failed to open backend");
        assert_eq!(habitual::load(&backend), self.store.habits());
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// `count` consecutive days ending at `end`, newest first.
pub fn days_ending(end: NaiveDate, count: i64) -> Vec<NaiveDate> {
    (0..count).map(|i| end - Duration::days(i)).collect()
}

/// Day-key set from dates.
pub fn key_set(days: &[NaiveDate]) -> BTreeSet<String> {
    days.iter().map(|d| format_date(*d)).collect()
}

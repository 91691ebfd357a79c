//! High-level habit store API.

use crate::date::is_day_key;
use crate::storage::Backend;
use crate::types::{Habit, HabitUpdate, ValidationError, validate_name};
use eyre::{Context, Result};

/// Storage key holding the serialized habit collection.
pub const HABITS_KEY: &str = "habits";

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No habit at this index.
    IndexOutOfRange { index: usize, len: usize },
    /// Day-key is not canonical `YYYY-MM-DD`.
    InvalidDayKey(String),
    /// Validation error.
    Validation(ValidationError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IndexOutOfRange { index, len } => {
                write!(f, "no habit at index {} (have {})", index, len)
            }
            StoreError::InvalidDayKey(key) => write!(f, "invalid day '{}': expected YYYY-MM-DD", key),
            StoreError::Validation(e) => write!(f, "validation error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// The habit collection and the backend it persists to.
pub struct HabitStore<B: Backend> {
    backend: B,
    habits: Vec<Habit>,
}

impl<B: Backend> HabitStore<B> {
    /// Open a store, loading whatever the backend holds.
    pub fn open(backend: B) -> Self {
        let habits = load(&backend);
        log::info!("Opened habit store with {} habit(s)", habits.len());
        Self { backend, habits }
    }

    /// All habits in display order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Get a habit by index.
    pub fn get(&self, index: usize) -> Option<&Habit> {
        self.habits.get(index)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persist the full collection.
    pub fn save(&mut self) -> Result<()> {
        save(&mut self.backend, &self.habits)
    }

    /// Create a new habit with no completions.
    pub fn create(&mut self, name: &str, description: &str, color: &str) -> Result<Habit> {
        validate_name(name.trim()).map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;
        let habit = Habit::new(name.trim(), description.trim(), color.trim());

        // Validate before persisting
        habit.validate().map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;

        self.habits.push(habit.clone());
        if let Err(e) = self.save() {
            self.habits.pop();
            return Err(e).context("Failed to persist new habit");
        }

        log::info!("Created habit '{}' at index {}", habit.name, self.habits.len() - 1);
        Ok(habit)
    }

    /// Update a habit's name, description or color.
    pub fn update(&mut self, index: usize, update: HabitUpdate) -> Result<Habit> {
        let existing = self.habit_at(index)?.clone();

        let mut updated = existing.clone();
        if let Some(name) = update.name {
            validate_name(name.trim()).map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;
            updated.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            updated.description = description.trim().to_string();
        }
        if let Some(color) = update.color {
            updated.color = color.trim().to_string();
        }

        // Validate before persisting
        updated.validate().map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;

        self.habits[index] = updated.clone();
        if let Err(e) = self.save() {
            self.habits[index] = existing;
            return Err(e).context("Failed to persist updated habit");
        }

        log::info!("Updated habit at index {}", index);
        Ok(updated)
    }

    /// Delete a habit, shifting later habits down by one.
    pub fn delete(&mut self, index: usize) -> Result<Habit> {
        self.habit_at(index)?;

        let removed = self.habits.remove(index);
        if let Err(e) = self.save() {
            self.habits.insert(index, removed);
            return Err(e).context("Failed to persist deletion");
        }

        log::info!("Deleted habit '{}' from index {}", removed.name, index);
        Ok(removed)
    }

    /// Flip completion of `day_key`. Returns whether the day is now completed.
    pub fn toggle_date(&mut self, index: usize, day_key: &str) -> Result<bool> {
        if !is_day_key(day_key) {
            return Err(eyre::eyre!(StoreError::InvalidDayKey(day_key.to_string())));
        }
        self.habit_at(index)?;

        let completed = flip(&mut self.habits[index], day_key);
        if let Err(e) = self.save() {
            flip(&mut self.habits[index], day_key);
            return Err(e).context("Failed to persist toggled day");
        }

        log::debug!("Toggled {} on habit {}: completed={}", day_key, index, completed);
        Ok(completed)
    }

    fn habit_at(&self, index: usize) -> Result<&Habit> {
        self.habits.get(index).ok_or_else(|| {
            eyre::eyre!(StoreError::IndexOutOfRange {
                index,
                len: self.habits.len()
            })
        })
    }
}

fn flip(habit: &mut Habit, day_key: &str) -> bool {
    if habit.completed_dates.remove(day_key) {
        false
    } else {
        habit.completed_dates.insert(day_key.to_string());
        true
    }
}

/// Read the habit collection from a backend.
///
/// Never fails: a missing key, unreadable storage, a document that is not a
/// list of habits, or a habit with a blank name, blank color or malformed
/// day-key all yield an empty collection.
pub fn load<B: Backend + ?Sized>(backend: &B) -> Vec<Habit> {
    let raw = match backend.get(HABITS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("Failed to read stored habits, starting empty: {:#}", e);
            return Vec::new();
        }
    };

    let habits: Vec<Habit> = match serde_json::from_str(&raw) {
        Ok(habits) => habits,
        Err(e) => {
            log::warn!("Stored habits are malformed, starting empty: {}", e);
            return Vec::new();
        }
    };

    if let Some((index, err)) = habits
        .iter()
        .enumerate()
        .find_map(|(i, h)| h.validate().err().map(|e| (i, e)))
    {
        log::warn!("Stored habit {} is invalid ({}), starting empty", index, err);
        return Vec::new();
    }

    habits
}

/// Write the habit collection to a backend.
pub fn save<B: Backend + ?Sized>(backend: &mut B, habits: &[Habit]) -> Result<()> {
    let json = serde_json::to_string(habits).context("Failed to serialize habits")?;
    backend.set(HABITS_KEY, &json).context("Failed to write habits")?;
    Ok(())
}

//! Core data types for habits.

use crate::date::is_day_key;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Color given to new habits when none is chosen.
pub const DEFAULT_COLOR: &str = "#4caf50";

/// Maximum length in characters for a name entered by the user.
pub const MAX_NAME_CHARS: usize = 500;

/// A tracked habit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Short label shown on the habit card
    pub name: String,

    /// Free text, empty when absent
    #[serde(default)]
    pub description: String,

    /// Color identifier, only meaningful to the view
    pub color: String,

    /// Day-keys on which the habit was completed
    #[serde(default)]
    pub completed_dates: BTreeSet<String>,

    /// When created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a habit with no completions.
    pub fn new(name: impl Into<String>, description: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: color.into(),
            completed_dates: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether the habit is marked complete on `day_key`.
    pub fn is_completed(&self, day_key: &str) -> bool {
        self.completed_dates.contains(day_key)
    }

    /// Check the fields every stored habit must satisfy.
    ///
    /// Input rules such as [`MAX_NAME_CHARS`] are applied by [`validate_name`]
    /// when a name is entered, not here, so older stored data still loads.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        validate_color(&self.color)?;

        for key in &self.completed_dates {
            if !is_day_key(key) {
                return Err(ValidationError::InvalidDayKey(key.clone()));
            }
        }

        Ok(())
    }
}

/// Partial edit of a habit's user-facing fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl HabitUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Validation errors for habits.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong,
    InvalidCharacters,
    EmptyColor,
    InvalidDayKey(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "name cannot be empty"),
            ValidationError::NameTooLong => write!(f, "name exceeds {} characters", MAX_NAME_CHARS),
            ValidationError::InvalidCharacters => write!(f, "name contains control characters"),
            ValidationError::EmptyColor => write!(f, "color cannot be empty"),
            ValidationError::InvalidDayKey(key) => {
                write!(f, "invalid day '{}': expected YYYY-MM-DD", key)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a habit name as entered by the user (already trimmed).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    if color.trim().is_empty() {
        return Err(ValidationError::EmptyColor);
    }
    Ok(())
}

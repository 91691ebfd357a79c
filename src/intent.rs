//! User intents and the changes they produce.

use serde::{Deserialize, Serialize};

/// A discrete user action handed to [`crate::App::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Intent {
    /// Open the editor for a new habit.
    OpenNew,

    /// Open the editor on an existing habit.
    OpenEdit { index: usize },

    /// Close the editor without saving.
    CloseEditor,

    /// Save the editor contents: update when editing, create otherwise.
    Submit {
        name: String,
        #[serde(default)]
        description: String,
        color: Option<String>,
    },

    /// Flip completion of one day.
    ToggleDate { index: usize, day_key: String },

    /// Delete a habit.
    Delete { index: usize },

    /// Re-render without changing anything.
    Refresh,
}

/// Something that changed while handling an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Change {
    HabitCreated { index: usize },
    HabitUpdated { index: usize },
    HabitDeleted { index: usize },
    DateToggled { index: usize, day_key: String, completed: bool },
    EditorOpened,
    EditorClosed,
}

impl Change {
    /// Whether the stored habit collection changed.
    pub fn touches_store(&self) -> bool {
        matches!(
            self,
            Change::HabitCreated { .. }
                | Change::HabitUpdated { .. }
                | Change::HabitDeleted { .. }
                | Change::DateToggled { .. }
        )
    }
}

//! Application state and the single intent dispatcher.
//!
//! The view layer owns an [`App`], turns user input into [`Intent`]s and
//! renders the [`ViewModel`] returned from [`App::dispatch`]. Store mutations
//! are committed before the view model is built, so what the view renders is
//! always the latest persisted state.

use crate::config::Config;
use crate::date::{header_date, today};
use crate::intent::{Change, Intent};
use crate::storage::Backend;
use crate::store::{HabitStore, StoreError};
use crate::streak::{GridDay, StreakConfig, current_streak_on, longest_streak, week_grid};
use crate::types::HabitUpdate;
use chrono::NaiveDate;
use eyre::Result;
use serde::Serialize;

/// Placeholder shown for habits without a description.
pub const NO_DESCRIPTION: &str = "No description";

/// State of the habit editor form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Editor {
    #[default]
    Closed,
    New,
    Editing { index: usize },
}

/// One rendered habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitCard {
    pub index: usize,
    pub name: String,
    /// Description, or [`NO_DESCRIPTION`]
    pub description: String,
    pub color: String,
    pub grid: Vec<GridDay>,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Everything the view needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Date line, e.g. "October 15"
    pub header: String,
    pub cards: Vec<HabitCard>,
    pub editor: Editor,
}

impl ViewModel {
    /// Whether there are no habits to show.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Result of dispatching one intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    pub changes: Vec<Change>,
    pub view: ViewModel,
}

/// Application state: the habit store plus editor state.
pub struct App<B: Backend> {
    store: HabitStore<B>,
    editor: Editor,
    grid_days: u32,
    default_color: String,
    streak: StreakConfig,
}

impl<B: Backend> App<B> {
    /// Build an app over an opened store.
    pub fn new(store: HabitStore<B>, config: &Config) -> Self {
        Self {
            store,
            editor: Editor::Closed,
            grid_days: config.grid_days,
            default_color: config.default_color.clone(),
            streak: config.streak(),
        }
    }

    pub fn store(&self) -> &HabitStore<B> {
        &self.store
    }

    pub fn editor(&self) -> Editor {
        self.editor
    }

    /// Handle an intent against today's date.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Update> {
        self.dispatch_on(intent, today())
    }

    /// Handle an intent, rendering relative to `today`.
    pub fn dispatch_on(&mut self, intent: Intent, today: NaiveDate) -> Result<Update> {
        log::debug!("dispatch: {:?}", intent);
        let changes = self.apply(intent)?;
        Ok(Update {
            changes,
            view: self.render_on(today),
        })
    }

    fn apply(&mut self, intent: Intent) -> Result<Vec<Change>> {
        let changes = match intent {
            Intent::OpenNew => {
                self.editor = Editor::New;
                vec![Change::EditorOpened]
            }

            Intent::OpenEdit { index } => {
                if self.store.get(index).is_none() {
                    return Err(eyre::eyre!(StoreError::IndexOutOfRange {
                        index,
                        len: self.store.len()
                    }));
                }
                self.editor = Editor::Editing { index };
                vec![Change::EditorOpened]
            }

            Intent::CloseEditor => self.close_editor(),

            Intent::Submit {
                name,
                description,
                color,
            } => {
                // An empty name leaves the form open and changes nothing
                if name.trim().is_empty() {
                    return Ok(Vec::new());
                }
                let mut changes = match self.editor {
                    Editor::Editing { index } => {
                        let mut update = HabitUpdate::new().name(name).description(description);
                        if let Some(color) = color {
                            update = update.color(color);
                        }
                        self.store.update(index, update)?;
                        vec![Change::HabitUpdated { index }]
                    }
                    Editor::New | Editor::Closed => {
                        let color = color.unwrap_or_else(|| self.default_color.clone());
                        self.store.create(&name, &description, &color)?;
                        vec![Change::HabitCreated {
                            index: self.store.len() - 1,
                        }]
                    }
                };
                changes.extend(self.close_editor());
                changes
            }

            Intent::ToggleDate { index, day_key } => {
                let completed = self.store.toggle_date(index, &day_key)?;
                vec![Change::DateToggled {
                    index,
                    day_key,
                    completed,
                }]
            }

            Intent::Delete { index } => {
                self.store.delete(index)?;
                let mut changes = vec![Change::HabitDeleted { index }];
                // The edited habit is gone or has shifted down
                match self.editor {
                    Editor::Editing { index: editing } if editing == index => {
                        changes.extend(self.close_editor());
                    }
                    Editor::Editing { index: editing } if editing > index => {
                        self.editor = Editor::Editing { index: editing - 1 };
                    }
                    _ => {}
                }
                changes
            }

            Intent::Refresh => Vec::new(),
        };

        Ok(changes)
    }

    fn close_editor(&mut self) -> Vec<Change> {
        if self.editor == Editor::Closed {
            return Vec::new();
        }
        self.editor = Editor::Closed;
        vec![Change::EditorClosed]
    }

    /// Build the view model for `today` from committed store state.
    pub fn render_on(&self, today: NaiveDate) -> ViewModel {
        let cards = self
            .store
            .habits()
            .iter()
            .enumerate()
            .map(|(index, habit)| HabitCard {
                index,
                name: habit.name.clone(),
                description: if habit.description.is_empty() {
                    NO_DESCRIPTION.to_string()
                } else {
                    habit.description.clone()
                },
                color: habit.color.clone(),
                grid: week_grid(&habit.completed_dates, today, self.grid_days),
                current_streak: current_streak_on(&habit.completed_dates, today, &self.streak),
                longest_streak: longest_streak(&habit.completed_dates),
            })
            .collect();

        ViewModel {
            header: header_date(today),
            cards,
            editor: self.editor,
        }
    }
}

/// Whether an error from [`App::dispatch`] is a user-input problem rather than I/O.
pub fn is_user_error(report: &eyre::Report) -> bool {
    report.downcast_ref::<StoreError>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use crate::store::load;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_app() -> App<MemoryBackend> {
        App::new(HabitStore::open(MemoryBackend::new()), &Config::default())
    }

    fn submit(name: &str) -> Intent {
        Intent::Submit {
            name: name.to_string(),
            description: String::new(),
            color: None,
        }
    }

    #[test]
    fn test_create_flow() {
        let mut app = setup_app();
        let day = ymd(2024, 5, 10);

        let opened = app.dispatch_on(Intent::OpenNew, day).unwrap();
        assert_eq!(opened.changes, vec![Change::EditorOpened]);
        assert_eq!(opened.view.editor, Editor::New);

        let saved = app.dispatch_on(submit("Stretch"), day).unwrap();
        assert_eq!(
            saved.changes,
            vec![Change::HabitCreated { index: 0 }, Change::EditorClosed]
        );
        assert_eq!(saved.view.editor, Editor::Closed);
        assert_eq!(saved.view.cards.len(), 1);
        assert_eq!(saved.view.cards[0].description, NO_DESCRIPTION);
        assert_eq!(saved.view.cards[0].color, "#4caf50");
        assert_eq!(saved.view.header, "May 10");
    }

    #[test]
    fn test_submit_empty_name_is_noop() {
        let mut app = setup_app();
        app.dispatch_on(Intent::OpenNew, ymd(2024, 5, 10)).unwrap();

        let update = app.dispatch_on(submit("   "), ymd(2024, 5, 10)).unwrap();

        assert!(update.changes.is_empty());
        assert!(update.view.is_empty());
        assert_eq!(update.view.editor, Editor::New);
    }

    #[test]
    fn test_edit_flow() {
        let mut app = setup_app();
        let day = ymd(2024, 5, 10);
        app.dispatch_on(submit("Read"), day).unwrap();

        app.dispatch_on(Intent::OpenEdit { index: 0 }, day).unwrap();
        let update = app
            .dispatch_on(
                Intent::Submit {
                    name: "Read more".to_string(),
                    description: "Two chapters".to_string(),
                    color: Some("#ff9800".to_string()),
                },
                day,
            )
            .unwrap();

        assert_eq!(
            update.changes,
            vec![Change::HabitUpdated { index: 0 }, Change::EditorClosed]
        );
        let card = &update.view.cards[0];
        assert_eq!(card.name, "Read more");
        assert_eq!(card.description, "Two chapters");
        assert_eq!(card.color, "#ff9800");
    }

    #[test]
    fn test_open_edit_out_of_range() {
        let mut app = setup_app();
        assert!(app.dispatch_on(Intent::OpenEdit { index: 0 }, ymd(2024, 5, 10)).is_err());
        assert_eq!(app.editor(), Editor::Closed);
    }

    #[test]
    fn test_toggle_renders_committed_state() {
        let mut app = setup_app();
        let day = ymd(2024, 5, 10);
        app.dispatch_on(submit("Walk"), day).unwrap();

        for key in ["2024-05-09", "2024-05-10"] {
            app.dispatch_on(
                Intent::ToggleDate {
                    index: 0,
                    day_key: key.to_string(),
                },
                day,
            )
            .unwrap();
        }
        let update = app.dispatch_on(Intent::Refresh, day).unwrap();

        let card = &update.view.cards[0];
        assert_eq!(card.current_streak, 2);
        assert_eq!(card.longest_streak, 2);
        assert_eq!(card.grid.len(), 7);
        assert!(card.grid[6].completed);
        assert!(card.grid[5].completed);
        assert!(!card.grid[4].completed);

        // What the view shows is what storage holds
        let stored = load(app.store().backend());
        assert_eq!(stored[0].completed_dates.len(), 2);
    }

    #[test]
    fn test_delete_adjusts_editor() {
        let mut app = setup_app();
        let day = ymd(2024, 5, 10);
        for name in ["A", "B", "C"] {
            app.dispatch_on(submit(name), day).unwrap();
        }

        app.dispatch_on(Intent::OpenEdit { index: 2 }, day).unwrap();
        let update = app.dispatch_on(Intent::Delete { index: 0 }, day).unwrap();
        assert_eq!(update.changes, vec![Change::HabitDeleted { index: 0 }]);
        assert_eq!(app.editor(), Editor::Editing { index: 1 });
        assert_eq!(update.view.cards[1].name, "C");

        let update = app.dispatch_on(Intent::Delete { index: 1 }, day).unwrap();
        assert_eq!(
            update.changes,
            vec![Change::HabitDeleted { index: 1 }, Change::EditorClosed]
        );
        assert_eq!(update.view.cards.len(), 1);
    }

    #[test]
    fn test_failed_intent_reports_user_error() {
        let mut app = setup_app();
        let err = app
            .dispatch_on(
                Intent::ToggleDate {
                    index: 4,
                    day_key: "2024-05-10".to_string(),
                },
                ymd(2024, 5, 10),
            )
            .unwrap_err();
        assert!(is_user_error(&err));
    }
}

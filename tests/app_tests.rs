//! Integration tests for intent dispatch over a persisted store.

mod common;

use common::{TestEnv, ymd};
use habitual::{App, Change, Config, Editor, HabitStore, Intent, JsonFileBackend, NO_DESCRIPTION};

fn open_app(env: &TestEnv, config: &Config) -> App<JsonFileBackend> {
    let backend = JsonFileBackend::open(env.temp_dir.path()).expect("Failed to open backend");
    App::new(HabitStore::open(backend), config)
}

#[test]
fn test_intents_from_json() {
    let env = TestEnv::new();
    let mut app = open_app(&env, &Config::default());
    let day = ymd(2024, 9, 2);

    let script = [
        r#"{"type":"OpenNew"}"#,
        r##"{"type":"Submit","name":"Practice piano","description":"Scales","color":"#ff9800"}"##,
        r#"{"type":"ToggleDate","index":0,"day_key":"2024-09-01"}"#,
        r#"{"type":"ToggleDate","index":0,"day_key":"2024-09-02"}"#,
    ];

    let mut last = None;
    for line in script {
        let intent: Intent = serde_json::from_str(line).expect("valid intent");
        last = Some(app.dispatch_on(intent, day).expect("dispatch"));
    }

    let update = last.unwrap();
    assert_eq!(
        update.changes,
        vec![Change::DateToggled {
            index: 0,
            day_key: "2024-09-02".to_string(),
            completed: true,
        }]
    );
    assert_eq!(update.view.header, "September 2");
    assert_eq!(update.view.cards[0].current_streak, 2);
    assert_eq!(update.view.editor, Editor::Closed);
}

#[test]
fn test_view_matches_reopened_store() {
    let env = TestEnv::new();
    let day = ymd(2024, 9, 2);
    let config = Config::default();

    let view = {
        let mut app = open_app(&env, &config);
        app.dispatch_on(
            Intent::Submit {
                name: "Walk".to_string(),
                description: String::new(),
                color: None,
            },
            day,
        )
        .unwrap();
        app.dispatch_on(
            Intent::ToggleDate {
                index: 0,
                day_key: "2024-09-01".to_string(),
            },
            day,
        )
        .unwrap()
        .view
    };

    // A second app over the same files renders the same frame
    let app = open_app(&env, &config);
    assert_eq!(app.render_on(day), view);
    assert_eq!(view.cards[0].description, NO_DESCRIPTION);
}

#[test]
fn test_grid_size_from_config() {
    let env = TestEnv::new();
    let config = Config::new().grid_days(14);
    let mut app = open_app(&env, &config);

    let update = app
        .dispatch_on(
            Intent::Submit {
                name: "Walk".to_string(),
                description: String::new(),
                color: None,
            },
            ymd(2024, 9, 2),
        )
        .unwrap();

    assert_eq!(update.view.cards[0].grid.len(), 14);
    assert_eq!(update.view.cards[0].grid[0].day_key, "2024-08-20");
}

#[test]
fn test_failed_intent_leaves_state_untouched() {
    let env = TestEnv::new();
    let mut app = open_app(&env, &Config::default());
    let day = ymd(2024, 9, 2);

    assert!(app.dispatch_on(Intent::Delete { index: 0 }, day).is_err());
    assert!(
        app.dispatch_on(
            Intent::ToggleDate {
                index: 0,
                day_key: "2024-09-02".to_string()
            },
            day
        )
        .is_err()
    );

    let view = app.dispatch_on(Intent::Refresh, day).unwrap().view;
    assert!(view.is_empty());
}

#[test]
fn test_blank_name_while_editing_changes_nothing() {
    let env = TestEnv::new();
    let mut app = open_app(&env, &Config::default());
    let day = ymd(2024, 9, 2);

    app.dispatch_on(
        Intent::Submit {
            name: "Read".to_string(),
            description: String::new(),
            color: None,
        },
        day,
    )
    .unwrap();
    app.dispatch_on(Intent::OpenEdit { index: 0 }, day).unwrap();

    let update = app
        .dispatch_on(
            Intent::Submit {
                name: "  ".to_string(),
                description: "new".to_string(),
                color: Some("#2196f3".to_string()),
            },
            day,
        )
        .unwrap();

    assert!(!update.changes.iter().any(Change::touches_store));
    assert_eq!(update.view.editor, Editor::Editing { index: 0 });
    assert_eq!(update.view.cards[0].description, NO_DESCRIPTION);
    assert_eq!(update.view.cards[0].color, "#4caf50");

    let reopened = open_app(&env, &Config::default());
    assert_eq!(reopened.store().habits()[0].name, "Read");
}

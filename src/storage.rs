//! Key-value storage backends: in-memory, JSON files, SQLite.

use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// SQLite database file.
const DB_FILE: &str = "habitual.db";

/// Extension for per-key files.
const JSON_EXT: &str = "json";

/// A string key-value store holding serialized documents.
pub trait Backend {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Which file-backed backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Json,
    Sqlite,
}

/// Open the backend of the given kind rooted at `dir`.
pub fn open_backend(kind: BackendKind, dir: &Path) -> Result<Box<dyn Backend>> {
    log::info!("Opening {:?} backend in {}", kind, dir.display());
    let backend: Box<dyn Backend> = match kind {
        BackendKind::Json => Box::new(JsonFileBackend::open(dir)?),
        BackendKind::Sqlite => Box::new(SqliteBackend::open(dir)?),
    };
    Ok(backend)
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Volatile backend, nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug)]
pub struct JsonFileBackend {
    root: PathBuf,
}

impl JsonFileBackend {
    /// Open the backend, creating the directory if needed.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).with_context(|| format!("Failed to create data directory {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, JSON_EXT))
    }
}

impl Backend for JsonFileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension(format!("{}.tmp", JSON_EXT));

        // Write aside then rename so readers never see a partial document
        let mut file = File::create(&tmp_path).with_context(|| format!("Failed to create {}", tmp_path.display()))?;
        file.write_all(value.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;

        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Key-value table in a SQLite database.
pub struct SqliteBackend {
    db: Connection,
}

impl SqliteBackend {
    /// Open (or create) `habitual.db` inside `root`.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).with_context(|| format!("Failed to create data directory {}", root.display()))?;
        let db = Connection::open(root.join(DB_FILE)).context("Failed to open SQLite database")?;
        Self::with_connection(db)
    }

    /// Backend over a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        Self::with_connection(db)
    }

    fn with_connection(db: Connection) -> Result<Self> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#,
        )
        .context("Failed to initialize schema")?;
        Ok(Self { db })
    }
}

impl Backend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read key '{}'", key))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                params![key, value],
            )
            .with_context(|| format!("Failed to write key '{}'", key))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db
            .execute("DELETE FROM kv WHERE key = ?", params![key])
            .with_context(|| format!("Failed to remove key '{}'", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(backend: &mut dyn Backend) {
        assert_eq!(backend.get("habits").unwrap(), None);

        backend.set("habits", "[]").unwrap();
        assert_eq!(backend.get("habits").unwrap().as_deref(), Some("[]"));

        backend.set("habits", "[1]").unwrap();
        assert_eq!(backend.get("habits").unwrap().as_deref(), Some("[1]"));

        backend.remove("habits").unwrap();
        assert_eq!(backend.get("habits").unwrap(), None);
        backend.remove("habits").unwrap();
    }

    #[test]
    fn test_memory_backend() {
        exercise(&mut MemoryBackend::new());
    }

    #[test]
    fn test_json_backend() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = JsonFileBackend::open(temp_dir.path()).unwrap();
        exercise(&mut backend);
    }

    #[test]
    fn test_json_backend_writes_key_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = JsonFileBackend::open(temp_dir.path()).unwrap();
        backend.set("habits", "[]").unwrap();

        assert!(temp_dir.path().join("habits.json").exists());
        assert!(!temp_dir.path().join("habits.json.tmp").exists());
    }

    #[test]
    fn test_json_backend_persists_across_open() {
        let temp_dir = TempDir::new().unwrap();
        JsonFileBackend::open(temp_dir.path()).unwrap().set("habits", "[]").unwrap();

        let reopened = JsonFileBackend::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.get("habits").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_sqlite_backend() {
        exercise(&mut SqliteBackend::in_memory().unwrap());
    }

    #[test]
    fn test_sqlite_backend_persists_across_open() {
        let temp_dir = TempDir::new().unwrap();
        SqliteBackend::open(temp_dir.path()).unwrap().set("habits", "[]").unwrap();

        assert!(temp_dir.path().join(DB_FILE).exists());
        let reopened = SqliteBackend::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.get("habits").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_open_backend_by_kind() {
        let temp_dir = TempDir::new().unwrap();
        let mut json = open_backend(BackendKind::Json, &temp_dir.path().join("json")).unwrap();
        exercise(&mut json);
        let mut sqlite = open_backend(BackendKind::Sqlite, &temp_dir.path().join("sqlite")).unwrap();
        exercise(&mut sqlite);
    }
}

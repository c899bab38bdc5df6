//! Persistence port for the task list.
//!
//! The task list never touches the filesystem directly. It is handed a
//! `TaskStorage` which is read once at startup and written in full after every
//! change. Unreadable or malformed content always loads as an empty list.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::task::Task;

/// Storage capability injected into the task list.
pub trait TaskStorage {
    /// Read the persisted tasks; absent or malformed data yields an empty list.
    fn load(&self) -> Vec<Task>;

    /// Replace the persisted tasks with `tasks`.
    fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError>;

    /// Human-readable location, used in logs and the UI header.
    fn describe(&self) -> String;
}

/// Decode a persisted blob, falling back to an empty list.
pub fn decode_tasks(raw: &str, source: &str) -> Vec<Task> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Task>>(raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(source, error = %e, "stored tasks are malformed, starting empty");
            Vec::new()
        }
    }
}

/// Tasks stored as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task file yet");
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(buf) => decode_tasks(&buf, &self.describe()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read task file, starting empty");
                Vec::new()
            }
        }
    }

    /// Atomic-ish write via temp file + rename.
    fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(tasks)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Session-only storage that keeps the serialized blob in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with raw persisted content.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        MemoryStorage { blob: Some(blob.into()) }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Vec<Task> {
        self.blob
            .as_deref()
            .map(|raw| decode_tasks(raw, "memory"))
            .unwrap_or_default()
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        self.blob = Some(serde_json::to_string(tasks)?);
        debug!(count = tasks.len(), "saved tasks in memory");
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory session".to_string()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::task::TaskId;

    fn task(id: u64, text: &str) -> Task {
        Task {
            id: TaskId(id),
            text: text.into(),
            date: None,
            priority: Default::default(),
            completed: false,
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonFileStorage::new(temp.path().join("tasks.json"));
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_file_round_trip_creates_parent_dir() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("nested").join("tasks.json");
        let mut storage = JsonFileStorage::new(&path);
        let tasks = vec![task(1, "a"), task(2, "b")];
        storage.save(&tasks).expect("save");
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(storage.load(), tasks);
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();
        assert!(JsonFileStorage::new(&path).load().is_empty());

        fs::write(&path, r#"{"text":"an object, not a list"}"#).unwrap();
        assert!(JsonFileStorage::new(&path).load().is_empty());
    }

    #[test]
    fn test_memory_storage_decodes_like_file_storage() {
        assert!(MemoryStorage::new().load().is_empty());
        assert!(MemoryStorage::with_blob("null").load().is_empty());
        let legacy = MemoryStorage::with_blob(r#"[{"text":"walk dog","completed":false}]"#);
        let loaded = legacy.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "walk dog");
    }
}

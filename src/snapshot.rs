// Whole-state snapshot file: { "todoList": [Task, ...] }

use crate::clock::Clock;
use crate::models::Task;
use crate::store::TodoStore;
use eyre::{Context, Result, eyre};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default snapshot filename inside the data directory
pub const SNAPSHOT_FILE: &str = "todos.json";

/// Persisted state shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub todo_list: Vec<Task>,
}

/// Read a snapshot; a missing file is an empty list
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        debug!(file = ?path, "No snapshot yet, starting empty");
        return Ok(Snapshot::default());
    }

    let content = fs::read_to_string(path).context("Failed to read snapshot")?;
    let snapshot: Snapshot = serde_json::from_str(&content).context("Failed to parse snapshot")?;

    info!(file = ?path, count = snapshot.todo_list.len(), "Loaded snapshot");
    Ok(snapshot)
}

/// Exclusive hold on a snapshot for a whole load-mutate-save cycle
///
/// Backed by an `fs2` lock on a sibling `.lock` file; released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
}

impl SnapshotLock {
    /// Block until no other process holds the lock for `path`
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_exclusive().context("Failed to acquire snapshot lock")?;
        debug!(file = ?path, "Acquired snapshot lock");
        Ok(Self { file })
    }

    /// Take the lock only if it is free right now
    pub fn try_acquire(path: &Path) -> Result<Option<Self>> {
        let file = open_lock_file(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e).context("Failed to acquire snapshot lock"),
        }
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        if let Err(e) = fs2::FileExt::unlock(&self.file) {
            warn!(error = ?e, "Failed to release snapshot lock");
        }
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    ensure_parent_dir(path)?;
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path.with_extension("lock"))
        .context("Failed to open snapshot lock file")
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre!("Snapshot path has no parent directory: {:?}", path))?;
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).context("Failed to create data directory")?;
    }
    Ok(())
}

/// Replace the snapshot at `path` with `snapshot`
///
/// Writes a sibling temp file, syncs it, then renames it over the target so
/// readers never observe a partial write. Callers that read, modify and write
/// back hold a [`SnapshotLock`] across the whole cycle.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    ensure_parent_dir(path)?;

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    {
        let mut file = File::create(&tmp_path).context("Failed to create temp snapshot")?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path).context("Failed to replace snapshot")?;

    debug!(file = ?path, count = snapshot.todo_list.len(), "Wrote snapshot");
    Ok(())
}

/// Restore a store from the snapshot at `path`
pub fn load(path: &Path) -> Result<TodoStore> {
    let snapshot = read_snapshot(path)?;
    Ok(TodoStore::from_tasks(snapshot.todo_list))
}

/// Save the whole collection of `store` to `path`
pub fn save<C: Clock>(path: &Path, store: &TodoStore<C>) -> Result<()> {
    let snapshot = Snapshot {
        todo_list: store.tasks().to_vec(),
    };
    write_snapshot(path, &snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = load(&temp.path().join(SNAPSHOT_FILE)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load_restores_collection() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(SNAPSHOT_FILE);
        let due = Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap();

        let mut store = TodoStore::new();
        let a = store.add("Pay rent", Priority::High, due);
        let b = store.add("Water plants", Priority::Low, due);
        store.complete(b);
        save(&path, &store).unwrap();

        let restored = load(&path).unwrap();
        assert_eq!(restored.tasks(), store.tasks());
        assert_eq!(restored.get(a).unwrap().name, "Pay rent");
        assert!(restored.get(b).unwrap().is_completed);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SNAPSHOT_FILE);

        let mut store = TodoStore::new();
        store.add("Call mom", Priority::Medium, Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap());
        save(&path, &store).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let list = value["todoList"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], "Call mom");
        assert_eq!(list[0]["priority"], 2);
        assert_eq!(list[0]["date"], "2026-11-01T09:00:00Z");
        assert_eq!(list[0]["isCompleted"], false);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SNAPSHOT_FILE);
        let due = Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap();

        let mut store = TodoStore::new();
        let id = store.add("Temporary", Priority::Low, due);
        save(&path, &store).unwrap();

        store.delete(id);
        save(&path, &store).unwrap();

        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_lock_excludes_second_holder_until_dropped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join(SNAPSHOT_FILE);

        let held = SnapshotLock::acquire(&path).unwrap();
        assert!(SnapshotLock::try_acquire(&path).unwrap().is_none());

        // Saving under the held lock must not block on it
        let mut store = TodoStore::new();
        store.add("Locked write", Priority::Low, Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap());
        save(&path, &store).unwrap();

        drop(held);
        assert!(SnapshotLock::try_acquire(&path).unwrap().is_some());
        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_snapshot_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SNAPSHOT_FILE);
        fs::write(&path, "{not json").unwrap();

        let err = read_snapshot(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse snapshot"));
    }

    #[test]
    fn test_empty_object_is_empty_list() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SNAPSHOT_FILE);
        fs::write(&path, "{}").unwrap();

        assert!(read_snapshot(&path).unwrap().todo_list.is_empty());
    }
}

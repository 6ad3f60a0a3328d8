//! JSON file persistence for project records.
//!
//! Every operation reads the whole file, changes it in memory and writes
//! the whole file back. Writers are serialized twice: a mutex covers the
//! threads of this process and an exclusive `fs2` lock on a sidecar
//! `.lock` file covers other processes pointed at the same store. The
//! file itself is replaced by atomic rename, so a reader never sees a
//! partial write.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use indexmap::IndexMap;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{ProjectError, ProjectResult};
use crate::record::ProjectRecord;

/// Owner id to record, in file order.
pub type ProjectMap = IndexMap<String, ProjectRecord>;

/// Project store backed by a single JSON file.
#[derive(Debug)]
pub struct ProjectStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ProjectStore {
    /// Create a store for `path`. Nothing is touched until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create or replace the record for `owner_id`.
    ///
    /// An existing record is overwritten, updates and all.
    pub fn add(&self, owner_id: &str, description: &str) -> ProjectResult<ProjectRecord> {
        self.modify(|projects| {
            let record = ProjectRecord::new(description);
            if projects.insert(owner_id.to_string(), record.clone()).is_some() {
                info!("Replaced existing project for {}", owner_id);
            }
            Ok(record)
        })
    }

    /// Append an update to an existing record.
    pub fn update(&self, owner_id: &str, text: &str) -> ProjectResult<ProjectRecord> {
        self.modify(|projects| {
            let record = projects
                .get_mut(owner_id)
                .ok_or_else(|| ProjectError::NotFound {
                    owner_id: owner_id.to_string(),
                })?;
            record.push_update(text);
            Ok(record.clone())
        })
    }

    /// All records in file order.
    pub fn list(&self) -> ProjectResult<ProjectMap> {
        let _guard = self.lock.lock();
        Ok(self.load())
    }

    fn modify<T, F>(&self, f: F) -> ProjectResult<T>
    where
        F: FnOnce(&mut ProjectMap) -> ProjectResult<T>,
    {
        let _guard = self.lock.lock();
        let lock_file = self.acquire_file_lock()?;

        let mut projects = self.load();
        let result = f(&mut projects);
        if result.is_ok() {
            self.save(&projects)?;
        }

        // Lock is released when the handle is dropped as well
        let _ = lock_file.unlock();
        result
    }

    /// Read the file. Absent or unreadable content yields an empty map.
    fn load(&self) -> ProjectMap {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return ProjectMap::new(),
            Err(e) => {
                warn!("Could not read project store {:?}, treating as empty: {}", self.path, e);
                return ProjectMap::new();
            }
        };

        if contents.trim().is_empty() {
            return ProjectMap::new();
        }

        match serde_json::from_str(&contents) {
            Ok(projects) => projects,
            Err(e) => {
                warn!("Project store {:?} is corrupted, treating as empty: {}", self.path, e);
                ProjectMap::new()
            }
        }
    }

    fn save(&self, projects: &ProjectMap) -> ProjectResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| ProjectError::io(&dir, e))?;

        let tmp = NamedTempFile::new_in(&dir).map_err(|e| ProjectError::io(&dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, projects)?;
            writer.flush().map_err(|e| ProjectError::io(tmp.path(), e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| ProjectError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| ProjectError::io(&self.path, e.error))?;

        debug!("Saved {} projects to {:?}", projects.len(), self.path);
        Ok(())
    }

    fn acquire_file_lock(&self) -> ProjectResult<File> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| ProjectError::io(&dir, e))?;

        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| ProjectError::io(&lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| ProjectError::io(&lock_path, e))?;
        Ok(file)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "projects.json".into());
        name.push(".lock");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> ProjectStore {
        ProjectStore::new(dir.path().join("projects.json"))
    }

    #[test]
    fn test_add_then_list() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add("U1", "Build a dashboard").unwrap();

        let projects = store.list().unwrap();
        assert_eq!(projects.len(), 1);
        let record = &projects["U1"];
        assert_eq!(record.description, "Build a dashboard");
        assert_eq!(record.tags, vec!["#DataViz"]);
        assert!(record.updates.is_empty());
    }

    #[test]
    fn test_update_unknown_owner() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.update("U2", "progress").unwrap_err();
        assert!(err.is_not_found());
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_merges_tags() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add("U1", "Build a dashboard").unwrap();
        let record = store.update("U1", "Added SQL support").unwrap();

        assert_eq!(record.updates, vec!["Added SQL support"]);
        assert_eq!(record.tags, vec!["#DataViz", "#Data"]);
        assert_eq!(store.list().unwrap()["U1"], record);
    }

    #[test]
    fn test_add_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add("U1", "First idea").unwrap();
        store.update("U1", "some progress").unwrap();
        store.add("U1", "Kubernetes operator").unwrap();

        let record = &store.list().unwrap()["U1"];
        assert_eq!(record.description, "Kubernetes operator");
        assert!(record.updates.is_empty());
        assert_eq!(record.tags, vec!["#Infra"]);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add("U1", "Image classifier with a CNN").unwrap();
        store.add("U2", "LLM eval harness").unwrap();
        store.update("U1", "exposed it over an API").unwrap();
        let before = store.list().unwrap();

        let reopened = store_in(&dir);
        let after = reopened.list().unwrap();
        assert_eq!(before, after);
        assert_eq!(after.keys().collect::<Vec<_>>(), vec!["U1", "U2"]);
    }

    #[test]
    fn test_file_layout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add("U1", "pandas notebook").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "U1": {"description": "pandas notebook", "updates": [], "tags": ["#DataViz"]}
            })
        );
    }

    #[test]
    fn test_corrupted_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.list().unwrap().is_empty());

        // The next write replaces the corrupted content
        store.add("U1", "fresh start").unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_records_without_tags_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"U9": {"description": "legacy", "updates": ["one"]}}"#,
        )
        .unwrap();

        let record = store.update("U9", "now with openai").unwrap();
        assert_eq!(record.updates, vec!["one", "now with openai"]);
        assert_eq!(record.tags, vec!["#LLM"]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path().join("data").join("nested").join("projects.json"));
        store.add("U1", "anything").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_records() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.add(&format!("U{}", i), "parallel project").unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list().unwrap().len(), 16);
    }
}

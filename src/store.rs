use crate::error::StoreError;
use crate::habit::HabitStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const STORE_FILE: &str = "habits.json";

/// Persists the habit document as a single JSON file in the platform
/// data directory. Whole-document overwrite on every save; no atomicity
/// beyond that (single user, single process).
#[derive(Clone)]
pub struct Storage {
    data_path: PathBuf,
}

impl Storage {
    pub fn open() -> Result<Self, StoreError> {
        let data_dir = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("habit-streaks");

        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            data_path: data_dir.join(STORE_FILE),
        })
    }

    /// Storage rooted at an explicit file path instead of the platform
    /// data directory.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            data_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads the store. A missing file is a fresh install and a document
    /// that does not parse as the strict store shape is treated the same
    /// way; neither surfaces an error.
    pub fn load(&self) -> HabitStore {
        let bytes = match fs::read(&self.data_path) {
            Ok(bytes) => bytes,
            Err(_) => return HabitStore::new(),
        };

        match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                warn!(
                    path = %self.data_path.display(),
                    %err,
                    "habit file is malformed, starting from an empty store"
                );
                HabitStore::new()
            }
        }
    }

    pub fn save(&self, store: &HabitStore) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(store)?;
        fs::write(&self.data_path, json)?;
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.data_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path().join("habits.json"));

        let mut store = HabitStore::new();
        store.add("Read").unwrap();
        store.add("Exercise").unwrap();
        store.mark_done("Read", d(2025, 1, 1)).unwrap();
        store.reset_daily(d(2025, 1, 2));

        storage.save(&store).unwrap();
        assert_eq!(storage.load(), store);
    }

    #[test]
    fn load_missing_file_yields_empty_store() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path().join("nope.json"));
        assert!(!storage.exists());
        assert!(storage.load().is_empty());
    }

    #[test]
    fn load_malformed_json_yields_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(&path, b"{not json").unwrap();
        assert!(Storage::at(&path).load().is_empty());
    }

    #[test]
    fn load_wrong_shape_yields_empty_store() {
        // A well-formed object whose values are not habit records is a
        // malformed document as a whole, never partially applied.
        let dir = tempdir().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(
            &path,
            br#"{"Read": {"done": false, "streak": 0, "last_done": null}, "junk": 42}"#,
        )
        .unwrap();
        assert!(Storage::at(&path).load().is_empty());
    }

    #[test]
    fn load_rejects_unknown_record_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(
            &path,
            br#"{"Read": {"done": false, "streak": 0, "last_done": null, "color": "red"}}"#,
        )
        .unwrap();
        assert!(Storage::at(&path).load().is_empty());
    }

    #[test]
    fn persisted_document_shape() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path().join("habits.json"));

        let mut store = HabitStore::new();
        store.add("Read").unwrap();
        store.mark_done("Read", d(2025, 1, 1)).unwrap();
        store.reset_daily(d(2025, 1, 1));
        storage.save(&store).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("habits.json")).unwrap()).unwrap();
        assert_eq!(raw["Read"]["done"], serde_json::json!(true));
        assert_eq!(raw["Read"]["streak"], serde_json::json!(1));
        assert_eq!(raw["Read"]["last_done"], serde_json::json!("2025-01-01"));
        assert_eq!(raw["_meta"]["last_reset"], serde_json::json!("2025-01-01"));
    }

    #[test]
    fn save_overwrites_whole_document() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path().join("habits.json"));

        let mut store = HabitStore::new();
        store.add("Read").unwrap();
        storage.save(&store).unwrap();

        store.delete("Read").unwrap();
        store.add("Exercise").unwrap();
        storage.save(&store).unwrap();

        let loaded = storage.load();
        assert!(loaded.get("Read").is_none());
        assert!(loaded.get("Exercise").is_some());
    }
}
